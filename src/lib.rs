pub mod constants;
pub mod env_state;
pub mod ephemeris;
pub mod horizons;
pub mod horizons_errors;
pub mod query;
pub mod sites;
pub mod target;
pub mod time;
