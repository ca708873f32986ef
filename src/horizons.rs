//! # Top-level HORIZONS ephemeris call
//!
//! This module wires the query builder, the HTTP environment and the response
//! parser into the single entry point of the crate,
//! [`horizons_ephem`](crate::horizons::horizons_ephem): ask HORIZONS for an observer ephemeris of one
//! target over a time range, from one observing site.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use hifitime::Epoch;
//! use horizons_ephem::env_state::HorizonsEnv;
//! use horizons_ephem::horizons::{horizons_ephem, EphemOptions};
//!
//! let env = HorizonsEnv::new();
//! let start = Epoch::from_gregorian_utc(2021, 7, 4, 0, 0, 0, 0);
//! let stop = Epoch::from_gregorian_utc(2021, 7, 6, 0, 0, 0, 0);
//!
//! let ephem = horizons_ephem(&env, "Ceres", start, stop, "F51", &EphemOptions::default())?;
//! println!("{} rows for {}", ephem.nrows(), ephem.target_name);
//! # Ok::<(), horizons_ephem::horizons_errors::HorizonsError>(())
//! ```
//!
//! ## Ambiguous designations
//!
//! A designation matching several HORIZONS records (multi-apparition comets,
//! re-designated asteroids) makes the service answer with a match listing.
//! The call resolves the record whose orbit epoch is closest to now and
//! retries once; an unresolvable listing is
//! [`HorizonsError::UnresolvedTarget`](crate::horizons_errors::HorizonsError::UnresolvedTarget).

use hifitime::Epoch;

use crate::constants::{Degree, HORIZONS_FILE_API, MOON_QUANTITY, RA_DEC_RATE_QUANTITY};
use crate::env_state::HorizonsEnv;
use crate::ephemeris::Ephemeris;
use crate::horizons_errors::HorizonsError;
use crate::query::{EphemerisQuery, QuantitySet, StepSize, Target};
use crate::sites::{airmass_from_altitude, hour_angle_cutoff, is_radar_site, mount_limits};
use crate::target::determine_horizons_id;

/// Optional parameters of a [`horizons_ephem`](crate::horizons::horizons_ephem) call.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemOptions {
    /// Ephemeris step size, 1 hour by default.
    pub step_size: StepSize,
    /// Minimum observable altitude in degrees; 0 disables the airmass cut.
    pub alt_limit: Degree,
    /// HORIZONS quantity codes; the RA/DEC rates are always added.
    pub quantities: QuantitySet,
    /// Also request the target-moon separation and lunar illumination
    /// (`moon_sep` and `moon_phase` columns).
    pub include_moon: bool,
}

impl Default for EphemOptions {
    fn default() -> Self {
        EphemOptions {
            step_size: StepSize::default(),
            alt_limit: 0.0,
            quantities: QuantitySet::default(),
            include_moon: false,
        }
    }
}

/// Query JPL HORIZONS for an observer ephemeris.
///
/// Arguments
/// ---------
/// * `env`: the shared HTTP environment
/// * `target`: target body designation (e.g. `Ceres`, `2015 AB`)
/// * `start`: first ephemeris epoch (UTC)
/// * `stop`: last ephemeris epoch (UTC)
/// * `site_code`: MPC code of the observing site (e.g. `F51`), or a radar
///   site code starting with `-`
/// * `options`: step size, altitude limit, quantity selection, moon columns
///
/// Return
/// ------
/// * The parsed [`Ephemeris`](crate::ephemeris::Ephemeris) table, or the error raised by the
///   transport, the service, or the response parser
pub fn horizons_ephem(
    env: &HorizonsEnv,
    target: &str,
    start: Epoch,
    stop: Epoch,
    site_code: &str,
    options: &EphemOptions,
) -> Result<Ephemeris, HorizonsError> {
    let mut quantities = options.quantities.clone();
    quantities.ensure(RA_DEC_RATE_QUANTITY);
    if options.include_moon {
        quantities.ensure(MOON_QUANTITY);
    }

    let (ha_neg_limit, ha_pos_limit, _alt_limit) = mount_limits(site_code);

    let query = EphemerisQuery {
        target: Target::Designation(target.to_string()),
        site_code: site_code.to_string(),
        start,
        stop,
        step: options.step_size,
        quantities,
        skip_daylight: !is_radar_site(site_code),
        airmass_cutoff: airmass_from_altitude(options.alt_limit),
        hour_angle_cutoff: hour_angle_cutoff(ha_neg_limit, ha_pos_limit),
    };

    match fetch_ephemeris(env, &query) {
        Err(HorizonsError::AmbiguousTarget { listing }) => {
            tracing::debug!("ambiguous object {target}, trying to determine HORIZONS id");
            let now = Epoch::now().map_err(|e| HorizonsError::SystemClock(e.to_string()))?;
            let Some(record) = determine_horizons_id(&listing, now) else {
                tracing::warn!("unable to determine the HORIZONS id for {target}");
                return Err(HorizonsError::UnresolvedTarget(target.to_string()));
            };
            tracing::debug!("HORIZONS id={record}");

            let retry = EphemerisQuery {
                target: Target::Record(record),
                ..query
            };
            fetch_ephemeris(env, &retry)
        }
        other => other,
    }
}

/// One query round-trip: render the input block, POST it, parse the table.
fn fetch_ephemeris(env: &HorizonsEnv, query: &EphemerisQuery) -> Result<Ephemeris, HorizonsError> {
    let input = query.input_block();
    let response = env.post_form(
        HORIZONS_FILE_API,
        [("format", "text"), ("input", input.as_str())],
    )?;
    Ephemeris::from_response(&response)
}
