//! Constants and type aliases shared across the HORIZONS client.

/// Angle in degrees.
pub type Degree = f64;

/// Hour angle expressed in hours.
pub type Hour = f64;

/// Angular rate in arcseconds per minute.
pub type ArcsecPerMinute = f64;

/// JPL HORIZONS file API endpoint.
///
/// The whole query is sent as a single `!$$SOF` input block in a
/// form-encoded POST, see <https://ssd-api.jpl.nasa.gov/doc/horizons_file.html>.
pub const HORIZONS_FILE_API: &str = "https://ssd.jpl.nasa.gov/api/horizons_file.api";

/// Default HORIZONS quantity codes requested for an observer ephemeris:
/// astrometric RA/DEC (1), RA/DEC rates (3), apparent AZ/EL (4),
/// visual magnitude and surface brightness (9), heliocentric and observer
/// range and range-rate (19, 20), solar elongation (23), phase angle (24),
/// RSS positional uncertainty (38) and local apparent hour angle (42).
pub const DEFAULT_QUANTITIES: [u8; 10] = [1, 3, 4, 9, 19, 20, 23, 24, 38, 42];

/// Quantity code for the RA/DEC rates, always requested.
pub const RA_DEC_RATE_QUANTITY: u8 = 3;

/// Quantity code for the target-observer-moon separation and lunar illumination.
pub const MOON_QUANTITY: u8 = 25;

/// Airmass value HORIZONS treats as "no cutoff".
pub const NO_AIRMASS_CUTOFF: f64 = 99.0;

/// Conversion divisor from arcsec/hour (HORIZONS native rate unit) to arcsec/minute.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Degrees of hour angle per hour.
pub const DEGREES_PER_HOUR: f64 = 15.0;
