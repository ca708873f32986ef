//! Construction of HORIZONS observer-table queries.
//!
//! An [`EphemerisQuery`](crate::query::EphemerisQuery) gathers everything the file API needs
//! (target command, observer site, time range, step size, quantity codes and
//! the observing cutoffs) and renders it as the `!$$SOF` input block posted
//! to `horizons_file.api`.

use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use itertools::Itertools;

use crate::constants::{Hour, DEFAULT_QUANTITIES};
use crate::horizons_errors::HorizonsError;
use crate::time::format_horizons_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

/// Ephemeris step size in HORIZONS notation (`30m`, `1h`, `1d`, `6mo`, `5y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSize {
    value: u32,
    unit: StepUnit,
}

impl StepSize {
    pub fn new(value: u32, unit: StepUnit) -> Self {
        StepSize { value, unit }
    }
}

impl Default for StepSize {
    fn default() -> Self {
        StepSize::new(1, StepUnit::Hours)
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            StepUnit::Minutes => write!(f, "{}m", self.value),
            StepUnit::Hours => write!(f, "{}h", self.value),
            StepUnit::Days => write!(f, "{}d", self.value),
            StepUnit::Months => write!(f, "{}mo", self.value),
            StepUnit::Years => write!(f, "{}y", self.value),
        }
    }
}

impl FromStr for StepSize {
    type Err = HorizonsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HorizonsError::InvalidStepSize(s.to_string());

        let trimmed = s.trim();
        // "mo" must be stripped before the single letter units ("30m" vs "6mo")
        let (digits, unit) = if let Some(d) = trimmed.strip_suffix("mo") {
            (d, StepUnit::Months)
        } else if let Some(d) = trimmed.strip_suffix('m') {
            (d, StepUnit::Minutes)
        } else if let Some(d) = trimmed.strip_suffix('h') {
            (d, StepUnit::Hours)
        } else if let Some(d) = trimmed.strip_suffix('d') {
            (d, StepUnit::Days)
        } else if let Some(d) = trimmed.strip_suffix('y') {
            (d, StepUnit::Years)
        } else {
            return Err(invalid());
        };

        let value: u32 = digits.parse().map_err(|_| invalid())?;
        Ok(StepSize::new(value, unit))
    }
}

/// Set of HORIZONS quantity codes, rendered as the `QUANTITIES` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantitySet(Vec<u8>);

impl QuantitySet {
    pub fn new(codes: Vec<u8>) -> Self {
        QuantitySet(codes)
    }

    pub fn contains(&self, code: u8) -> bool {
        self.0.contains(&code)
    }

    /// Append `code` if it is not already requested.
    pub fn ensure(&mut self, code: u8) {
        if !self.contains(code) {
            self.0.push(code);
        }
    }
}

impl Default for QuantitySet {
    fn default() -> Self {
        QuantitySet(DEFAULT_QUANTITIES.to_vec())
    }
}

impl fmt::Display for QuantitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(","))
    }
}

impl FromStr for QuantitySet {
    type Err = HorizonsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let codes = s
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| HorizonsError::InvalidQuantities(s.to_string()))?;
        if codes.is_empty() {
            return Err(HorizonsError::InvalidQuantities(s.to_string()));
        }
        Ok(QuantitySet(codes))
    }
}

/// Target body sent as the HORIZONS `COMMAND` parameter.
///
/// Small-body designations carry the trailing `;` that switches HORIZONS to
/// its small-body lookup; resolved record numbers are sent the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Designation(String),
    Record(u64),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Designation(name) => write!(f, "{name};"),
            Target::Record(number) => write!(f, "{number};"),
        }
    }
}

/// A fully specified HORIZONS observer-table query.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisQuery {
    pub target: Target,
    /// MPC site code of the observer, sent as `CENTER`.
    pub site_code: String,
    pub start: Epoch,
    pub stop: Epoch,
    pub step: StepSize,
    pub quantities: QuantitySet,
    /// Ask HORIZONS to drop time steps where the site is in daylight.
    pub skip_daylight: bool,
    /// Airmass cutoff (99 disables the cut).
    pub airmass_cutoff: f64,
    /// Local hour angle cutoff in hours.
    pub hour_angle_cutoff: Hour,
}

impl EphemerisQuery {
    /// Render the `!$$SOF` input block understood by the file API.
    ///
    /// `EPHEM_TYPE`, `ANG_FORMAT` and `CSV_FORMAT` are fixed: this crate only
    /// builds observer tables with angles in degrees and CSV output.
    ///
    /// Return
    /// ------
    /// * The input block, ready to be posted as the `input` form field
    pub fn input_block(&self) -> String {
        format!(
            "
!$$SOF
COMMAND='{}'
OBJ_DATA='NO'
MAKE_EPHEM='YES'
EPHEM_TYPE='OBSERVER'
CENTER='{}'
START_TIME='{}'
STOP_TIME='{}'
STEP_SIZE='{}'
QUANTITIES='{}'
ANG_FORMAT='DEG'
CSV_FORMAT='YES'
SKIP_DAYLT='{}'
AIRMASS='{}'
LHA_CUTOFF='{}'
",
            self.target,
            self.site_code,
            format_horizons_datetime(&self.start),
            format_horizons_datetime(&self.stop),
            self.step,
            self.quantities,
            if self.skip_daylight { "YES" } else { "NO" },
            self.airmass_cutoff,
            self.hour_angle_cutoff,
        )
    }
}

#[cfg(test)]
mod query_test {
    use super::*;
    use crate::constants::NO_AIRMASS_CUTOFF;

    #[test]
    fn test_step_display() {
        assert_eq!(StepSize::new(1, StepUnit::Days).to_string(), "1d");
        assert_eq!(StepSize::new(50, StepUnit::Hours).to_string(), "50h");
        assert_eq!(StepSize::new(30, StepUnit::Minutes).to_string(), "30m");
        assert_eq!(StepSize::new(5, StepUnit::Years).to_string(), "5y");
        assert_eq!(StepSize::new(6, StepUnit::Months).to_string(), "6mo");
    }

    #[test]
    fn test_step_from_str() {
        assert_eq!(
            "1h".parse::<StepSize>().unwrap(),
            StepSize::new(1, StepUnit::Hours)
        );
        assert_eq!(
            "30m".parse::<StepSize>().unwrap(),
            StepSize::new(30, StepUnit::Minutes)
        );
        assert_eq!(
            "6mo".parse::<StepSize>().unwrap(),
            StepSize::new(6, StepUnit::Months)
        );
        assert_eq!(
            " 2d ".parse::<StepSize>().unwrap(),
            StepSize::new(2, StepUnit::Days)
        );

        assert!("h".parse::<StepSize>().is_err());
        assert!("12".parse::<StepSize>().is_err());
        assert!("1w".parse::<StepSize>().is_err());
    }

    #[test]
    fn test_quantity_set() {
        let mut quantities = QuantitySet::default();
        assert_eq!(quantities.to_string(), "1,3,4,9,19,20,23,24,38,42");

        quantities.ensure(3);
        assert_eq!(quantities.to_string(), "1,3,4,9,19,20,23,24,38,42");

        quantities.ensure(25);
        assert_eq!(quantities.to_string(), "1,3,4,9,19,20,23,24,38,42,25");

        let parsed: QuantitySet = "1, 3,25".parse().unwrap();
        assert_eq!(parsed, QuantitySet::new(vec![1, 3, 25]));
        assert!("1,forty".parse::<QuantitySet>().is_err());
    }

    #[test]
    fn test_target_command() {
        assert_eq!(Target::Designation("Ceres".into()).to_string(), "Ceres;");
        assert_eq!(Target::Record(90377).to_string(), "90377;");
    }

    #[test]
    fn test_input_block() {
        let query = EphemerisQuery {
            target: Target::Designation("2015 AB".into()),
            site_code: "F51".into(),
            start: Epoch::from_gregorian_utc(2021, 7, 4, 0, 0, 0, 0),
            stop: Epoch::from_gregorian_utc(2021, 7, 6, 0, 0, 0, 0),
            step: StepSize::default(),
            quantities: QuantitySet::default(),
            skip_daylight: true,
            airmass_cutoff: NO_AIRMASS_CUTOFF,
            hour_angle_cutoff: 12.0,
        };

        let block = query.input_block();
        assert!(block.starts_with("\n!$$SOF\n"));
        assert!(block.contains("COMMAND='2015 AB;'"));
        assert!(block.contains("CENTER='F51'"));
        assert!(block.contains("START_TIME='2021-07-04 00:00'"));
        assert!(block.contains("STOP_TIME='2021-07-06 00:00'"));
        assert!(block.contains("STEP_SIZE='1h'"));
        assert!(block.contains("QUANTITIES='1,3,4,9,19,20,23,24,38,42'"));
        assert!(block.contains("SKIP_DAYLT='YES'"));
        assert!(block.contains("AIRMASS='99'"));
        assert!(block.contains("LHA_CUTOFF='12'"));
        assert!(block.contains("EPHEM_TYPE='OBSERVER'"));
        assert!(block.contains("CSV_FORMAT='YES'"));
    }
}
