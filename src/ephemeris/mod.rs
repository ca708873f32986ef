//! # Ephemeris result table
//!
//! This module defines [`Ephemeris`](crate::ephemeris::Ephemeris), the tabular result of a HORIZONS
//! observer query: one row per time step, one column per computed quantity.
//!
//! Columns keep the set the caller requested, so the table stores normalized
//! column names plus string cells, with typed accessors on top:
//!
//! - [`Ephemeris::column_f64`](crate::ephemeris::Ephemeris::column_f64) parses any numeric column,
//! - [`Ephemeris::epochs`](crate::ephemeris::Ephemeris::epochs) parses the `datetime_str` column,
//! - [`Ephemeris::records`](crate::ephemeris::Ephemeris::records) deserializes rows into
//!   [`EphemRecord`](crate::ephemeris::EphemRecord), the typed view over the default quantity set.
//!
//! ## Derived columns
//!
//! After parsing, the table gets a few derived columns useful for telescope
//! scheduling:
//!
//! - `RA_rate` and `DEC_rate` are converted in place from arcsec/hour
//!   (HORIZONS native) to **arcsec/minute**;
//! - a `mean_rate` column (`sqrt(RA_rate² + DEC_rate²)`, arcsec/minute) is
//!   appended;
//! - when lunar quantities were requested, `T-O-M` becomes `moon_sep`
//!   (degrees) and `MN_Illu%` becomes `moon_phase`, rescaled from percent to
//!   the 0..1 range.

pub(crate) mod parse;

use hifitime::Epoch;

use crate::constants::MINUTES_PER_HOUR;
use crate::horizons_errors::HorizonsError;
use crate::time::parse_horizons_datetime;

use parse::RawTable;

/// Tabular ephemeris returned by HORIZONS: rows are time steps, columns are
/// the requested quantities under normalized names.
#[derive(Debug, Clone, PartialEq)]
pub struct Ephemeris {
    /// Target name as resolved by HORIZONS (e.g. `1 Ceres (A801 AA)`).
    pub target_name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Typed view over one row of a default-quantity ephemeris.
///
/// Deserialization is name-based, so extra columns (e.g. the moon columns)
/// are ignored; a table built from a reduced quantity set will not have all
/// of these columns and cannot provide this view.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct EphemRecord {
    pub datetime_str: String,
    pub solar_presence: String,
    pub flags: String,
    #[serde(rename = "RA")]
    pub ra: f64, // deg
    #[serde(rename = "DEC")]
    pub dec: f64, // deg
    #[serde(rename = "RA_rate")]
    pub ra_rate: f64, // arcsec/min
    #[serde(rename = "DEC_rate")]
    pub dec_rate: f64, // arcsec/min
    #[serde(rename = "AZ")]
    pub az: f64, // deg
    #[serde(rename = "EL")]
    pub el: f64, // deg
    #[serde(rename = "V")]
    pub v_mag: f64,
    pub surfbright: f64,
    pub r: f64, // au
    pub r_rate: f64, // km/s
    pub delta: f64, // au
    pub delta_rate: f64, // km/s
    pub elong: f64, // deg
    #[serde(rename = "elongFlag")]
    pub elong_flag: String,
    pub alpha: f64, // deg
    /// Kept textual: HORIZONS reports `n.a.` for well-determined orbits.
    #[serde(rename = "RSS_3sigma")]
    pub rss_3sigma: String,
    pub hour_angle: f64, // hours
    pub mean_rate: f64, // arcsec/min
}

impl Ephemeris {
    /// Parse a raw HORIZONS response into an ephemeris table.
    ///
    /// Argument
    /// --------
    /// * `response`: the raw text response from the file API
    ///
    /// Return
    /// ------
    /// * The parsed table, or the error describing why the response carries
    ///   no table (ambiguous designation, service message, malformed block)
    pub fn from_response(response: &str) -> Result<Self, HorizonsError> {
        let raw = parse::parse_response(response)?;
        Self::from_raw(raw)
    }

    pub(crate) fn from_raw(raw: RawTable) -> Result<Self, HorizonsError> {
        let RawTable {
            target_name,
            header,
            rows,
        } = raw;

        let columns: Vec<String> = header
            .iter()
            .map(|label| normalize_label(label).unwrap_or(label.as_str()).to_string())
            .collect();

        let mut ephem = Ephemeris {
            target_name,
            columns,
            rows,
        };
        ephem.convert_rates()?;
        ephem.convert_moon_phase()?;
        Ok(ephem)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Normalized column names, in table order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    fn col_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw string cells of one column.
    ///
    /// Argument
    /// --------
    /// * `name`: normalized column name (e.g. `RA`, `datetime_str`)
    ///
    /// Return
    /// ------
    /// * The column cells, or `HorizonsError::MissingColumn`
    pub fn column(&self, name: &str) -> Result<Vec<&str>, HorizonsError> {
        let idx = self
            .col_index(name)
            .ok_or_else(|| HorizonsError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// One column parsed as `f64`.
    ///
    /// Return
    /// ------
    /// * The parsed values, or `HorizonsError::ColumnParse` on the first
    ///   non-numeric cell (HORIZONS prints `n.a.` for unavailable values)
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, HorizonsError> {
        self.column(name)?
            .into_iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| HorizonsError::ColumnParse {
                    column: name.to_string(),
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Epochs of the table rows, parsed from the `datetime_str` column.
    pub fn epochs(&self) -> Result<Vec<Epoch>, HorizonsError> {
        self.column("datetime_str")?
            .into_iter()
            .map(parse_horizons_datetime)
            .collect()
    }

    /// Typed rows for a default-quantity table, see [`EphemRecord`](crate::ephemeris::EphemRecord).
    pub fn records(&self) -> Result<Vec<EphemRecord>, HorizonsError> {
        let header = csv::StringRecord::from(self.columns.clone());
        self.rows
            .iter()
            .map(|row| {
                let record = csv::StringRecord::from(row.clone());
                Ok(record.deserialize::<EphemRecord>(Some(&header))?)
            })
            .collect()
    }

    /// Convert `RA_rate`/`DEC_rate` from arcsec/hour to arcsec/minute and
    /// append the `mean_rate` column. Tables without both rate columns are
    /// left untouched.
    fn convert_rates(&mut self) -> Result<(), HorizonsError> {
        let (Some(ra_idx), Some(dec_idx)) = (self.col_index("RA_rate"), self.col_index("DEC_rate"))
        else {
            return Ok(());
        };

        for row in &mut self.rows {
            let ra_rate = parse_cell(&row[ra_idx], "RA_rate")? / MINUTES_PER_HOUR;
            let dec_rate = parse_cell(&row[dec_idx], "DEC_rate")? / MINUTES_PER_HOUR;
            let mean_rate = (ra_rate * ra_rate + dec_rate * dec_rate).sqrt();

            row[ra_idx] = format!("{ra_rate:.6}");
            row[dec_idx] = format!("{dec_rate:.6}");
            row.push(format!("{mean_rate:.6}"));
        }
        self.columns.push("mean_rate".to_string());
        Ok(())
    }

    /// Rescale `moon_phase` from the HORIZONS illumination percentage to the
    /// 0..1 range used by the callers.
    fn convert_moon_phase(&mut self) -> Result<(), HorizonsError> {
        let Some(idx) = self.col_index("moon_phase") else {
            return Ok(());
        };
        for row in &mut self.rows {
            let phase = parse_cell(&row[idx], "moon_phase")? / 100.0;
            row[idx] = format!("{phase:.4}");
        }
        Ok(())
    }
}

fn parse_cell(cell: &str, column: &str) -> Result<f64, HorizonsError> {
    cell.parse::<f64>().map_err(|_| HorizonsError::ColumnParse {
        column: column.to_string(),
        value: cell.to_string(),
    })
}

/// Normalized name for a raw HORIZONS column label, `None` for labels passed
/// through unchanged. The names follow the astroquery `jplhorizons` column
/// conventions.
fn normalize_label(label: &str) -> Option<&'static str> {
    let normalized = match label {
        "Date__(UT)__HR:MN" | "Date__(UT)__HR:MN:SC.fff" => "datetime_str",
        "Date_JDUT" => "datetime_jd",
        "R.A._(ICRF)" | "R.A._(ICRF/J2000.0)" | "R.A._(a-app)" => "RA",
        "DEC_(ICRF)" | "DEC_(ICRF/J2000.0)" | "DEC_(a-app)" => "DEC",
        "dRA*cosD" => "RA_rate",
        "d(DEC)/dt" => "DEC_rate",
        "Azi_(a-app)" | "Azi_(a-appr)" => "AZ",
        "Elev_(a-app)" | "Elev_(a-appr)" => "EL",
        "APmag" | "T-mag" => "V",
        "S-brt" => "surfbright",
        "r" => "r",
        "rdot" => "r_rate",
        "delta" => "delta",
        "deldot" => "delta_rate",
        "S-O-T" => "elong",
        "/r" => "elongFlag",
        "S-T-O" => "alpha",
        "RSS_3sigma" => "RSS_3sigma",
        "L_Ap_Hour_Ang" => "hour_angle",
        "T-O-M" => "moon_sep",
        "MN_Illu%" => "moon_phase",
        _ => return None,
    };
    Some(normalized)
}

#[cfg(test)]
mod ephemeris_test {
    use super::parse::RawTable;
    use super::*;

    fn raw_table() -> RawTable {
        RawTable {
            target_name: "1 Ceres (A801 AA)".to_string(),
            header: [
                "Date__(UT)__HR:MN",
                "solar_presence",
                "flags",
                "R.A._(ICRF)",
                "DEC_(ICRF)",
                "dRA*cosD",
                "d(DEC)/dt",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            rows: vec![
                vec![
                    "2021-Jul-04 00:00".to_string(),
                    "".to_string(),
                    "".to_string(),
                    "352.46875".to_string(),
                    "-12.63936".to_string(),
                    "28.9013".to_string(),
                    "-9.2392".to_string(),
                ],
                vec![
                    "2021-Jul-05 00:00".to_string(),
                    "C".to_string(),
                    "m".to_string(),
                    "352.58123".to_string(),
                    "-12.70111".to_string(),
                    "27.1042".to_string(),
                    "-9.8765".to_string(),
                ],
            ],
        }
    }

    #[test]
    fn test_from_raw_normalizes_columns() {
        let ephem = Ephemeris::from_raw(raw_table()).unwrap();
        assert_eq!(
            ephem.columns(),
            [
                "datetime_str",
                "solar_presence",
                "flags",
                "RA",
                "DEC",
                "RA_rate",
                "DEC_rate",
                "mean_rate"
            ]
        );
        assert_eq!(ephem.nrows(), 2);
        assert_eq!(ephem.ncols(), 8);
        assert_eq!(ephem.target_name, "1 Ceres (A801 AA)");
    }

    #[test]
    fn test_rate_conversion_and_mean_rate() {
        let ephem = Ephemeris::from_raw(raw_table()).unwrap();

        let ra_rate = ephem.column_f64("RA_rate").unwrap();
        let dec_rate = ephem.column_f64("DEC_rate").unwrap();
        let mean_rate = ephem.column_f64("mean_rate").unwrap();

        let expected_ra: f64 = 28.9013 / 60.0;
        let expected_dec: f64 = -9.2392 / 60.0;
        let expected_mean = (expected_ra * expected_ra + expected_dec * expected_dec).sqrt();

        assert!((ra_rate[0] - expected_ra).abs() < 1e-6);
        assert!((dec_rate[0] - expected_dec).abs() < 1e-6);
        assert!((mean_rate[0] - expected_mean).abs() < 1e-6);
        assert!((mean_rate[1] - ((27.1042f64 / 60.0).powi(2) + (9.8765f64 / 60.0).powi(2)).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_epochs() {
        let ephem = Ephemeris::from_raw(raw_table()).unwrap();
        let epochs = ephem.epochs().unwrap();
        assert_eq!(epochs[0], Epoch::from_gregorian_utc(2021, 7, 4, 0, 0, 0, 0));
        assert_eq!(epochs[1], Epoch::from_gregorian_utc(2021, 7, 5, 0, 0, 0, 0));
    }

    #[test]
    fn test_missing_column() {
        let ephem = Ephemeris::from_raw(raw_table()).unwrap();
        let err = ephem.column("AZ").unwrap_err();
        assert_eq!(err, HorizonsError::MissingColumn("AZ".to_string()));
    }

    #[test]
    fn test_column_parse_error() {
        let mut raw = raw_table();
        raw.rows[1][3] = "n.a.".to_string();
        let ephem = Ephemeris::from_raw(raw).unwrap();
        let err = ephem.column_f64("RA").unwrap_err();
        assert_eq!(
            err,
            HorizonsError::ColumnParse {
                column: "RA".to_string(),
                value: "n.a.".to_string()
            }
        );
    }

    #[test]
    fn test_moon_phase_rescaled() {
        let mut raw = raw_table();
        raw.header.push("T-O-M".to_string());
        raw.header.push("MN_Illu%".to_string());
        for (row, (sep, illum)) in raw
            .rows
            .iter_mut()
            .zip([("45.127", "82.50"), ("51.882", "74.25")])
        {
            row.push(sep.to_string());
            row.push(illum.to_string());
        }

        let ephem = Ephemeris::from_raw(raw).unwrap();
        let sep = ephem.column_f64("moon_sep").unwrap();
        let phase = ephem.column_f64("moon_phase").unwrap();
        assert!((sep[0] - 45.127).abs() < 1e-9);
        assert!((phase[0] - 0.825).abs() < 1e-4);
        assert!((phase[1] - 0.7425).abs() < 1e-4);
    }

    #[test]
    fn test_rates_absent_leaves_table_unchanged() {
        let mut raw = raw_table();
        raw.header.truncate(5);
        for row in &mut raw.rows {
            row.truncate(5);
        }
        let ephem = Ephemeris::from_raw(raw).unwrap();
        assert_eq!(ephem.columns(), ["datetime_str", "solar_presence", "flags", "RA", "DEC"]);
    }
}
