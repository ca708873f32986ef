use hifitime::Epoch;

use crate::horizons_errors::HorizonsError;

const MONTH_ABBREV: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Format an epoch in the `YYYY-MM-DD HH:MM` notation HORIZONS expects
/// for `START_TIME` and `STOP_TIME`.
///
/// Argument
/// --------
/// * `epoch`: the epoch to format (interpreted in UTC)
///
/// Return
/// ------
/// * The formatted date string
pub fn format_horizons_datetime(epoch: &Epoch) -> String {
    let (year, month, day, hour, minute, _second, _nanos) = epoch.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")
}

/// Parse a HORIZONS table datetime, `YYYY-Mon-DD HH:MM` with optional
/// seconds (`HH:MM:SS.fff`) and optional leading era marker (`A.D.`/`B.C.`).
///
/// Argument
/// --------
/// * `date_str`: the datetime string from a HORIZONS table row
///
/// Return
/// ------
/// * The corresponding UTC epoch, or `HorizonsError::InvalidDateTime`
pub fn parse_horizons_datetime(date_str: &str) -> Result<Epoch, HorizonsError> {
    let invalid = || HorizonsError::InvalidDateTime(date_str.to_string());

    let mut parts: Vec<&str> = date_str.split_whitespace().collect();
    if parts.first() == Some(&"A.D.") || parts.first() == Some(&"B.C.") {
        parts.remove(0);
    }
    let [date, time] = parts[..] else {
        return Err(invalid());
    };

    let date_fields: Vec<&str> = date.split('-').collect();
    let [year, month_name, day] = date_fields[..] else {
        return Err(invalid());
    };
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month = month_number(month_name).ok_or_else(invalid)?;
    let day: u8 = day.parse().map_err(|_| invalid())?;

    let time_fields: Vec<&str> = time.split(':').collect();
    let (hour, minute, second, nanos) = match time_fields[..] {
        [h, m] => (
            h.parse().map_err(|_| invalid())?,
            m.parse().map_err(|_| invalid())?,
            0u8,
            0u32,
        ),
        [h, m, s] => {
            let seconds: f64 = s.parse().map_err(|_| invalid())?;
            let whole = seconds.trunc() as u8;
            let nanos = ((seconds - seconds.trunc()) * 1e9) as u32;
            (
                h.parse().map_err(|_| invalid())?,
                m.parse().map_err(|_| invalid())?,
                whole,
                nanos,
            )
        }
        _ => return Err(invalid()),
    };

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, nanos)
        .map_err(|_| invalid())
}

/// Month number (1-12) from a three letter English abbreviation, any case.
fn month_number(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    MONTH_ABBREV
        .iter()
        .position(|m| *m == lower)
        .map(|i| (i + 1) as u8)
}

#[cfg(test)]
mod time_test {
    use super::*;

    #[test]
    fn test_format_horizons_datetime() {
        let epoch = Epoch::from_gregorian_utc(2021, 7, 4, 12, 47, 24, 0);
        assert_eq!(format_horizons_datetime(&epoch), "2021-07-04 12:47");

        let epoch = Epoch::from_gregorian_utc(1976, 9, 20, 0, 5, 0, 0);
        assert_eq!(format_horizons_datetime(&epoch), "1976-09-20 00:05");
    }

    #[test]
    fn test_parse_horizons_datetime() {
        let epoch = parse_horizons_datetime("2021-Jul-04 12:47").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2021, 7, 4, 12, 47, 0, 0));

        let epoch = parse_horizons_datetime("2024-Dec-28 01:47:28.0000").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2024, 12, 28, 1, 47, 28, 0));

        // vector tables prefix the calendar date with the era
        let epoch = parse_horizons_datetime("A.D. 2021-Jul-04 12:47:24.0000").unwrap();
        assert_eq!(epoch, Epoch::from_gregorian_utc(2021, 7, 4, 12, 47, 24, 0));
    }

    #[test]
    fn test_parse_horizons_datetime_invalid() {
        assert!(parse_horizons_datetime("2021-07-04 12:47").is_err());
        assert!(parse_horizons_datetime("garbage").is_err());
        assert!(parse_horizons_datetime("2021-Jul-04").is_err());
        // out-of-range components must surface as errors, not panics
        assert!(parse_horizons_datetime("2021-Jul-32 00:00").is_err());
        assert!(parse_horizons_datetime("2021-Feb-30 00:00").is_err());
        assert!(parse_horizons_datetime("2021-Jul-04 25:00").is_err());
        assert!(parse_horizons_datetime("2021-Jul-04 12:99").is_err());
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("Jan"), Some(1));
        assert_eq!(month_number("jul"), Some(7));
        assert_eq!(month_number("DEC"), Some(12));
        assert_eq!(month_number("Foo"), None);
    }
}
