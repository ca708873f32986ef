//! Resolution of ambiguous target designations.
//!
//! When a small-body designation matches several HORIZONS records (typically
//! a comet with multiple orbit solutions), the service answers with a
//! "Matching small-bodies" listing instead of an ephemeris. The listing rows
//! carry the record number and the epoch year of each orbit solution; the
//! record whose epoch year is closest to now is selected for the retry.

use hifitime::{Duration, Epoch};

/// Detect a "Matching small-bodies" response and return its lines.
///
/// Argument
/// --------
/// * `response`: the raw HORIZONS response text
///
/// Return
/// ------
/// * `Some(lines)` when the response is a multiple-match listing, `None` otherwise
pub(crate) fn matching_bodies(response: &str) -> Option<Vec<String>> {
    if !response.contains("Matching small-bodies") {
        return None;
    }
    Some(response.lines().map(str::to_owned).collect())
}

/// Pick the HORIZONS record number out of a multiple-match listing.
///
/// Listing rows look like:
///
/// ```text
///     Record #  Epoch-yr  Primary Desig  >MATCH NAME<
///     --------  --------  -------------  -------------------------
///        90000158   1997    C/1995 O1      Hale-Bopp
///        90000159   2008    C/1995 O1      Hale-Bopp
/// ```
///
/// Rows are recognized by their first two whitespace-separated fields both
/// being integers; among those, the record whose epoch year is closest to
/// `now` wins.
///
/// Argument
/// --------
/// * `lines`: the listing lines, as returned by the service
/// * `now`: the reference epoch for the "closest epoch year" choice
///
/// Return
/// ------
/// * The selected record number, or `None` when no row can be parsed
pub fn determine_horizons_id(lines: &[String], now: Epoch) -> Option<u64> {
    let mut best: Option<(u64, Duration)> = None;

    for line in lines {
        let chunks: Vec<&str> = line.split_whitespace().collect();
        if chunks.len() < 5
            || !chunks[0].chars().all(|c| c.is_ascii_digit())
            || !chunks[1].chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }

        let Ok(record) = chunks[0].parse::<u64>() else {
            continue;
        };
        let Ok(epoch_year) = chunks[1].parse::<i32>() else {
            tracing::warn!("unable to parse year of epoch from: {line}");
            continue;
        };

        let epoch = Epoch::from_gregorian_utc(epoch_year, 1, 1, 0, 0, 0, 0);
        let span = (now - epoch).abs();
        if best.as_ref().map_or(true, |(_, shortest)| span <= *shortest) {
            best = Some((record, span));
        }
    }

    best.map(|(record, _)| record)
}
