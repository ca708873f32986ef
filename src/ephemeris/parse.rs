//! Extraction of the tabular payload from a raw HORIZONS response.
//!
//! An observer-table response interleaves free-text headers with the CSV
//! payload. The data rows sit between the `$$SOE` and `$$EOE` markers; the
//! CSV header is the last labeled line above `$$SOE`, separated from the data
//! by an asterisk ruler.

use regex::Regex;

use crate::horizons_errors::HorizonsError;
use crate::target::matching_bodies;

/// Raw table extracted from a response, before column normalization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawTable {
    pub(crate) target_name: String,
    pub(crate) header: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

/// Parse a raw HORIZONS response into a [`RawTable`].
///
/// Argument
/// --------
/// * `response`: the raw response text from the file API
///
/// Return
/// ------
/// * The extracted table, or:
///   - `HorizonsError::AmbiguousTarget` for a multiple-match listing,
///   - `HorizonsError::HorizonsMessage` when no ephemeris block is present,
///   - `HorizonsError::MalformedTable` when the block cannot be read back
pub(crate) fn parse_response(response: &str) -> Result<RawTable, HorizonsError> {
    if let Some(listing) = matching_bodies(response) {
        return Err(HorizonsError::AmbiguousTarget { listing });
    }

    let lines: Vec<&str> = response.lines().collect();
    let Some(soe) = lines.iter().position(|l| l.trim() == "$$SOE") else {
        return Err(HorizonsError::HorizonsMessage(
            response.trim().to_string(),
        ));
    };
    let Some(eoe) = lines.iter().position(|l| l.trim() == "$$EOE") else {
        return Err(HorizonsError::MalformedTable(
            "missing $$EOE marker".to_string(),
        ));
    };
    if eoe < soe {
        return Err(HorizonsError::MalformedTable(
            "$$EOE marker precedes $$SOE".to_string(),
        ));
    }

    let target_name = extract_target_name(response);
    let header = extract_header(&lines[..soe])?;
    let rows = extract_rows(&lines[soe + 1..eoe], header.len())?;

    Ok(RawTable {
        target_name,
        header,
        rows,
    })
}

/// Target name from the `Target body name:` header line, the designation
/// string when the line is absent.
fn extract_target_name(response: &str) -> String {
    // name runs up to the {source: ...} annotation
    let name_regex = Regex::new(r"Target body name:\s*(.+?)\s*\{").unwrap();
    name_regex
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// The CSV header is the closest non-ruler, non-empty line above `$$SOE`.
/// The two unlabeled cells (solar and lunar presence markers) get their
/// conventional names; any further unlabeled cell gets a positional name.
fn extract_header(lines_above: &[&str]) -> Result<Vec<String>, HorizonsError> {
    let header_line = lines_above
        .iter()
        .rev()
        .map(|l| l.trim())
        .find(|l| !l.is_empty() && !l.chars().all(|c| c == '*'))
        .ok_or_else(|| HorizonsError::MalformedTable("missing CSV header".to_string()))?;

    if !header_line.contains(',') {
        return Err(HorizonsError::MalformedTable(format!(
            "unexpected CSV header: {header_line}"
        )));
    }

    let mut cells: Vec<String> = header_line.split(',').map(|c| c.trim().to_string()).collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }

    let mut unlabeled = 0usize;
    let header = cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| {
            if cell.is_empty() {
                unlabeled += 1;
                match unlabeled {
                    1 => "solar_presence".to_string(),
                    2 => "flags".to_string(),
                    _ => format!("col{i}"),
                }
            } else {
                cell
            }
        })
        .collect();
    Ok(header)
}

/// Read the data rows with the csv crate; every row is trimmed and truncated
/// of the trailing empty cell left by the HORIZONS trailing comma.
fn extract_rows(
    data_lines: &[&str],
    header_len: usize,
) -> Result<Vec<Vec<String>>, HorizonsError> {
    let block = data_lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(block.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        while cells.len() > header_len && cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        if cells.len() != header_len {
            return Err(HorizonsError::MalformedTable(format!(
                "row has {} cells, header has {}",
                cells.len(),
                header_len
            )));
        }
        rows.push(cells);
    }
    Ok(rows)
}
