//! Boundary adapter for delimited-text serial uploads.
//!
//! File reading and cell splitting happen outside the engine; by the time
//! data arrives here it is already a list of string rows. This module checks
//! the header contract and shapes rows into [`SerialRecord`]s before any
//! engine call is made.

use std::collections::BTreeMap;
use tracing::debug;

use crate::commands::serials::SerialRecord;
use crate::errors::ImportError;

/// Literal name required for the first header column.
pub const SERIAL_NUMBER_HEADER: &str = "serialNumber";

/// Converts split rows into import records.
///
/// The first row is the header; its first column must literally equal
/// `serialNumber` or the whole upload is rejected. Remaining header columns
/// name custom attributes. Data rows with an empty first column are dropped,
/// and empty cell values are not recorded as attributes.
pub fn records_from_rows(rows: &[Vec<String>]) -> Result<Vec<SerialRecord>, ImportError> {
    let header = rows.first().ok_or(ImportError::MissingHeader)?;
    match header.first().map(String::as_str) {
        Some(SERIAL_NUMBER_HEADER) => {}
        Some(other) => return Err(ImportError::InvalidHeader(other.to_string())),
        None => return Err(ImportError::InvalidHeader(String::new())),
    }

    let records: Vec<SerialRecord> = rows[1..]
        .iter()
        .filter(|row| row.first().map(|c| !c.is_empty()).unwrap_or(false))
        .map(|row| {
            let mut custom_attributes = BTreeMap::new();
            for i in 1..header.len().min(row.len()) {
                if !header[i].is_empty() && !row[i].is_empty() {
                    custom_attributes.insert(header[i].clone(), row[i].clone());
                }
            }
            SerialRecord {
                serial_number: row[0].clone(),
                custom_attributes,
            }
        })
        .collect();

    debug!(
        rows = rows.len() - 1,
        records = records.len(),
        "import rows shaped into records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn header_must_start_with_serial_number() {
        let rows = vec![row(&["serial", "color"]), row(&["SN1", "red"])];
        assert_eq!(
            records_from_rows(&rows),
            Err(ImportError::InvalidHeader("serial".into()))
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(records_from_rows(&[]), Err(ImportError::MissingHeader));
    }

    #[test]
    fn empty_serial_rows_are_dropped_and_attributes_mapped() {
        let rows = vec![
            row(&["serialNumber", "color"]),
            row(&["SN1", "red"]),
            row(&["", ""]),
        ];
        let records = records_from_rows(&rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].serial_number, "SN1");
        assert_eq!(
            records[0].custom_attributes.get("color").map(String::as_str),
            Some("red")
        );
    }

    #[test]
    fn ragged_rows_and_empty_cells_are_tolerated() {
        let rows = vec![
            row(&["serialNumber", "color", "size"]),
            row(&["SN1", "", "L", "extra-cell-ignored"]),
            row(&["SN2"]),
        ];
        let records = records_from_rows(&rows).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].custom_attributes.contains_key("color"));
        assert_eq!(
            records[0].custom_attributes.get("size").map(String::as_str),
            Some("L")
        );
        assert!(records[1].custom_attributes.is_empty());
    }
}
