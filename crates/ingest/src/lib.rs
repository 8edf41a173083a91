//! Tabular ingestion of floor-pour schedules.
//!
//! A schedule is the first sheet of a workbook holding one row per pour:
//! a free-text floor label, optionally a reference, and the pour date.
//! Two layouts are understood, selected with [`IngestMode`]:
//!
//! - [`IngestMode::HeaderAnchored`]: row 0 names the `Etage`, `Reference`
//!   and `Date` columns (any order); every following row is data.
//! - [`IngestMode::ContentAnchored`]: older sheets without a header. Data
//!   starts at the first row whose first cell looks like a schedule entry;
//!   column 0 is the label and column 1 the date.
//!
//! Rows that lack a label, reference (header-anchored only) or a parsable
//! date are skipped, never reported as errors.

pub mod dates;
pub mod error;
pub mod stages;
pub mod validation;
pub mod workbook;

pub use error::IngestError;
pub use stages::map_label;
pub use validation::{ValidationReport, validate};

use coulage_types::{CellValue, FloorRecord, RawRow};
use serde::{Deserialize, Serialize};

/// Column names required in the header row of header-anchored sheets.
pub const HEADER_COLUMNS: [&str; 3] = ["Etage", "Reference", "Date"];

/// The base reference code written at the top of legacy schedules ("BA  318/24").
/// Rows whose label contains it are never data.
pub const BASE_REFERENCE_MARKER: &str = "BA";

/// Stage abbreviations that can open a legacy schedule.
const CONTENT_ANCHOR_TOKENS: &[&str] = &["fdts", "s/sol"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngestMode {
    #[default]
    HeaderAnchored,
    ContentAnchored,
}

impl IngestMode {
    /// Minimum cell count of a data row.
    fn min_cells(self) -> usize {
        match self {
            IngestMode::HeaderAnchored => 3,
            IngestMode::ContentAnchored => 2,
        }
    }
}

/// Column positions of a header-anchored sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderColumns {
    label: usize,
    reference: usize,
    date: usize,
}

impl HeaderColumns {
    fn locate(header: &RawRow) -> Option<Self> {
        let position = |name: &str| header.iter().position(|c| c.as_str() == Some(name));
        Some(Self {
            label: position(HEADER_COLUMNS[0])?,
            reference: position(HEADER_COLUMNS[1])?,
            date: position(HEADER_COLUMNS[2])?,
        })
    }
}

/// Parses workbook bytes into floor records.
pub fn parse(bytes: &[u8], mode: IngestMode) -> Result<Vec<FloorRecord>, IngestError> {
    let rows = workbook::read_first_sheet(bytes)?;
    parse_rows(&rows, mode)
}

/// Parses already-extracted sheet rows into floor records.
pub fn parse_rows(rows: &[RawRow], mode: IngestMode) -> Result<Vec<FloorRecord>, IngestError> {
    let records = match mode {
        IngestMode::HeaderAnchored => parse_header_anchored(rows)?,
        IngestMode::ContentAnchored => parse_content_anchored(rows)?,
    };
    log::debug!("Parsed {} floor records ({:?})", records.len(), mode);
    Ok(records)
}

fn parse_header_anchored(rows: &[RawRow]) -> Result<Vec<FloorRecord>, IngestError> {
    let columns = rows
        .first()
        .and_then(HeaderColumns::locate)
        .ok_or(IngestError::HeaderNotFound)?;

    let records = rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, row)| {
            if row.len() < IngestMode::HeaderAnchored.min_cells() {
                log::debug!("Row {index}: skipped, too few cells");
                return None;
            }
            let reference = cell(row, columns.reference);
            if reference.is_blank() {
                log::debug!("Row {index}: skipped, no reference");
                return None;
            }
            build_record(
                index,
                cell(row, columns.label),
                Some(reference.clone()),
                cell(row, columns.date),
            )
        })
        .collect();
    Ok(records)
}

fn parse_content_anchored(rows: &[RawRow]) -> Result<Vec<FloorRecord>, IngestError> {
    let anchor = rows
        .iter()
        .position(|row| row.first().is_some_and(is_content_anchor))
        .ok_or(IngestError::HeaderNotFound)?;

    let records = rows
        .iter()
        .enumerate()
        .skip(anchor)
        .filter_map(|(index, row)| {
            if row.len() < IngestMode::ContentAnchored.min_cells() {
                log::debug!("Row {index}: skipped, too few cells");
                return None;
            }
            if cell(row, 0).to_text().contains(BASE_REFERENCE_MARKER) {
                log::debug!("Row {index}: skipped, base reference row");
                return None;
            }
            build_record(index, cell(row, 0), None, cell(row, 1))
        })
        .collect();
    Ok(records)
}

fn is_content_anchor(first: &CellValue) -> bool {
    let text = first.to_text();
    if text.contains(BASE_REFERENCE_MARKER) {
        return true;
    }
    let lower = text.to_lowercase();
    CONTENT_ANCHOR_TOKENS.iter().any(|t| lower.contains(t))
}

fn cell(row: &RawRow, index: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(index).unwrap_or(&EMPTY)
}

fn build_record(
    index: usize,
    label: &CellValue,
    reference: Option<CellValue>,
    date_cell: &CellValue,
) -> Option<FloorRecord> {
    let row_label = label.to_text().trim().to_string();
    if row_label.is_empty() || date_cell.is_blank() {
        log::debug!("Row {index}: skipped, no label or date");
        return None;
    }
    let Some(date) = dates::parse_cell(date_cell) else {
        log::debug!("Row {index}: skipped, unparsable date {date_cell:?}");
        return None;
    };

    Some(FloorRecord {
        etage: stages::map_label(&row_label),
        row_label,
        reference,
        date: dates::format_date(date),
        raw_date: date_cell.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coulage_types::Stage;

    fn row(cells: &[&str]) -> RawRow {
        cells
            .iter()
            .map(|c| if c.is_empty() { CellValue::Empty } else { CellValue::from(*c) })
            .collect()
    }

    fn legacy_sheet() -> Vec<RawRow> {
        vec![
            row(&["BA", "318/24", ""]),
            row(&["fdts", "17/01/2025", "P"]),
            row(&["S/Sol", "31/01/2025", "P"]),
            row(&["Spte", "11/02/2025", "P"]),
            row(&["RDCH", "24/02/2025", "P"]),
            row(&["1° etg", "17/03/2025", "P"]),
            row(&["2° etg", "27/03/2025", "P"]),
            row(&["3° etg", "18/04/2025", "P"]),
        ]
    }

    #[test]
    fn header_anchored_reads_rows_below_header() {
        let rows = vec![
            row(&["Etage", "Reference", "Date"]),
            row(&["fdts", "MM/BC/1107/24", "17/01/2025"]),
            vec![
                CellValue::from("S/Sol"),
                CellValue::from("MM/BC/1108/24"),
                CellValue::Number(45688.0),
            ],
        ];
        let records = parse_rows(&rows, IngestMode::HeaderAnchored).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].etage, Stage::Foundations);
        assert_eq!(records[0].reference, Some(CellValue::from("MM/BC/1107/24")));
        assert_eq!(records[1].date, "31/01/2025");
        assert_eq!(records[1].raw_date, CellValue::Number(45688.0));
    }

    #[test]
    fn header_columns_may_come_in_any_order() {
        let rows = vec![
            row(&["Date", "Etage", "Reference"]),
            row(&["17/01/2025", "rdch", "REF-1"]),
        ];
        let records = parse_rows(&rows, IngestMode::HeaderAnchored).unwrap();
        assert_eq!(records[0].row_label, "rdch");
        assert_eq!(records[0].etage, Stage::GroundFloor);
        assert_eq!(records[0].reference, Some(CellValue::from("REF-1")));
    }

    #[test]
    fn header_must_be_first_row() {
        let rows = vec![row(&["Planning", "", ""]), row(&["Etage", "Reference", "Date"])];
        assert!(matches!(
            parse_rows(&rows, IngestMode::HeaderAnchored),
            Err(IngestError::HeaderNotFound)
        ));
        assert!(matches!(
            parse_rows(&[], IngestMode::HeaderAnchored),
            Err(IngestError::HeaderNotFound)
        ));
    }

    #[test]
    fn header_anchored_skips_incomplete_rows() {
        let rows = vec![
            row(&["Etage", "Reference", "Date"]),
            row(&["", "", ""]),
            row(&["fdts", "17/01/2025"]),
            row(&["spte", "", "11/02/2025"]),
            row(&["  ", "R", "11/02/2025"]),
            row(&["rdch", "R", "not a date"]),
            row(&["  1° etg ", "R", "17/03/2025"]),
        ];
        let records = parse_rows(&rows, IngestMode::HeaderAnchored).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].row_label, "1° etg");
        assert_eq!(records[0].etage.to_string(), "PL.HT. 1° ETAGE");
    }

    #[test]
    fn content_anchored_excludes_base_reference_row() {
        let records = parse_rows(&legacy_sheet(), IngestMode::ContentAnchored).unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0].row_label, "fdts");
        assert!(records.iter().all(|r| r.reference.is_none()));
        assert_eq!(records[6].etage, Stage::Floor(3));
        assert_eq!(records[6].date, "18/04/2025");
    }

    #[test]
    fn labels_containing_base_marker_are_never_data() {
        let rows = vec![
            row(&["BA", "318/24"]),
            row(&["RDCH BAT A", "24/02/2025"]),
            row(&["rdch bat b", "25/02/2025"]),
            row(&["1° etg", "17/03/2025"]),
        ];
        let records = parse_rows(&rows, IngestMode::ContentAnchored).unwrap();
        let labels: Vec<&str> = records.iter().map(|r| r.row_label.as_str()).collect();
        assert_eq!(labels, vec!["rdch bat b", "1° etg"]);
    }

    #[test]
    fn content_anchored_accepts_two_cell_rows() {
        let rows = vec![row(&["Chantier X"]), row(&["fdts", "17/01/2025"]), row(&["", ""])];
        let records = parse_rows(&rows, IngestMode::ContentAnchored).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "17/01/2025");
    }

    #[test]
    fn content_anchor_is_required() {
        let rows = vec![row(&["Chantier X", "2025"]), row(&["rdch", "24/02/2025"])];
        assert!(matches!(
            parse_rows(&rows, IngestMode::ContentAnchored),
            Err(IngestError::HeaderNotFound)
        ));
    }

    #[test]
    fn unknown_labels_stay_visible() {
        let rows = vec![row(&["fdts", "17/01/2025"]), row(&["toiture", "02/05/2025"])];
        let records = parse_rows(&rows, IngestMode::ContentAnchored).unwrap();
        assert_eq!(records[1].etage, Stage::Other("TOITURE".into()));
    }
}
