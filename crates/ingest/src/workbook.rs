//! First-sheet extraction from `.xlsx` / `.xls` / `.xlsm` bytes.

use crate::error::IngestError;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use coulage_types::{CellValue, RawRow};
use std::io::Cursor;

/// Reads the first sheet of a workbook into rows of cells.
///
/// Rows and columns keep their sheet positions: leading empty rows and
/// columns are materialized as empty cells, trailing empty cells of each
/// row are dropped. Other sheets are ignored.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<RawRow>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    if workbook.sheet_names().is_empty() {
        return Err(IngestError::EmptyWorkbook);
    }
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;

    let Some((first_row, first_col)) = range.start() else {
        return Ok(Vec::new());
    };

    let mut rows: Vec<RawRow> = vec![Vec::new(); first_row as usize];
    for cells in range.rows() {
        let mut row: RawRow = vec![CellValue::Empty; first_col as usize];
        row.extend(cells.iter().map(to_cell));
        while row.last().is_some_and(|c| *c == CellValue::Empty) {
            row.pop();
        }
        rows.push(row);
    }

    log::debug!("Read {} rows from first sheet", rows.len());
    Ok(rows)
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // date-formatted cells keep their serial value, like unformatted numbers
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}
