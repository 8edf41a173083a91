use thiserror::Error;

/// Malformed spreadsheet input. Individual bad rows are never an error:
/// they are skipped during parsing.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Excel file has no sheets")]
    EmptyWorkbook,

    #[error("Header row not found in Excel file")]
    HeaderNotFound,

    #[error("Unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),
}
