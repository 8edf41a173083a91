use crate::{IngestMode, parse};
use coulage_types::FloorRecord;
use serde::Serialize;

/// Outcome of checking an uploaded schedule before generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<FloorRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    pub fn accepted(rows: Vec<FloorRecord>) -> Self {
        Self {
            valid: true,
            row_count: Some(rows.len()),
            rows: Some(rows),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            row_count: None,
            rows: None,
            error: Some(error.into()),
        }
    }
}

/// Parses a header-anchored schedule and reports the outcome.
///
/// Never fails: malformed input and a schedule without usable rows both
/// produce a rejected report.
pub fn validate(bytes: &[u8]) -> ValidationReport {
    match parse(bytes, IngestMode::HeaderAnchored) {
        Ok(rows) if rows.is_empty() => {
            ValidationReport::rejected("No valid data rows found in Excel file")
        }
        Ok(rows) => ValidationReport::accepted(rows),
        Err(e) => {
            log::debug!("Schedule rejected: {e}");
            ValidationReport::rejected(e.to_string())
        }
    }
}
