//! Shared data model for pour authorization slips.
//!
//! - [`CellValue`] / [`RawRow`]: untyped spreadsheet cells as read from a workbook
//! - [`FloorRecord`]: one validated floor-pour row produced by ingestion
//! - [`Stage`]: the normalized construction stage printed on a slip
//! - [`PageData`] / [`BaseOptions`]: the per-page payload and its batch defaults

pub mod cell;
pub mod page;
pub mod record;

pub use cell::{CellValue, RawRow};
pub use page::{BaseOptions, DEFAULT_CITY, PageData};
pub use record::{FloorRecord, Stage};
