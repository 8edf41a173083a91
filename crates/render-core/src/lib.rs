//! Core rendering abstractions for markup to PDF conversion.
//!
//! This crate provides the contract between the document assembler and the
//! backends that print markup:
//! - `PdfRenderer` / `RenderingContext` traits for scoped access to an
//!   expensive rendering process
//! - `PageLayout` describing paper and margins
//! - `PdfOutput` normalizing whatever a backend hands back into bytes
//! - the page-break directive every backend must honour

mod error;
mod traits;
mod types;

pub use error::RenderError;
pub use traits::{PdfRenderer, RenderingContext};
pub use types::{Margins, PAGE_BREAK, PageLayout, PaperFormat, PdfOutput};
