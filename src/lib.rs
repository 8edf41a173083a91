//! Pour authorization slip generation.
//!
//! Schedules come in as spreadsheets ([`coulage_ingest`]), become one
//! [`PageData`] per floor pour, and leave as a single paginated PDF built by
//! the [`DocumentAssembler`] through a pluggable rendering backend.

pub mod assembler;
pub mod config;
pub mod error;
pub mod render;

pub use assembler::{DocumentAssembler, pages_from_records};
pub use config::Config;
pub use error::{CoulageError, RenderPhase, Result};

pub use coulage_ingest::{IngestError, IngestMode, ValidationReport, validate};
pub use coulage_render_core::{PageLayout, PdfRenderer, RenderError, RenderingContext};
pub use coulage_template::{SlipTemplate, TemplateRenderer};
pub use coulage_types::{BaseOptions, FloorRecord, PageData, Stage};

use std::sync::Arc;

/// Builds an assembler with the slip template and the configured backend.
pub fn assembler_from_config(config: &Config) -> Result<DocumentAssembler> {
    let template = SlipTemplate::new().map_err(CoulageError::TemplateSetup)?;
    let renderer = render::from_config(&config.renderer).map_err(CoulageError::RendererSetup)?;
    Ok(DocumentAssembler::from_config(config, Arc::new(template), renderer))
}

/// The complete slip markup of one page. Needs no rendering backend.
pub fn preview_markup(page: &PageData) -> Result<String> {
    let template = SlipTemplate::new().map_err(CoulageError::TemplateSetup)?;
    let rendered = template
        .render(page)
        .map_err(CoulageError::template(RenderPhase::SinglePage))?;
    Ok(rendered.to_document())
}
