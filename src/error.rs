// src/error.rs
use coulage_ingest::IngestError;
use coulage_render_core::RenderError;
use coulage_template::TemplateError;
use std::fmt;
use thiserror::Error;

/// Which generation path failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    SinglePage,
    MultiPage,
    Custom,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderPhase::SinglePage => "Error generating PDF",
            RenderPhase::MultiPage => "Error generating multi-page PDF",
            RenderPhase::Custom => "Error generating custom PDF",
        })
    }
}

/// A comprehensive error type for ingestion and document generation.
#[derive(Error, Debug)]
pub enum CoulageError {
    #[error("Error parsing Excel file: {0}")]
    Ingest(#[from] IngestError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{phase}: {source}")]
    Template {
        phase: RenderPhase,
        #[source]
        source: TemplateError,
    },

    #[error("{phase}: {source}")]
    Render {
        phase: RenderPhase,
        #[source]
        source: RenderError,
    },

    #[error("Template setup failed: {0}")]
    TemplateSetup(#[source] TemplateError),

    #[error("Renderer setup failed: {0}")]
    RendererSetup(#[source] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoulageError {
    pub(crate) fn template(phase: RenderPhase) -> impl FnOnce(TemplateError) -> Self {
        move |source| CoulageError::Template { phase, source }
    }

    pub(crate) fn render(phase: RenderPhase) -> impl FnOnce(RenderError) -> Self {
        move |source| CoulageError::Render { phase, source }
    }

    /// True when the caller sent something unusable (a 4xx-equivalent);
    /// false for failures on our side while generating.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoulageError::Ingest(_) | CoulageError::InvalidRequest(_))
    }
}

pub type Result<T> = std::result::Result<T, CoulageError>;
