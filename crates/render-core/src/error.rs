use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to launch renderer: {0}")]
    Launch(String),
    #[error("Renderer exited with {status}: {stderr}")]
    Process { status: String, stderr: String },
    #[error("Timed out after {0:?} waiting for content")]
    Timeout(Duration),
    #[error("Renderer returned an invalid document: {0}")]
    InvalidOutput(String),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
