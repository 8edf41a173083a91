//! Rendering backends and their selection.

pub mod chrome;
pub mod draft;

pub use chrome::ChromeRenderer;
pub use draft::DraftRenderer;

use crate::config::{BackendKind, RendererConfig};
use coulage_render_core::{PdfRenderer, RenderError};
use std::sync::Arc;

/// Resolves the configured backend once, at start-up.
pub fn from_config(config: &RendererConfig) -> Result<Arc<dyn PdfRenderer>, RenderError> {
    let renderer: Arc<dyn PdfRenderer> = match config.backend {
        BackendKind::Draft => Arc::new(DraftRenderer),
        BackendKind::Chrome => {
            let executable = ChromeRenderer::locate(config.chrome_executable.as_deref())?;
            Arc::new(ChromeRenderer::new(executable, config.chrome_args.clone()))
        }
    };
    log::info!("Using '{}' rendering backend", renderer.name());
    Ok(renderer)
}
