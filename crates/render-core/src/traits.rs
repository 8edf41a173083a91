use crate::error::RenderError;
use crate::types::{PageLayout, PdfOutput};
use async_trait::async_trait;
use std::time::Duration;

/// A capability that hands out rendering contexts.
///
/// Implementations are chosen once at start-up; callers never know whether
/// the context is backed by a browser process or something lighter.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Acquires a fresh context. Each call yields an independent context.
    async fn acquire(&self) -> Result<Box<dyn RenderingContext>, RenderError>;

    /// A human-readable name for this backend (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// One acquired rendering context.
///
/// A context must be released with [`RenderingContext::release`] once the
/// caller is done, whether printing succeeded or not.
#[async_trait]
pub trait RenderingContext: Send {
    /// Prints a complete markup document.
    ///
    /// `ready_timeout` bounds the wait for content (fonts, images) to be ready
    /// before capture; `None` leaves it to the backend.
    async fn print(
        &mut self,
        markup: &str,
        layout: &PageLayout,
        ready_timeout: Option<Duration>,
    ) -> Result<PdfOutput, RenderError>;

    /// Releases the context and everything it holds.
    async fn release(self: Box<Self>) -> Result<(), RenderError>;
}
