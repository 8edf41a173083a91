//! Document assembly: page data in, one paginated PDF out.

use crate::config::Config;
use crate::error::{CoulageError, RenderPhase, Result};
use coulage_render_core::{PAGE_BREAK, PageLayout, PdfOutput, PdfRenderer, RenderError};
use coulage_template::{TemplateRenderer, wrap_document};
use coulage_types::{BaseOptions, FloorRecord, PageData};
use itertools::Itertools;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{Instant, timeout_at};

const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Builds one page per ingested row, in row order.
pub fn pages_from_records(
    records: &[FloorRecord],
    base: &BaseOptions,
    default_city: &str,
) -> Vec<PageData> {
    records
        .iter()
        .map(|record| PageData::from_record(record, base, default_city))
        .collect()
}

/// Turns page data into PDF documents.
///
/// Every generation acquires its own rendering context, holds one admission
/// permit while the context is alive and releases the context on every
/// exit path. Nothing is shared between generations.
pub struct DocumentAssembler {
    template: Arc<dyn TemplateRenderer>,
    renderer: Arc<dyn PdfRenderer>,
    layout: PageLayout,
    ready_timeout: Duration,
    request_timeout: Duration,
    admission: Arc<Semaphore>,
}

impl DocumentAssembler {
    pub fn new(template: Arc<dyn TemplateRenderer>, renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            template,
            renderer,
            layout: PageLayout::slip(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            admission: Arc::new(Semaphore::new(num_cpus::get())),
        }
    }

    pub fn from_config(
        config: &Config,
        template: Arc<dyn TemplateRenderer>,
        renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self::new(template, renderer)
            .with_ready_timeout(config.limits.content_ready_timeout())
            .with_request_timeout(config.limits.request_timeout())
            .with_max_concurrent(config.limits.max_concurrent_renders)
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Bounds the wait for content to be ready in multi-page renders.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Deadline for a whole generation, admission wait included.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, permits: usize) -> Self {
        self.admission = Arc::new(Semaphore::new(permits.max(1)));
        self
    }

    /// The complete markup of one page, without printing it.
    pub fn preview_html(&self, page: &PageData) -> Result<String> {
        let rendered = self
            .template
            .render(page)
            .map_err(CoulageError::template(RenderPhase::SinglePage))?;
        Ok(rendered.to_document())
    }

    /// Prints a single slip.
    pub async fn render_single(&self, page: &PageData) -> Result<Vec<u8>> {
        let markup = self.preview_html(page)?;
        self.print(RenderPhase::SinglePage, &markup, &self.layout, None)
            .await
    }

    /// Prints caller-supplied markup with a caller-supplied layout.
    pub async fn render_custom(&self, markup: &str, layout: &PageLayout) -> Result<Vec<u8>> {
        self.print(RenderPhase::Custom, markup, layout, Some(self.ready_timeout))
            .await
    }

    /// Prints one slip per entry of `pages`, in order, as a single document.
    pub async fn render_many(&self, pages: &[PageData], base: &BaseOptions) -> Result<Vec<u8>> {
        let markup = self.combine(pages, base)?;
        let bytes = self
            .print(RenderPhase::MultiPage, &markup, &self.layout, Some(self.ready_timeout))
            .await?;
        log::info!("Generated {}-page document ({} bytes)", pages.len(), bytes.len());
        Ok(bytes)
    }

    /// Merges the pages into one document.
    ///
    /// The first page's head is used for the whole document, so all pages
    /// share its styles. Bodies follow in input order, separated by a page
    /// break (none after the last).
    pub fn combine(&self, pages: &[PageData], base: &BaseOptions) -> Result<String> {
        if pages.is_empty() {
            return Err(CoulageError::InvalidRequest("no pages to render".into()));
        }

        let mut head = None;
        let mut bodies = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let mut page = page.clone();
            page.apply_base(base);
            let rendered = self
                .template
                .render(&page)
                .map_err(CoulageError::template(RenderPhase::MultiPage))?;
            log::debug!("Rendered page {} ({})", index + 1, page.stage);
            head.get_or_insert(rendered.head);
            bodies.push(rendered.body);
        }

        let body = bodies.iter().join(&format!("\n{PAGE_BREAK}\n"));
        Ok(wrap_document(&head.unwrap_or_default(), &body))
    }

    async fn print(
        &self,
        phase: RenderPhase,
        markup: &str,
        layout: &PageLayout,
        ready_timeout: Option<Duration>,
    ) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.request_timeout;
        let expired = || CoulageError::render(phase)(RenderError::Timeout(self.request_timeout));

        let _permit = timeout_at(deadline, self.admission.acquire())
            .await
            .map_err(|_| expired())?
            .map_err(|_| CoulageError::render(phase)(RenderError::from("admission closed")))?;

        let mut context = timeout_at(deadline, self.renderer.acquire())
            .await
            .map_err(|_| expired())?
            .map_err(CoulageError::render(phase))?;

        let printed = match timeout_at(deadline, context.print(markup, layout, ready_timeout)).await
        {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout(self.request_timeout)),
        };

        if let Err(e) = context.release().await {
            log::warn!("Failed to release {} rendering context: {e}", self.renderer.name());
        }

        printed
            .and_then(PdfOutput::into_bytes)
            .map_err(CoulageError::render(phase))
    }
}
