//! Instrumented rendering backends.

use async_trait::async_trait;
use base64::Engine;
use coulage::render::DraftRenderer;
use coulage_render_core::{PageLayout, PdfOutput, PdfRenderer, RenderError, RenderingContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Print with the draft backend.
    Draft,
    /// Print with the draft backend, returned as base64 text.
    Base64,
    FailAcquire,
    FailPrint,
    /// Print with the draft backend, then fail to release.
    FailRelease,
    FailPrintAndRelease,
    /// Never finish printing.
    Hang,
    /// Print with the draft backend after a pause.
    Slow(Duration),
}

#[derive(Default)]
pub struct Counters {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub active: AtomicUsize,
    pub peak_active: AtomicUsize,
    pub last_markup: Mutex<Option<String>>,
    pub last_ready_timeout: Mutex<Option<Duration>>,
}

impl Counters {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }

    pub fn last_markup(&self) -> Option<String> {
        self.last_markup.lock().unwrap().clone()
    }
}

pub struct RecordingRenderer {
    behaviour: Behaviour,
    pub counters: Arc<Counters>,
}

impl RecordingRenderer {
    pub fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            counters: Arc::default(),
        })
    }
}

#[async_trait]
impl PdfRenderer for RecordingRenderer {
    async fn acquire(&self) -> Result<Box<dyn RenderingContext>, RenderError> {
        if self.behaviour == Behaviour::FailAcquire {
            return Err(RenderError::Launch("browser missing".into()));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak_active.fetch_max(active, Ordering::SeqCst);
        Ok(Box::new(RecordingContext {
            behaviour: self.behaviour,
            counters: self.counters.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

struct RecordingContext {
    behaviour: Behaviour,
    counters: Arc<Counters>,
}

#[async_trait]
impl RenderingContext for RecordingContext {
    async fn print(
        &mut self,
        markup: &str,
        layout: &PageLayout,
        ready_timeout: Option<Duration>,
    ) -> Result<PdfOutput, RenderError> {
        *self.counters.last_markup.lock().unwrap() = Some(markup.to_string());
        *self.counters.last_ready_timeout.lock().unwrap() = ready_timeout;

        match self.behaviour {
            Behaviour::FailPrint | Behaviour::FailPrintAndRelease => {
                return Err(RenderError::Timeout(Duration::from_millis(5)));
            }
            Behaviour::Hang => std::future::pending::<()>().await,
            Behaviour::Slow(pause) => tokio::time::sleep(pause).await,
            _ => {}
        }

        let mut draft = DraftRenderer.acquire().await?;
        let output = draft.print(markup, layout, ready_timeout).await?.into_bytes()?;
        draft.release().await?;

        Ok(match self.behaviour {
            Behaviour::Base64 => {
                PdfOutput::Base64(base64::engine::general_purpose::STANDARD.encode(output))
            }
            _ => PdfOutput::Buffer(output),
        })
    }

    async fn release(self: Box<Self>) -> Result<(), RenderError> {
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::FailRelease | Behaviour::FailPrintAndRelease => {
                Err(RenderError::Other("profile still locked".into()))
            }
            _ => Ok(()),
        }
    }
}
