use crate::error::RenderError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;

/// Forces the following content onto a new physical page.
pub const PAGE_BREAK: &str = r#"<div class="page-break" style="page-break-after: always; break-after: page;"></div>"#;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaperFormat {
    #[default]
    A4,
}

impl PaperFormat {
    /// Width and height in millimetres.
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            PaperFormat::A4 => (210.0, 297.0),
        }
    }

    pub fn css_name(self) -> &'static str {
        match self {
            PaperFormat::A4 => "A4",
        }
    }
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Paper and print settings handed to a renderer with each document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub format: PaperFormat,
    pub margins: Margins,
    pub print_background: bool,
    /// Wait for web fonts before capturing.
    pub await_fonts: bool,
}

impl PageLayout {
    /// The fixed layout of pour slips: A4, 15mm top/bottom, 20mm left/right,
    /// backgrounds printed.
    pub const fn slip() -> Self {
        Self {
            format: PaperFormat::A4,
            margins: Margins {
                top: 15.0,
                right: 20.0,
                bottom: 15.0,
                left: 20.0,
            },
            print_background: true,
            await_fonts: true,
        }
    }

    /// The `@page` rule and colour settings that reproduce this layout in CSS.
    pub fn to_css(&self) -> String {
        let m = &self.margins;
        let mut css = format!(
            "@page {{ size: {}; margin: {}mm {}mm {}mm {}mm; }}",
            self.format.css_name(),
            m.top,
            m.right,
            m.bottom,
            m.left
        );
        if self.print_background {
            css.push_str(
                " html, body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }",
            );
        }
        css
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::slip()
    }
}

/// What a backend hands back after printing.
#[derive(Debug, Clone)]
pub enum PdfOutput {
    Buffer(Vec<u8>),
    Shared(Arc<[u8]>),
    /// Base64 text, as returned by browser protocols.
    Base64(String),
}

impl PdfOutput {
    /// Converts to an owned byte buffer and checks it is a PDF document.
    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        let bytes = match self {
            PdfOutput::Buffer(bytes) => bytes,
            PdfOutput::Shared(bytes) => bytes.to_vec(),
            PdfOutput::Base64(text) => STANDARD
                .decode(text.trim())
                .map_err(|e| RenderError::InvalidOutput(format!("bad base64: {e}")))?,
        };
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(RenderError::InvalidOutput(format!(
                "missing PDF header in {} bytes",
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}
