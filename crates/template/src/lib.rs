//! Page templates for pour authorization slips.
//!
//! A template turns one [`PageData`] into a [`RenderedPage`]: the document
//! shell (`head`, holding metadata and styles) and the page content
//! (`body`) kept apart, so pages can be merged into one document without
//! re-parsing markup.
//!
//! - [`SlipTemplate`]: the built-in slip layout (handlebars)
//! - [`MarkupTemplate`]: adapter for templates that only produce full markup

mod markup;
mod slip;

pub use markup::{MarkupTemplate, split_markup};
pub use slip::SlipTemplate;

use coulage_types::PageData;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template parsing failed: {0}")]
    Parse(#[from] handlebars::TemplateError),

    #[error("Template execution failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Markup has no <{0}> section")]
    MissingSection(&'static str),
}

/// One page of markup, split into its document shell and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Everything inside `<head>`.
    pub head: String,
    /// Everything inside `<body>`.
    pub body: String,
}

impl RenderedPage {
    pub fn new(head: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            body: body.into(),
        }
    }

    /// Wraps the two parts into a standalone document.
    pub fn to_document(&self) -> String {
        wrap_document(&self.head, &self.body)
    }
}

/// Builds a complete document from a head and a body.
pub fn wrap_document(head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"fr\">\n\
         <head>\n{head}\n</head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n"
    )
}

/// Renders page data into markup.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, page: &PageData) -> Result<RenderedPage, TemplateError>;
}
