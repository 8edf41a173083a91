use crate::{RenderedPage, TemplateError, TemplateRenderer};
use coulage_types::PageData;
use once_cell::sync::Lazy;
use regex::Regex;

static HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<head(?:\s[^>]*)?>(.*?)</head>").unwrap());
static BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body(?:\s[^>]*)?>(.*?)</body>").unwrap());

/// Splits a full markup document into its head and body contents.
pub fn split_markup(markup: &str) -> Result<RenderedPage, TemplateError> {
    let section = |re: &Regex, name: &'static str| {
        re.captures(markup)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(TemplateError::MissingSection(name))
    };
    Ok(RenderedPage {
        head: section(&HEAD, "head")?,
        body: section(&BODY, "body")?,
    })
}

/// Adapts a template that only returns complete markup.
///
/// The markup is split on its `<head>` and `<body>` tags after each render;
/// a document missing either fails the render.
pub struct MarkupTemplate<F> {
    render: F,
}

impl<F> MarkupTemplate<F>
where
    F: Fn(&PageData) -> String + Send + Sync,
{
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> TemplateRenderer for MarkupTemplate<F>
where
    F: Fn(&PageData) -> String + Send + Sync,
{
    fn render(&self, page: &PageData) -> Result<RenderedPage, TemplateError> {
        split_markup(&(self.render)(page))
            .inspect_err(|e| log::warn!("Template markup for {} rejected: {e}", page.stage))
    }
}
