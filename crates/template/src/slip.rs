use crate::{RenderedPage, TemplateError, TemplateRenderer};
use coulage_types::PageData;
use handlebars::Handlebars;
use serde::Serialize;

const HEAD_TEMPLATE: &str = "slip_head";
const BODY_TEMPLATE: &str = "slip_body";

/// The pour authorization slip layout.
pub struct SlipTemplate {
    engine: Handlebars<'static>,
}

#[derive(Serialize)]
struct SlipView<'a> {
    stage: &'a str,
    reference: &'a str,
    secondary_reference: &'a str,
    date: &'a str,
    city: &'a str,
    owner: &'a str,
    project: &'a str,
    address: &'a str,
    notes: &'a [String],
    logo_src: Option<String>,
}

impl<'a> SlipView<'a> {
    fn new(page: &'a PageData) -> Self {
        Self {
            stage: &page.stage,
            reference: &page.reference,
            secondary_reference: &page.secondary_reference,
            date: &page.date,
            city: &page.city,
            owner: &page.owner,
            project: &page.project,
            address: &page.address,
            notes: page.notes.as_deref().unwrap_or_default(),
            logo_src: page.logo_base64.as_deref().filter(|l| !l.is_empty()).map(logo_src),
        }
    }
}

/// Accepts both bare base64 and complete data URIs.
fn logo_src(logo: &str) -> String {
    if logo.starts_with("data:") {
        logo.to_string()
    } else {
        format!("data:image/png;base64,{logo}")
    }
}

impl SlipTemplate {
    pub fn new() -> Result<Self, TemplateError> {
        let mut engine = Handlebars::new();
        engine.register_template_string(HEAD_TEMPLATE, include_str!("templates/slip_head.hbs"))?;
        engine.register_template_string(BODY_TEMPLATE, include_str!("templates/slip_body.hbs"))?;
        log::debug!("Registered slip templates");
        Ok(Self { engine })
    }
}

impl TemplateRenderer for SlipTemplate {
    fn render(&self, page: &PageData) -> Result<RenderedPage, TemplateError> {
        let view = SlipView::new(page);
        log::debug!("Rendering slip for {} ({})", view.stage, view.date);
        Ok(RenderedPage {
            head: self.engine.render(HEAD_TEMPLATE, &view)?,
            body: self.engine.render(BODY_TEMPLATE, &view)?,
        })
    }
}
