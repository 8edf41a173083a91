//! Browser-free draft backend.
//!
//! Writes the visible text of each page fragment onto its own A4 page with
//! a built-in font. No styling, images or layout beyond margins and page
//! breaks: good enough for proofreading a batch and for offline use.

use async_trait::async_trait;
use coulage_render_core::{
    PAGE_BREAK, PageLayout, PdfOutput, PdfRenderer, RenderError, RenderingContext,
};
use itertools::Itertools;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use scraper::{ElementRef, Html, Node};
use std::time::Duration;

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const FONT_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 14.0;
/// Average Helvetica glyph width relative to the font size.
const GLYPH_WIDTH: f32 = 0.5;

const BLOCK_TAGS: &[&str] = &[
    "br", "div", "p", "li", "ul", "ol", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];
const CELL_TAGS: &[&str] = &["td", "th", "span"];
const SKIPPED_TAGS: &[&str] = &["style", "script", "title"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DraftRenderer;

#[async_trait]
impl PdfRenderer for DraftRenderer {
    async fn acquire(&self) -> Result<Box<dyn RenderingContext>, RenderError> {
        Ok(Box::new(DraftContext))
    }

    fn name(&self) -> &'static str {
        "draft"
    }
}

struct DraftContext;

#[async_trait]
impl RenderingContext for DraftContext {
    async fn print(
        &mut self,
        markup: &str,
        layout: &PageLayout,
        _ready_timeout: Option<Duration>,
    ) -> Result<PdfOutput, RenderError> {
        let body = coulage_template::split_markup(markup)
            .map(|page| page.body)
            .unwrap_or_else(|_| markup.to_string());
        let pages: Vec<Vec<String>> = body.split(PAGE_BREAK).map(visible_lines).collect();
        Ok(PdfOutput::Buffer(write_pdf(&pages, layout)?))
    }

    async fn release(self: Box<Self>) -> Result<(), RenderError> {
        Ok(())
    }
}

fn write_pdf(pages: &[Vec<String>], layout: &PageLayout) -> Result<Vec<u8>, RenderError> {
    let (width_mm, height_mm) = layout.format.size_mm();
    let (width, height) = (width_mm * POINTS_PER_MM, height_mm * POINTS_PER_MM);
    let margins = layout.margins;
    let left = margins.left * POINTS_PER_MM;
    let top = height - margins.top * POINTS_PER_MM - FONT_SIZE;
    let usable_height = height - (margins.top + margins.bottom) * POINTS_PER_MM;
    let max_lines = (usable_height / LINE_HEIGHT).floor() as usize;
    let max_chars = ((width - (margins.left + margins.right) * POINTS_PER_MM)
        / (FONT_SIZE * GLYPH_WIDTH))
        .floor() as usize;

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("TL", vec![LINE_HEIGHT.into()]),
            Operation::new("Td", vec![left.into(), top.into()]),
        ];
        for line in lines.iter().flat_map(|l| wrap(l, max_chars)).take(max_lines) {
            operations.push(Operation::new("Tj", vec![win_ansi(&line)]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buffer)
}

/// Characters outside Latin-1 print as `?`.
fn win_ansi(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

fn wrap(line: &str, max_chars: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

/// The text a reader would see in a markup fragment, one entry per line.
fn visible_lines(fragment: &str) -> Vec<String> {
    let document = Html::parse_fragment(fragment);
    let mut text = String::new();
    collect_text(document.root_element(), &mut text);

    text.lines()
        .map(|line| line.split_whitespace().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let separator = if BLOCK_TAGS.contains(&name) {
                    Some('\n')
                } else if CELL_TAGS.contains(&name) {
                    Some(' ')
                } else {
                    None
                };
                out.extend(separator);
                collect_text(child, out);
                out.extend(separator);
            }
            _ => {}
        }
    }
}
