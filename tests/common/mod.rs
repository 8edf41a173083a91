pub mod renderers;

use coulage::{BaseOptions, PageData};
use lopdf::Document as LopdfDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Raw content stream of one page, 1-based.
    pub fn page_content(&self, page: u32) -> String {
        self.doc
            .get_pages()
            .get(&page)
            .and_then(|id| self.doc.get_page_content(*id).ok())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn page(stage: &str, reference: &str, date: &str) -> PageData {
    PageData {
        stage: stage.into(),
        reference: reference.into(),
        date: date.into(),
        ..Default::default()
    }
}

pub fn base_options() -> BaseOptions {
    BaseOptions {
        city: Some("Casa".into()),
        owner: Some("SOCIETE ARIF LOGEMENT".into()),
        project: Some("IMMEUBLE S/SOL + RDCH + 3 ETAGES".into()),
        address: Some("LOTISSEMENT AL MAMOUNIA LOT 3".into()),
        secondary_reference: Some("BA 318/24".into()),
        notes: Some(vec!["Bien caler les fonds de poutres".into()]),
        logo_base64: None,
    }
}
