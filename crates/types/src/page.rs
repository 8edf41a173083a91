use crate::record::FloorRecord;
use serde::{Deserialize, Serialize};

/// City printed when neither the page nor the batch names one.
pub const DEFAULT_CITY: &str = "Casa";

/// Everything printed on one slip.
///
/// Field names on the wire follow the JSON request bodies (`etage`,
/// `reference_2`, `ville`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageData {
    #[serde(rename = "etage")]
    pub stage: String,
    pub reference: String,
    #[serde(rename = "reference_2")]
    pub secondary_reference: String,
    pub date: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "proprietaire")]
    pub owner: String,
    #[serde(rename = "projet")]
    pub project: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_base64: Option<String>,
}

/// Fields shared by every page of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseOptions {
    #[serde(rename = "ville")]
    pub city: Option<String>,
    #[serde(rename = "proprietaire")]
    pub owner: Option<String>,
    #[serde(rename = "projet")]
    pub project: Option<String>,
    #[serde(rename = "adresse")]
    pub address: Option<String>,
    #[serde(rename = "reference_2")]
    pub secondary_reference: Option<String>,
    pub notes: Option<Vec<String>>,
    pub logo_base64: Option<String>,
}

impl PageData {
    /// Builds the page for one ingested row.
    ///
    /// Stage, date and primary reference always come from the record; the
    /// rest comes from `base`, with `default_city` when the batch names no city.
    pub fn from_record(record: &FloorRecord, base: &BaseOptions, default_city: &str) -> Self {
        Self {
            stage: record.etage.to_string(),
            reference: record
                .reference
                .as_ref()
                .map(|r| r.to_text())
                .unwrap_or_default(),
            secondary_reference: base.secondary_reference.clone().unwrap_or_default(),
            date: record.date.clone(),
            city: non_empty(&base.city).unwrap_or(default_city).to_string(),
            owner: base.owner.clone().unwrap_or_default(),
            project: base.project.clone().unwrap_or_default(),
            address: base.address.clone().unwrap_or_default(),
            notes: base.notes.clone(),
            logo_base64: base.logo_base64.clone(),
        }
    }

    /// Fills the fields this page leaves empty from `base`.
    ///
    /// The batch secondary reference wins over the page's own when it is set.
    pub fn apply_base(&mut self, base: &BaseOptions) {
        if let Some(reference) = non_empty(&base.secondary_reference) {
            self.secondary_reference = reference.to_string();
        }
        fill(&mut self.city, &base.city);
        fill(&mut self.owner, &base.owner);
        fill(&mut self.project, &base.project);
        fill(&mut self.address, &base.address);
        if self.notes.is_none() {
            self.notes = base.notes.clone();
        }
        if self.logo_base64.is_none() {
            self.logo_base64 = base.logo_base64.clone();
        }
    }

    /// Wire names of the required request fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("reference_2", &self.secondary_reference),
            ("proprietaire", &self.owner),
            ("projet", &self.project),
            ("adresse", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn fill(target: &mut String, default: &Option<String>) {
    if target.is_empty() {
        if let Some(value) = non_empty(default) {
            *target = value.to_string();
        }
    }
}
