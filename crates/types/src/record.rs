use crate::cell::CellValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The construction stage a slip covers.
///
/// Labels that match no known stage are carried as [`Stage::Other`] holding
/// the uppercased source label, so they still show up on the slip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Foundations,
    Slab,
    Basement,
    Mezzanine,
    GroundFloor,
    /// Upper floor 1 to 6.
    Floor(u8),
    Other(String),
}

impl Stage {
    /// Parses a stage from its printed form. Unknown text becomes [`Stage::Other`].
    pub fn from_printed(s: &str) -> Self {
        match s {
            "FONDATIONS" => Stage::Foundations,
            "DALLAGE" => Stage::Slab,
            "PL.HT. S/SOL" => Stage::Basement,
            "SOUPENTE" => Stage::Mezzanine,
            "PL.HT. R.D.CH" => Stage::GroundFloor,
            _ => s
                .strip_prefix("PL.HT. ")
                .and_then(|rest| rest.strip_suffix("° ETAGE"))
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=6).contains(n))
                .map(Stage::Floor)
                .unwrap_or_else(|| Stage::Other(s.to_string())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Foundations => f.write_str("FONDATIONS"),
            Stage::Slab => f.write_str("DALLAGE"),
            Stage::Basement => f.write_str("PL.HT. S/SOL"),
            Stage::Mezzanine => f.write_str("SOUPENTE"),
            Stage::GroundFloor => f.write_str("PL.HT. R.D.CH"),
            Stage::Floor(n) => write!(f, "PL.HT. {n}° ETAGE"),
            Stage::Other(label) => f.write_str(label),
        }
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Stage::from_printed(&s))
    }
}

/// One validated floor-pour row.
///
/// Only rows with a non-empty label and a parsable date are ever turned into
/// a `FloorRecord`; there is no partially filled variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorRecord {
    /// Source label, trimmed.
    pub row_label: String,
    /// Primary reference, copied verbatim. Absent for content-anchored sheets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<CellValue>,
    pub etage: Stage,
    /// `DD/MM/YYYY`.
    pub date: String,
    /// The date cell exactly as read.
    pub raw_date: CellValue,
}
