//! Mapping of free-text schedule labels to construction stages.

use coulage_types::Stage;

/// Marker of upper floors in schedule labels ("1° etg").
const FLOOR_MARKER: &str = "etg";

/// Ordered keyword rules; the first rule with a matching keyword wins.
const KEYWORD_RULES: &[(&[&str], Stage)] = &[
    (&["fdts", "fondation"], Stage::Foundations),
    (&["dalle"], Stage::Slab),
    (&["s/sol", "ssol"], Stage::Basement),
    (&["spte", "soupente"], Stage::Mezzanine),
    (&["rdch", "r.d.ch"], Stage::GroundFloor),
];

/// Maps a schedule label to its stage, case-insensitively.
///
/// Upper floors are recognised by a digit 1 to 6 anywhere in a label that
/// also contains the floor marker, lowest digit first, so "10 etg" reads as
/// the first floor. Labels matching nothing come back uppercased.
pub fn map_label(label: &str) -> Stage {
    let lower = label.to_lowercase();

    for (keywords, stage) in KEYWORD_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return stage.clone();
        }
    }

    if lower.contains(FLOOR_MARKER) {
        if let Some(n) = (1..=6u8).find(|n| lower.contains(char::from(b'0' + n))) {
            return Stage::Floor(n);
        }
    }

    Stage::Other(label.to_uppercase())
}
