//! # Entity-Role Taxonomy and Palette
//!
//! The extraction model reports entity roles as free text ("the buyer of the
//! field", "King title", "commodities exchanged"). For grouping and coloring,
//! that long tail is folded onto a fixed controlled vocabulary of canonical
//! labels via an **ordered** substring rule table.
//!
//! Order is load-bearing: several triggers are substrings of other triggers
//! ("apprentice" vs "apprentice giver") or of unrelated words, and the first
//! match wins. The table is therefore a priority-ordered slice, not a map,
//! and its order must never be "cleaned up" — re-sorting it changes the
//! classification of ambiguous inputs.
//!
//! Coloring used to live in two separately maintained tables (legend vs
//! inline rendering) that drifted apart; here a single injectable [`Palette`]
//! backs both.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Color assigned to labels the palette does not know (including the
/// capitalized-fallback case of [`normalize_label`]).
pub const DEFAULT_COLOR: &str = "#D3D3D3";

/// Ordered `(trigger, canonical label)` rules, evaluated top to bottom
/// against the lower-cased raw label. First substring hit wins.
///
/// Some entries are shadowed by earlier ones ("apprentice giver" can never
/// fire after "apprentice"). They stay where they are: moving or removing
/// them changes how ambiguous inputs classify.
const LABEL_RULES: &[(&str, &str)] = &[
    ("commodit", "Commodities"),
    ("location", "Locations"),
    ("document", "Documents"),
    ("animal", "Animals"),
    ("person", "Person"),
    ("judge", "Judge"),
    ("adoptee", "Adoptee"),
    ("adopter", "Adopter"),
    ("parent", "Parent"),
    ("apprentice", "Apprentice"),
    ("apprentice giver", "Apprentice Giver"),
    ("trainer", "Trainer"),
    ("obligee", "Obligee"),
    ("obligor", "Obligor"),
    ("litigant", "Litigant"),
    ("defendant", "Defendant"),
    ("plaintiff", "Plaintiff"),
    ("deponent", "Deponent"),
    ("heir", "Heir"),
    ("testator", "Testator"),
    ("exchanger", "Exchanger"),
    ("donee", "Donee"),
    ("donor", "Donor"),
    ("lessee", "Lessee"),
    ("lessor", "Lessor"),
    ("creditor", "Creditor"),
    ("debtor", "Debtor"),
    ("manumitter", "Manumitter"),
    ("manumitted slave", "Manumitted Slave"),
    ("bride", "Bride"),
    ("bride's agent", "Bride's Agent"),
    ("bride\u{2019}s agent", "Bride's Agent"),
    ("groom", "Groom"),
    ("groom's agent", "Groom's Agent"),
    ("groom\u{2019}s agent", "Groom's Agent"),
    ("king", "King"),
    ("oath taker", "Oath Taker"),
    ("business partner", "Business Partner"),
    ("prebend-giver", "Prebend-giver"),
    ("prebend-holder", "Prebend-holder"),
    ("prebend-performer", "Prebend-performer"),
    ("buyer", "Buyer"),
    ("seller", "Seller"),
    ("payer", "Payer"),
    ("recipient", "Recipient"),
    ("summoner", "Summoner"),
    ("person to be summoned", "Person to be summoned"),
    ("guarantor", "Guarantor"),
    ("witness", "Witness"),
    ("scribe", "Scribe"),
];

/// Canonical label → display color. The two agent keys use the curly
/// apostrophe, so canonical "Bride's Agent" (straight apostrophe) resolves
/// to [`DEFAULT_COLOR`].
const LABEL_COLORS: &[(&str, &str)] = &[
    ("Commodities", "#7FFFD4"),
    ("Locations", "#00FFFF"),
    ("Documents", "#4682B4"),
    ("Animals", "#A52A2A"),
    ("Adoptee", "#DEB887"),
    ("Adopter", "#5F9EA0"),
    ("Parent", "#D2691E"),
    ("Apprentice", "#FF7F50"),
    ("Apprentice Giver", "#6495ED"),
    ("Trainer", "#FFF8DC"),
    ("Obligee", "#DC143C"),
    ("Obligor", "#00FFFF"),
    ("Judge", "#00008B"),
    ("Litigant", "#008B8B"),
    ("Defendant", "#B8860B"),
    ("Plaintiff", "#A9A9A9"),
    ("Deponent", "#006400"),
    ("Heir", "#BDB76B"),
    ("Testator", "#8B008B"),
    ("Exchanger", "#556B2F"),
    ("Donee", "#FF8C00"),
    ("Donor", "#9932CC"),
    ("Lessee", "#8B0000"),
    ("Lessor", "#E9967A"),
    ("Creditor", "#8FBC8F"),
    ("Debtor", "#483D8B"),
    ("Manumitter", "#2F4F4F"),
    ("Manumitted Slave", "#00CED1"),
    ("Bride", "#9400D3"),
    ("Bride\u{2019}s Agent", "#FF1493"),
    ("Groom", "#00BFFF"),
    ("Groom\u{2019}s Agent", "#696969"),
    ("King", "#1E90FF"),
    ("Oath Taker", "#B22222"),
    ("Business Partner", "#FFFAF0"),
    ("Prebend-giver", "#228B22"),
    ("Prebend-holder", "#FF00FF"),
    ("Prebend-performer", "#DCDCDC"),
    ("Buyer", "#F8F8FF"),
    ("Seller", "#FFD700"),
    ("Payer", "#DAA520"),
    ("Recipient", "#808080"),
    ("Summoner", "#008000"),
    ("Person to be summoned", "#ADFF2F"),
    ("Guarantor", "#F0FFF0"),
    ("Witness", "#FF69B4"),
    ("Scribe", "#CD5C5C"),
];

/// Maps a free-text entity role onto its canonical label.
///
/// Lower-cases the input, walks [`LABEL_RULES`] in order, and returns the
/// canonical label of the first trigger contained in the input. Unmatched
/// labels pass through with the first grapheme upper-cased and the remainder
/// lower-cased. Pure and total.
///
/// # Example
/// ```
/// use nerviz_core::taxonomy::normalize_label;
///
/// assert_eq!(normalize_label("King title"), "King");
/// assert_eq!(normalize_label("the BUYER of the field"), "Buyer");
/// assert_eq!(normalize_label("harbor master"), "Harbor master");
/// ```
pub fn normalize_label(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    for (trigger, canonical) in LABEL_RULES {
        if lowered.contains(trigger) {
            return (*canonical).to_string();
        }
    }
    capitalize(raw)
}

/// First grapheme upper-cased, remainder lower-cased.
fn capitalize(s: &str) -> String {
    let mut graphemes = s.graphemes(true);
    match graphemes.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), graphemes.as_str().to_lowercase()),
        None => String::new(),
    }
}

/// Injectable label → color table shared by the legend and the inline
/// renderer, so the two can no longer drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    colors: BTreeMap<String, String>,
    default_color: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: LABEL_COLORS
                .iter()
                .map(|(label, color)| (label.to_string(), color.to_string()))
                .collect(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Palette {
    /// Display color for a canonical label; unknown labels get the neutral
    /// default.
    pub fn color_for(&self, label: &str) -> &str {
        self.colors
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    /// Overrides (or adds) one entry. Meant for configuration, not per-call
    /// use; lookups stay pure afterwards.
    pub fn set(&mut self, label: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(label.into(), color.into());
    }
}
