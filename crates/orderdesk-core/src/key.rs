//! # Cart Line Keys
//!
//! The identity of a cart line is its normalized content, never a surrogate id.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Line Identity                                   │
//! │                                                                         │
//! │  add_to_cart("BIG MAC", ["No Pickles", "Extra Cheese"])                 │
//! │       │                                                                 │
//! │       ▼  trim + lowercase name, trim + lowercase + sort tags           │
//! │  LineKey::Item { "big mac", ["extra cheese", "no pickles"] }            │
//! │                                                                         │
//! │  add_combo(entree, side, drink)                                         │
//! │       │                                                                 │
//! │       ▼  each component normalized the same way                         │
//! │  LineKey::Combo { entree: ItemKey, side: ItemKey, drink: ItemKey }      │
//! │                                                                         │
//! │  Equal keys = same line. Changing any component or tag = new line.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::ComboSlot;

/// Normalizes an item name for keying and lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Modifications
// =============================================================================

/// A canonical, order-independent list of modification tags.
///
/// Tags are trimmed, lower-cased and sorted. Blank tags are dropped.
/// Duplicates are kept: `["no salt", "no salt"]` is a valid (if odd) key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Modifications(Vec<String>);

impl Modifications {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<String> = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        Modifications(tags)
    }

    pub fn none() -> Self {
        Modifications(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Joins tags with " and ", as used in confirmation messages.
    pub fn joined(&self) -> String {
        self.0.join(" and ")
    }
}

// =============================================================================
// Item Key
// =============================================================================

/// Identity of a simple line, or of one component inside a combo.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemKey {
    pub name: String,
    pub modifications: Modifications,
}

impl ItemKey {
    pub fn new(name: &str, modifications: Modifications) -> Self {
        ItemKey {
            name: normalize_name(name),
            modifications,
        }
    }
}

/// `big mac (extra cheese, no pickles)`
impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifications.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.modifications.0.join(", "))
        }
    }
}

// =============================================================================
// Combo Key
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComboKey {
    pub entree: ItemKey,
    pub side: ItemKey,
    pub drink: ItemKey,
}

impl ComboKey {
    pub fn component(&self, slot: ComboSlot) -> &ItemKey {
        match slot {
            ComboSlot::Entree => &self.entree,
            ComboSlot::Side => &self.side,
            ComboSlot::Drink => &self.drink,
        }
    }

    /// Component names only: `big mac, french fries (small), and sprite (medium)`.
    pub fn names(&self) -> String {
        format!(
            "{}, {}, and {}",
            self.entree.name, self.side.name, self.drink.name
        )
    }
}

impl fmt::Display for ComboKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "combo of {}, {}, and {}",
            self.entree, self.side, self.drink
        )
    }
}

// =============================================================================
// Line Key
// =============================================================================

/// The sole identity test for cart lines.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LineKey {
    Item(ItemKey),
    Combo(ComboKey),
}

impl LineKey {
    pub fn is_combo(&self) -> bool {
        matches!(self, LineKey::Combo(_))
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKey::Item(key) => key.fmt(f),
            LineKey::Combo(key) => key.fmt(f),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifications_are_order_independent() {
        let a = Modifications::new(["No Pickles", " extra cheese"]);
        let b = Modifications::new(["extra cheese", "no pickles"]);
        assert_eq!(a, b);
        assert_eq!(a.as_slice(), ["extra cheese", "no pickles"]);
    }

    #[test]
    fn test_modifications_keep_duplicates_and_drop_blanks() {
        let mods = Modifications::new(["no salt", "", "  ", "No Salt"]);
        assert_eq!(mods.as_slice(), ["no salt", "no salt"]);
        assert_ne!(mods, Modifications::new(["no salt"]));
    }

    #[test]
    fn test_item_key_normalizes_name() {
        let a = ItemKey::new("  BIG MAC ", Modifications::none());
        let b = ItemKey::new("big mac", Modifications::none());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "big mac");
    }

    #[test]
    fn test_combo_keys_differ_by_component_modifications() {
        let plain = ComboKey {
            entree: ItemKey::new("Big Mac", Modifications::none()),
            side: ItemKey::new("French Fries (Small)", Modifications::none()),
            drink: ItemKey::new("Coca-Cola (Medium)", Modifications::none()),
        };
        let mut iced = plain.clone();
        iced.drink = ItemKey::new("Coca-Cola (Medium)", Modifications::new(["no ice"]));

        assert_ne!(LineKey::Combo(plain), LineKey::Combo(iced));
    }

    #[test]
    fn test_display() {
        let key = ItemKey::new("Big Mac", Modifications::new(["no pickles", "extra cheese"]));
        assert_eq!(key.to_string(), "big mac (extra cheese, no pickles)");
        assert_eq!(key.modifications.joined(), "extra cheese and no pickles");
    }
}
