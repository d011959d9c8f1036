//! # Domain Types
//!
//! Catalog types shared by the menu, cart and database layers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │    CatalogEntry      │   │    ItemType     │   │   ComboSlot     │   │
//! │  │  ──────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  name (unique, ci)   │   │  Entree         │   │  Entree         │   │
//! │  │  category            │   │  Side           │   │  Side           │   │
//! │  │  price_cents         │   │  Drink          │   │  Drink          │   │
//! │  │  calories            │   │  Other          │   └─────────────────┘   │
//! │  │  item_type           │   └─────────────────┘                         │
//! │  │  allowed_modifications│                                              │
//! │  └──────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Item Type
// =============================================================================

/// What role a catalog entry can play in a combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Entree,
    Side,
    Drink,
    /// Sellable on its own but never part of a combo (desserts, sauces).
    Other,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Entree => "entree",
            ItemType::Side => "side",
            ItemType::Drink => "drink",
            ItemType::Other => "other",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entree" | "main" => Ok(ItemType::Entree),
            "side" => Ok(ItemType::Side),
            "drink" | "beverage" => Ok(ItemType::Drink),
            "other" => Ok(ItemType::Other),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("unknown item type '{}': expected entree, side, drink or other", other),
            )),
        }
    }
}

// =============================================================================
// Combo Slot
// =============================================================================

/// One of the three positions in a combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboSlot {
    Entree,
    Side,
    Drink,
}

impl ComboSlot {
    /// Slots in the order they appear in a combo key.
    pub const ALL: [ComboSlot; 3] = [ComboSlot::Entree, ComboSlot::Side, ComboSlot::Drink];

    /// The catalog type an entry must have to fill this slot.
    pub const fn expected_type(&self) -> ItemType {
        match self {
            ComboSlot::Entree => ItemType::Entree,
            ComboSlot::Side => ItemType::Side,
            ComboSlot::Drink => ItemType::Drink,
        }
    }
}

impl fmt::Display for ComboSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expected_type().as_str())
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// One sellable menu item, immutable once the menu is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    /// Display name, unique within the menu ignoring case.
    pub name: String,

    /// Menu section, e.g. "Burgers" or "Beverages".
    pub category: String,

    pub description: Option<String>,

    /// Price in cents.
    pub price_cents: i64,

    pub calories: i64,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// Tags such as "no pickles" or "extra cheese". "no X" and "extra X" are
    /// mutually exclusive; the cart enforces it, the catalog does not.
    #[serde(default)]
    pub allowed_modifications: Vec<String>,
}

impl CatalogEntry {
    /// Creates an entry with no description and no modifications.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price_cents: i64,
        calories: i64,
        item_type: ItemType,
    ) -> Self {
        CatalogEntry {
            name: name.into(),
            category: category.into(),
            description: None,
            price_cents,
            calories,
            item_type,
            allowed_modifications: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_modifications<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_modifications = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether a normalized tag is offered for this item.
    pub fn allows(&self, tag: &str) -> bool {
        self.allowed_modifications
            .iter()
            .any(|allowed| allowed.trim().eq_ignore_ascii_case(tag))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
