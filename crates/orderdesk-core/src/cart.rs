//! # Cart Store
//!
//! Per-session cart keyed by normalized line identity, plus the simple item
//! operations (add/remove/view).
//!
//! ## Line Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   add_item / add_combo              remove_item / remove_combo          │
//! │        │                                   │                            │
//! │        ▼                                   ▼                            │
//! │   key absent? ──► insert (qty)        key absent? ──► LineNotFound      │
//! │        │                                   │                            │
//! │        ▼                                   ▼                            │
//! │   qty += n  (≤ 999)                  n ≥ qty ? delete line             │
//! │                                            : qty -= n                   │
//! │                                                                         │
//! │   A line with quantity 0 is never stored.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing
//! Simple lines carry no price; it is read from the menu whenever the cart
//! is viewed or checked out. Combo lines carry the price computed when the
//! combo was first added.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::key::{ItemKey, LineKey, Modifications};
use crate::menu::Menu;
use crate::money::Money;
use crate::validation::{
    validate_item_name, validate_modifications, validate_quantity, validate_removal_quantity,
};
use crate::{EMPTY_CART_MESSAGE, MAX_CART_LINES, MAX_ITEM_QUANTITY};

// =============================================================================
// Requests
// =============================================================================

/// A simple item add/remove request, as parsed from a tool payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub item_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub modifications: Vec<String>,
}

impl ItemRequest {
    pub fn new(item_name: impl Into<String>, quantity: i64) -> Self {
        ItemRequest {
            item_name: item_name.into(),
            quantity,
            modifications: Vec::new(),
        }
    }

    pub fn with_modifications<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifications = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Normalized line key for this request.
    fn key(&self) -> CoreResult<ItemKey> {
        let name = validate_item_name(&self.item_name)?;
        Ok(ItemKey::new(&name, Modifications::new(&self.modifications)))
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// How a line is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinePricing {
    /// Unit price is the current catalog price.
    Catalog,
    /// Combo price fixed when the line was created.
    Combo { price_per_combo: Money },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub quantity: i64,
    pub pricing: LinePricing,
}

// =============================================================================
// Cart
// =============================================================================

/// One session's shopping cart.
///
/// The map is ordered only so views come out the same every time.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: BTreeMap<LineKey, CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of line quantities (a combo counts once per combo).
    pub fn total_quantity(&self) -> i64 {
        self.lines.values().map(|l| l.quantity).sum()
    }

    pub fn quantity_of(&self, key: &LineKey) -> Option<i64> {
        self.lines.get(key).map(|l| l.quantity)
    }

    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.get(key)
    }

    pub fn lines(&self) -> impl Iterator<Item = (&LineKey, &CartLine)> {
        self.lines.iter()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    // -------------------------------------------------------------------------
    // Item Operations
    // -------------------------------------------------------------------------

    /// Adds a simple item to the cart.
    ///
    /// ## Errors
    /// * `Validation(Required)` - blank item name
    /// * `InvalidQuantity` - quantity < 1, or the line would exceed 999
    /// * `ItemNotFound` - no catalog entry has this exact name
    /// * `InvalidModification` - tag not offered, or "no X" with "extra X"
    /// * `CartTooLarge` - a new line would exceed the line limit
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::cart::{Cart, ItemRequest};
    /// use orderdesk_core::menu_data::house_menu;
    ///
    /// let menu = house_menu();
    /// let mut cart = Cart::new();
    /// let added = cart
    ///     .add_item(&menu, &ItemRequest::new("Big Mac", 2).with_modifications(["no pickles"]))
    ///     .unwrap();
    /// assert_eq!(added.to_string(), "Added 2x Big Mac(s) with no pickles to your cart.");
    /// ```
    pub fn add_item(&mut self, menu: &Menu, request: &ItemRequest) -> CoreResult<AddedItem> {
        let key = request.key()?;
        let quantity = validate_quantity(request.quantity)?;
        let entry = menu.resolve(&request.item_name)?;
        validate_modifications(entry, &key.modifications)?;

        let modifications = key.modifications.clone();
        let line_quantity = self.increment(LineKey::Item(key), quantity, LinePricing::Catalog)?;

        Ok(AddedItem {
            name: entry.name.clone(),
            modifications,
            added: quantity,
            line_quantity,
        })
    }

    /// Removes up to `quantity` units of a simple item line.
    ///
    /// Removing more than the line holds deletes the line; the result reports
    /// how many units actually went.
    pub fn remove_item(&mut self, request: &ItemRequest) -> CoreResult<Removed> {
        let key = request.key()?;
        let quantity = validate_removal_quantity(request.quantity)?;
        self.decrement(LineKey::Item(key), quantity)
    }

    // -------------------------------------------------------------------------
    // Line Bookkeeping
    // -------------------------------------------------------------------------

    /// Adds `quantity` to a line, creating it if absent. Returns the new line
    /// quantity. On error the cart is unchanged.
    pub(crate) fn increment(
        &mut self,
        key: LineKey,
        quantity: i64,
        pricing: LinePricing,
    ) -> CoreResult<i64> {
        if let Some(line) = self.lines.get_mut(&key) {
            let updated = line.quantity + quantity;
            if updated > MAX_ITEM_QUANTITY {
                return Err(CoreError::InvalidQuantity {
                    value: updated.to_string(),
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = updated;
            return Ok(updated);
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.insert(key, CartLine { quantity, pricing });
        Ok(quantity)
    }

    pub(crate) fn decrement(&mut self, key: LineKey, quantity: i64) -> CoreResult<Removed> {
        let Some(line) = self.lines.get_mut(&key) else {
            return Err(CoreError::LineNotFound {
                description: not_in_cart_description(&key),
            });
        };

        if quantity >= line.quantity {
            let removed = line.quantity;
            self.lines.remove(&key);
            return Ok(Removed {
                key,
                removed,
                remaining: 0,
            });
        }

        line.quantity -= quantity;
        let remaining = line.quantity;
        Ok(Removed {
            key,
            removed: quantity,
            remaining,
        })
    }

    // -------------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------------

    /// Renders the cart with current prices.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::cart::{Cart, CartView, ItemRequest};
    /// use orderdesk_core::menu_data::house_menu;
    ///
    /// let menu = house_menu();
    /// let mut cart = Cart::new();
    /// assert!(matches!(cart.view(&menu), CartView::Empty { .. }));
    ///
    /// cart.add_item(&menu, &ItemRequest::new("Cheeseburger", 3)).unwrap();
    /// match cart.view(&menu) {
    ///     CartView::Contents { total_cents, .. } => assert_eq!(total_cents.cents(), 897),
    ///     CartView::Empty { .. } => unreachable!(),
    /// }
    /// ```
    pub fn view(&self, menu: &Menu) -> CartView {
        if self.is_empty() {
            return CartView::Empty {
                message: EMPTY_CART_MESSAGE.to_string(),
            };
        }

        let lines: Vec<CartViewLine> = self
            .lines
            .iter()
            .map(|(key, line)| CartViewLine::price(key, line, menu))
            .collect();
        let total_cents = lines.iter().map(|l| l.line_total).sum();

        CartView::Contents {
            item_count: lines.len(),
            total_quantity: self.total_quantity(),
            total_cents,
            lines,
        }
    }
}

/// Subject for a `LineNotFound` message, e.g. "big mac (no pickles)".
fn not_in_cart_description(key: &LineKey) -> String {
    match key {
        LineKey::Item(item) => item.to_string(),
        LineKey::Combo(combo) => format!("Combo including {}", combo.names()),
    }
}

// =============================================================================
// View Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CartViewLine {
    pub key: LineKey,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    /// False when a simple line's item has left the menu since it was added.
    pub available: bool,
}

impl CartViewLine {
    fn price(key: &LineKey, line: &CartLine, menu: &Menu) -> Self {
        let (description, unit_price) = match (key, line.pricing) {
            (LineKey::Combo(combo), LinePricing::Combo { price_per_combo }) => {
                (combo.to_string(), Some(price_per_combo))
            }
            (LineKey::Item(item), _) => match menu.get(&item.name) {
                Some(entry) => (
                    describe_item(&entry.name, &item.modifications),
                    Some(entry.price()),
                ),
                None => (describe_item(&item.name, &item.modifications), None),
            },
            // Combo keys are only ever inserted with a combo price
            (LineKey::Combo(combo), LinePricing::Catalog) => (combo.to_string(), None),
        };

        let unit_price_or_zero = unit_price.unwrap_or_default();
        CartViewLine {
            key: key.clone(),
            description,
            quantity: line.quantity,
            unit_price: unit_price_or_zero,
            line_total: unit_price_or_zero.multiply_quantity(line.quantity),
            available: unit_price.is_some(),
        }
    }
}

fn describe_item(name: &str, modifications: &Modifications) -> String {
    if modifications.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, modifications.as_slice().join(", "))
    }
}

/// What `view_cart` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum CartView {
    Empty {
        message: String,
    },
    Contents {
        lines: Vec<CartViewLine>,
        item_count: usize,
        total_quantity: i64,
        total_cents: Money,
    },
}

// =============================================================================
// Operation Results
// =============================================================================

/// Outcome of a successful `add_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedItem {
    pub name: String,
    pub modifications: Modifications,
    pub added: i64,
    pub line_quantity: i64,
}

impl fmt::Display for AddedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Added {}x {}(s)", self.added, self.name)?;
        if !self.modifications.is_empty() {
            write!(f, " with {}", self.modifications.joined())?;
        }
        f.write_str(" to your cart.")
    }
}

/// Outcome of a successful item or combo removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub key: LineKey,
    pub removed: i64,
    pub remaining: i64,
}

impl fmt::Display for Removed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = self.remaining == 0;
        match &self.key {
            LineKey::Item(item) => {
                if all {
                    write!(f, "Removed all {} {}(s)", self.removed, item.name)?;
                } else {
                    write!(f, "Removed {}x {}(s)", self.removed, item.name)?;
                }
                if !item.modifications.is_empty() {
                    write!(f, " with {}", item.modifications.joined())?;
                }
                f.write_str(" from your cart.")
            }
            LineKey::Combo(combo) if all => write!(
                f,
                "Removed all {} combo(s) including {} from your cart.",
                self.removed,
                combo.names()
            ),
            LineKey::Combo(combo) => write!(
                f,
                "Removed {} combo(s) including {} from your cart.",
                self.removed,
                combo.names()
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
