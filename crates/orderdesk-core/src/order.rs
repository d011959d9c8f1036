//! # Order Snapshots
//!
//! `Cart::checkout` freezes a cart into an [`OrderRecord`] that the order
//! sink persists. Clearing the cart is the caller's job, and happens only
//! after the sink accepted the record.
//!
//! ```text
//! Cart ──checkout(menu, session, now)──► OrderRecord ──sink.insert──► ok?
//!                                                                     │
//!                                                ┌────────────────────┴───┐
//!                                                ▼                        ▼
//!                                       cart.clear()              cart untouched
//!                                       OrderReceipt              PersistenceFailure
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartView};
use crate::error::{CoreError, CoreResult};
use crate::key::LineKey;
use crate::menu::Menu;
use crate::money::Money;

// =============================================================================
// Order Record
// =============================================================================

/// One priced line of a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub key: LineKey,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything the order sink stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderRecord {
    #[ts(type = "string")]
    pub id: Uuid,
    pub session_id: String,
    /// UTC, RFC 3339.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
    pub total_cents: Money,
}

impl OrderRecord {
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn receipt(&self) -> OrderReceipt {
        OrderReceipt {
            order_id: self.id,
            created_at: self.created_at,
            line_count: self.lines.len(),
            total_quantity: self.total_quantity(),
            total_cents: self.total_cents,
        }
    }
}

/// Returned to the caller after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderReceipt {
    #[ts(type = "string")]
    pub order_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub line_count: usize,
    pub total_quantity: i64,
    pub total_cents: Money,
}

impl fmt::Display for OrderReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order placed successfully. Order {} with {} item(s), total {}.",
            self.order_id, self.total_quantity, self.total_cents
        )
    }
}

// =============================================================================
// Checkout
// =============================================================================

impl Cart {
    /// Snapshots the cart into an order record. Does not modify the cart.
    ///
    /// ## Errors
    /// * `EmptyCart` - nothing to order
    /// * `ItemNotFound` - a simple line's item is no longer on the menu
    pub fn checkout(
        &self,
        menu: &Menu,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> CoreResult<OrderRecord> {
        let view_lines = match self.view(menu) {
            CartView::Empty { .. } => return Err(CoreError::EmptyCart),
            CartView::Contents { lines, .. } => lines,
        };

        let mut lines = Vec::with_capacity(view_lines.len());
        for line in view_lines {
            if !line.available {
                return Err(CoreError::ItemNotFound {
                    name: line.description,
                });
            }
            lines.push(OrderLine {
                key: line.key,
                description: line.description,
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total,
            });
        }

        let total_cents = lines.iter().map(|l| l.line_total).sum();

        Ok(OrderRecord {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            created_at: now,
            lines,
            total_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ItemRequest;
    use crate::combo::{ComboRequest, ComponentRequest};
    use crate::menu_data::house_menu;
    use crate::types::{CatalogEntry, ItemType};

    #[test]
    fn test_checkout_empty_cart() {
        let menu = house_menu();
        let err = Cart::new().checkout(&menu, "s1", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_checkout_snapshots_without_clearing() {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_item(&menu, &ItemRequest::new("McChicken", 2)).unwrap();
        cart.add_combo(
            &menu,
            &ComboRequest::new(
                ComponentRequest::new("Filet-O-Fish"),
                ComponentRequest::new("Apple Slices"),
                ComponentRequest::new("Iced Coffee"),
                1,
            ),
        )
        .unwrap();

        let now = Utc::now();
        let order = cart.checkout(&menu, "thread-1", now).unwrap();

        // 499 + 71 + 249 = 819, minus 82 = 737
        assert_eq!(order.total_cents.cents(), 349 * 2 + 737);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.session_id, "thread-1");
        assert_eq!(order.created_at, now);
        assert_eq!(cart.total_quantity(), 3);

        let receipt = order.receipt();
        assert_eq!(receipt.order_id, order.id);
        assert_eq!(receipt.total_quantity, 3);
        assert!(receipt.to_string().starts_with("Order placed successfully"));
    }

    #[test]
    fn test_checkout_rejects_items_off_the_menu() {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_item(&menu, &ItemRequest::new("Spicy McChicken", 1)).unwrap();

        let reduced = Menu::new(vec![CatalogEntry::new(
            "McChicken",
            "Chicken & Fish Sandwiches",
            349,
            400,
            ItemType::Entree,
        )]);
        let err = cart.checkout(&reduced, "s1", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound { .. }));
    }

    #[test]
    fn test_record_serializes() {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_item(&menu, &ItemRequest::new("Sprite (Medium)", 1)).unwrap();
        let order = cart.checkout(&menu, "s1", Utc::now()).unwrap();

        let json = serde_json::to_string(&order).unwrap();
        let back: OrderRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
