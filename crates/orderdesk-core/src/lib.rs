//! # orderdesk-core: Pure Ordering Logic
//!
//! Everything that decides what a conversational ordering turn does to a
//! cart lives here, as plain synchronous code with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OrderDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Language-model interpreter (external caller)           │   │
//! │  │    "two big macs, no pickles" ──► add_to_cart {...}             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (apps/server)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orderdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ operation │  │   menu    │  │   cart    │  │   order   │  │   │
//! │  │   │ Operation │  │   Menu    │  │   Cart    │  │OrderRecord│  │   │
//! │  │   │  (tools)  │  │MenuFilter │  │  combos   │  │  Receipt  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 orderdesk-db (Database Layer)                   │   │
//! │  │           menu_items catalog, orders sink, migrations           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog entries, item types, combo slots
//! - [`money`] - Money type with integer arithmetic
//! - [`menu`] - In-memory catalog and filter queries
//! - [`key`] - Normalized cart line identities
//! - [`cart`] - Cart store and simple item operations
//! - [`combo`] - Combo composition, pricing, add/remove
//! - [`order`] - Order snapshots and receipts
//! - [`operation`] - Closed set of tool operations parsed from JSON
//! - [`menu_data`] - Built-in house menu
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use orderdesk_core::cart::{Cart, ItemRequest};
//! use orderdesk_core::menu_data::house_menu;
//!
//! let menu = house_menu();
//! let mut cart = Cart::new();
//!
//! cart.add_item(&menu, &ItemRequest::new("BIG MAC", 1).with_modifications(["No Pickles"]))
//!     .unwrap();
//! cart.add_item(&menu, &ItemRequest::new("big mac", 1).with_modifications(["no pickles"]))
//!     .unwrap();
//!
//! assert_eq!(cart.line_count(), 1);
//! assert_eq!(cart.total_quantity(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod combo;
pub mod error;
pub mod key;
pub mod menu;
pub mod menu_data;
pub mod money;
pub mod operation;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartView, ItemRequest};
pub use combo::{ComboRequest, ComponentRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use key::{ComboKey, ItemKey, LineKey, Modifications};
pub use menu::{Menu, MenuFilter, QueryOutcome};
pub use money::Money;
pub use operation::Operation;
pub use order::{OrderLine, OrderReceipt, OrderRecord};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Combo discount in basis points (1000 = 10% off the summed component prices).
pub const COMBO_DISCOUNT_BPS: u32 = 1000;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Highest catalog price accepted, in cents ($1,000.00).
///
/// Keeps every line and cart total far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches interpreter slips such as "1000" for "10" before they reach an order.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Message returned when viewing an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Your shopping cart is empty.";
