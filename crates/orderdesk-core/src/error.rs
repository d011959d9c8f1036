//! # Error Types
//!
//! Domain-specific error types for orderdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orderdesk-core errors (this file)                                     │
//! │  ├── CoreError        - Ordering rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  orderdesk-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Server errors (apps/server)                                           │
//! │  └── ApiError         - What the interpreter sees (serialized)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Interpreter            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant carries the structured context (item, slot, types) needed to
//! render a message without the user's original text.

use thiserror::Error;

use crate::types::{ComboSlot, ItemType};

// =============================================================================
// Core Error
// =============================================================================

/// Ordering errors. All are recoverable at the conversation-turn level.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The tool payload could not be parsed at all.
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    /// No catalog entry has this exact name.
    #[error("Sorry, {name} is not available on the menu.")]
    ItemNotFound { name: String },

    /// A combo component does not exist in the catalog.
    #[error("No {slot} named '{name}' is on the menu.")]
    ComponentNotFound { slot: ComboSlot, name: String },

    /// A combo component exists but has the wrong type for its slot.
    ///
    /// ## User Workflow
    /// ```text
    /// add_combo { side: "Coca-Cola (Medium)" }
    ///      │
    ///      ▼
    /// catalog type = drink, slot expects side
    ///      │
    ///      ▼
    /// WrongComponentType { slot: side, expected: side, found: drink }
    /// ```
    #[error("Item '{name}' in the {slot} slot is a {found}, expected a {expected}.")]
    WrongComponentType {
        slot: ComboSlot,
        name: String,
        expected: ItemType,
        found: ItemType,
    },

    /// One or more combo slots were missing or had an empty name.
    #[error(
        "Incomplete combo: missing {}. A combo needs an entree, a side, and a drink.",
        join_slots(.missing)
    )]
    IncompleteCombo { missing: Vec<ComboSlot> },

    /// Remove target is not in the cart.
    #[error("{description} is not in your cart.")]
    LineNotFound { description: String },

    /// Quantity is not a whole number in range.
    #[error("Invalid quantity '{value}': must be a whole number from 1 to {max}")]
    InvalidQuantity { value: String, max: i64 },

    /// Modification is not offered for the item, or contradicts another one.
    #[error("Modification '{modification}' is not valid for {item}: {reason}")]
    InvalidModification {
        item: String,
        modification: String,
        reason: String,
    },

    /// Order attempted with nothing in the cart.
    #[error("Cannot place an order: your shopping cart is empty.")]
    EmptyCart,

    /// The order sink rejected the write. The cart is left as it was.
    #[error("Failed to place order: {cause}")]
    PersistenceFailure { cause: String },

    /// Cart has reached its maximum number of distinct lines.
    #[error("Cart cannot have more than {max} different lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn join_slots(slots: &[ComboSlot]) -> String {
    slots
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Kept separate from lookups failing so callers can tell "ask the user to
/// clarify" apart from "ask the user to pick something else".
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. non-integer calories, bad price string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. two catalog entries with the same name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_format(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
