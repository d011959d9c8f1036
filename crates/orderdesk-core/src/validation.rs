//! # Validation Module
//!
//! Input validation for tool payloads, catalog data and identifiers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Operation::parse                                             │
//! │  ├── JSON shape (MalformedInput)                                       │
//! │  └── Numeric fields (InvalidQuantity, InvalidFormat)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart operations (THIS MODULE)                                │
//! │  ├── Names, quantity bounds                                            │
//! │  └── Modifications against the catalog entry                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE menu item names                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::key::{normalize_name, Modifications};
use crate::types::CatalogEntry;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_SESSION_ID_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item name from a payload and returns it normalized.
///
/// ## Example
/// ```rust
/// use orderdesk_core::validation::validate_item_name;
///
/// assert_eq!(validate_item_name("  Big Mac ").unwrap(), "big mac");
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    let normalized = normalize_name(name);

    if normalized.is_empty() {
        return Err(ValidationError::required("item_name"));
    }

    if normalized.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "item_name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(normalized)
}

/// Validates a session identifier taken from a request path.
///
/// ## Rules
/// - 1 to 64 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_session_id(id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::required("session_id"));
    }

    if id.len() > MAX_SESSION_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "session_id".to_string(),
            max: MAX_SESSION_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "session_id",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }

    Ok(())
}

/// Parses an order id.
pub fn validate_order_id(id: &str) -> ValidationResult<Uuid> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("order_id"));
    }

    Uuid::parse_str(id.trim())
        .map_err(|_| ValidationError::invalid_format("order_id", "must be a valid UUID"))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> CoreResult<i64> {
    if qty <= 0 || qty > MAX_ITEM_QUANTITY {
        return Err(CoreError::InvalidQuantity {
            value: qty.to_string(),
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(qty)
}

/// Validates a removal quantity.
///
/// Only the lower bound applies: asking to remove more than a line holds
/// removes the whole line.
pub fn validate_removal_quantity(qty: i64) -> CoreResult<i64> {
    if qty <= 0 {
        return Err(CoreError::InvalidQuantity {
            value: qty.to_string(),
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(qty)
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a catalog entry before it joins a menu.
pub fn validate_catalog_entry(entry: &CatalogEntry) -> ValidationResult<()> {
    validate_item_name(&entry.name).map_err(|e| match e {
        ValidationError::Required { .. } => ValidationError::required("name"),
        other => other,
    })?;

    if entry.category.trim().is_empty() {
        return Err(ValidationError::required("category"));
    }

    if !(0..=MAX_PRICE_CENTS).contains(&entry.price_cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    if entry.calories < 0 {
        return Err(ValidationError::OutOfRange {
            field: "calories".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Checks requested modifications against what the catalog entry offers.
///
/// ## Rules
/// - Every tag must appear in `allowed_modifications` (ignoring case)
/// - "no X" and "extra X" may not be requested together
///
/// ## User Workflow
/// ```text
/// add_to_cart("Big Mac", ["no pickles", "extra pickles"])
///      │
///      ▼
/// both tags allowed individually ✓
///      │
///      ▼
/// "no pickles" + "extra pickles" → InvalidModification (contradictory)
/// ```
pub fn validate_modifications(entry: &CatalogEntry, mods: &Modifications) -> CoreResult<()> {
    for tag in mods.iter() {
        if !entry.allows(tag) {
            let reason = if entry.allowed_modifications.is_empty() {
                "this item cannot be modified".to_string()
            } else {
                format!("allowed: {}", entry.allowed_modifications.join(", "))
            };
            return Err(CoreError::InvalidModification {
                item: entry.name.clone(),
                modification: tag.to_string(),
                reason,
            });
        }

        if let Some(ingredient) = tag.strip_prefix("no ") {
            let opposite = format!("extra {}", ingredient);
            if mods.contains(&opposite) {
                return Err(CoreError::InvalidModification {
                    item: entry.name.clone(),
                    modification: tag.to_string(),
                    reason: format!("cannot be combined with '{}'", opposite),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
