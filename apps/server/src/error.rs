//! # Server Error Types
//!
//! Two layers:
//! - [`ServerError`]: startup and configuration failures, reported once by
//!   `main` before the listener is up.
//! - [`ApiError`]: what an HTTP caller receives when a tool call or route
//!   fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /sessions/{id}/tools/add_combo                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Operation::parse ── MalformedInput / InvalidQuantity ──┐              │
//! │         │                                               │              │
//! │         ▼                                               ▼              │
//! │  tools::dispatch ─── WrongComponentType { slot, .. } ── ApiError ────► │
//! │         │                                               ▲   (status,   │
//! │         ▼                                               │    code,     │
//! │  OrderSink ───────── DbError (logged, not leaked) ──────┘    details)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "code": "INVALID_COMBO",
//!   "message": "Item 'Coca-Cola (Medium)' in the side slot is a drink, expected a side.",
//!   "details": { "slot": "side", "item": "Coca-Cola (Medium)", "expected": "side", "found": "drink" }
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use orderdesk_core::CoreError;
use orderdesk_db::DbError;

// =============================================================================
// Startup Errors
// =============================================================================

/// Result type alias for server startup.
pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid server configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error("Failed to bind {addr}: {reason}")]
    BindFailed { addr: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Server terminated: {0}")]
    Serve(String),
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServerError {
    fn from(err: toml::de::Error) -> Self {
        ServerError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ServerError {
    fn from(err: toml::ser::Error) -> Self {
        ServerError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error body returned from every route.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message, safe to read back to the customer
    pub message: String,

    /// Structured context (item, slot, expected/found type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Payload could not be parsed (400)
    MalformedInput,

    /// Input validation failed (400)
    ValidationError,

    /// Menu item, order, or combo component not found (404)
    NotFound,

    /// Remove target is not in the cart (404)
    NotInCart,

    /// Combo is missing a slot or has a wrongly typed component (422)
    InvalidCombo,

    /// Modification not offered for the item (422)
    InvalidModification,

    /// Cart has too many distinct lines (422)
    CartTooLarge,

    /// Order attempted on an empty cart (409)
    EmptyCart,

    /// The order sink rejected the write (503)
    PersistenceFailure,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::MalformedInput | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound | ErrorCode::NotInCart => StatusCode::NOT_FOUND,
            ErrorCode::InvalidCombo | ErrorCode::InvalidModification | ErrorCode::CartTooLarge => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::EmptyCart => StatusCode::CONFLICT,
            ErrorCode::PersistenceFailure => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
            .with_details(json!({ "resource": resource, "id": id }))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::MalformedInput { reason } => {
                ApiError::new(ErrorCode::MalformedInput, message)
                    .with_details(json!({ "reason": reason }))
            }
            CoreError::ItemNotFound { name } => {
                ApiError::new(ErrorCode::NotFound, message).with_details(json!({ "item": name }))
            }
            CoreError::ComponentNotFound { slot, name } => ApiError::new(ErrorCode::NotFound, message)
                .with_details(json!({ "slot": slot, "item": name })),
            CoreError::WrongComponentType {
                slot,
                name,
                expected,
                found,
            } => ApiError::new(ErrorCode::InvalidCombo, message).with_details(json!({
                "slot": slot,
                "item": name,
                "expected": expected,
                "found": found,
            })),
            CoreError::IncompleteCombo { missing } => ApiError::new(ErrorCode::InvalidCombo, message)
                .with_details(json!({ "missing": missing })),
            CoreError::LineNotFound { description } => ApiError::new(ErrorCode::NotInCart, message)
                .with_details(json!({ "line": description })),
            CoreError::InvalidQuantity { value, max } => {
                ApiError::new(ErrorCode::ValidationError, message)
                    .with_details(json!({ "field": "quantity", "value": value, "max": max }))
            }
            CoreError::InvalidModification {
                item,
                modification,
                reason,
            } => ApiError::new(ErrorCode::InvalidModification, message).with_details(json!({
                "item": item,
                "modification": modification,
                "reason": reason,
            })),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, message),
            CoreError::PersistenceFailure { .. } => {
                ApiError::new(ErrorCode::PersistenceFailure, message)
            }
            CoreError::CartTooLarge { max } => {
                ApiError::new(ErrorCode::CartTooLarge, message).with_details(json!({ "max": max }))
            }
            CoreError::Validation(_) => ApiError::validation(message),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            unavailable @ (DbError::ConnectionFailed(_) | DbError::PoolExhausted) => {
                tracing::error!(error = %unavailable, "Database unavailable");
                ApiError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            other => {
                // Log the actual error but return a generic message
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
