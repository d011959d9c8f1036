//! # HTTP Routes
//!
//! | Method | Path                                  | Handler        |
//! |--------|---------------------------------------|----------------|
//! | GET    | `/health`                             | [`health`]     |
//! | GET    | `/tools`                              | [`list_tools`] |
//! | GET    | `/menu`                               | [`get_menu`]   |
//! | POST   | `/menu/reload`                        | [`reload_menu`]|
//! | POST   | `/sessions/{session_id}/tools/{tool}` | [`call_tool`]  |
//! | DELETE | `/sessions/{session_id}`              | [`end_session`]|
//! | GET    | `/sessions/{session_id}/cart`         | [`get_cart`]   |
//! | DELETE | `/sessions/{session_id}/cart`         | [`clear_cart`] |
//! | GET    | `/orders?limit=N`                     | [`list_orders`]|
//! | GET    | `/orders/{order_id}`                  | [`get_order`]  |
//!
//! The tool route body is the raw tool payload: a JSON object, a JSON
//! string holding an object, `null`, or nothing at all. Read-only tools
//! never create a session.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use orderdesk_core::operation::{ToolSpec, TOOLS};
use orderdesk_core::validation::{validate_order_id, validate_session_id};
use orderdesk_core::{Cart, CartView, CoreError, Operation, OrderRecord};

use crate::error::ApiError;
use crate::state::SharedState;
use crate::tools::{self, ToolResponse};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/menu", get(get_menu))
        .route("/menu/reload", post(reload_menu))
        .route("/sessions/{session_id}/tools/{tool}", post(call_tool))
        .route("/sessions/{session_id}", delete(end_session))
        .route("/sessions/{session_id}/cart", get(get_cart).delete(clear_cart))
        .route("/orders", get(list_orders))
        .route("/orders/{order_id}", get(get_order))
        .with_state(state)
}

// =============================================================================
// Service
// =============================================================================

/// Liveness plus a database round-trip.
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let database = state.db().health_check().await;
    let status = if database { "ok" } else { "degraded" };
    Json(json!({
        "status": status,
        "database": database,
        "menu_items": state.menu().await.len(),
        "sessions": state.sessions().len().await,
    }))
}

pub async fn list_tools() -> Json<&'static [ToolSpec]> {
    Json(TOOLS)
}

// =============================================================================
// Menu
// =============================================================================

/// Full menu grouped by category, plus one digest line per item.
pub async fn get_menu(State(state): State<SharedState>) -> Json<Value> {
    let menu = state.menu().await;
    Json(json!({
        "categories": menu.by_category(),
        "summary": menu.summary_lines(),
    }))
}

pub async fn reload_menu(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let items = state.reload_menu().await?;
    Ok(Json(json!({ "items": items })))
}

// =============================================================================
// Sessions
// =============================================================================

/// Runs one tool call for a session.
pub async fn call_tool(
    State(state): State<SharedState>,
    Path((session_id, tool)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<ToolResponse>, ApiError> {
    validate_session_id(&session_id).map_err(CoreError::from)?;

    let payload = parse_body(&body)?;
    let op = Operation::parse(&tool, payload)?;

    let menu = state.menu().await;
    let cart = if op.is_mutating() {
        state.sessions().cart(&session_id).await
    } else {
        state
            .sessions()
            .existing(&session_id)
            .await
            .unwrap_or_else(|| Arc::new(Mutex::new(Cart::new())))
    };
    let orders = state.db().orders();

    let response = tools::dispatch(&menu, &cart, &orders, &session_id, op).await?;
    Ok(Json(response))
}

/// Drops the session and its cart.
pub async fn end_session(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_session_id(&session_id).map_err(CoreError::from)?;

    let ended = state.sessions().remove(&session_id).await;
    info!(session_id = %session_id, ended, "Session ended");
    Ok(Json(json!({ "ended": ended })))
}

pub async fn get_cart(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    validate_session_id(&session_id).map_err(CoreError::from)?;

    let menu = state.menu().await;
    let view = match state.sessions().existing(&session_id).await {
        Some(cart) => cart.lock().await.view(&menu),
        None => Cart::new().view(&menu),
    };
    Ok(Json(view))
}

/// Empties the session's cart without placing an order.
pub async fn clear_cart(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_session_id(&session_id).map_err(CoreError::from)?;

    let cleared = match state.sessions().existing(&session_id).await {
        Some(cart) => {
            let mut cart = cart.lock().await;
            let lines = cart.line_count();
            cart.clear();
            lines
        }
        None => 0,
    };

    info!(session_id = %session_id, lines = cleared, "Cart cleared");
    Ok(Json(json!({ "cleared_lines": cleared })))
}

// =============================================================================
// Orders
// =============================================================================

const DEFAULT_ORDER_LIMIT: u32 = 20;
const MAX_ORDER_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct RecentOrdersQuery {
    pub limit: Option<u32>,
}

/// Newest orders first, plus the total number stored.
pub async fn list_orders(
    State(state): State<SharedState>,
    Query(query): Query<RecentOrdersQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ORDER_LIMIT)
        .clamp(1, MAX_ORDER_LIMIT);

    let orders = state.db().orders();
    let total = orders.count().await?;
    let recent = orders.list_recent(limit).await?;

    Ok(Json(json!({ "total": total, "orders": recent })))
}

pub async fn get_order(
    State(state): State<SharedState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderRecord>, ApiError> {
    let id = validate_order_id(&order_id).map_err(CoreError::from)?;

    state
        .db()
        .orders()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order", &order_id))
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "Tool body is not JSON");
        ApiError::from(CoreError::MalformedInput {
            reason: format!("request body is not valid JSON: {}", e),
        })
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseSettings;
    use crate::error::ErrorCode;
    use crate::state::AppState;

    async fn test_state() -> SharedState {
        let settings = DatabaseSettings {
            path: ":memory:".into(),
            max_connections: 1,
            seed_if_empty: true,
        };
        Arc::new(AppState::initialize(&settings).await.unwrap())
    }

    async fn call(
        state: &SharedState,
        session: &str,
        tool: &str,
        body: &str,
    ) -> Result<ToolResponse, ApiError> {
        call_tool(
            State(state.clone()),
            Path((session.to_string(), tool.to_string())),
            Bytes::from(body.to_string()),
        )
        .await
        .map(|Json(r)| r)
    }

    #[tokio::test]
    async fn test_order_flow_end_to_end() {
        let state = test_state().await;

        call(&state, "t1", "add_to_cart", r#"{"item_name": "Big Mac", "quantity": "2"}"#)
            .await
            .unwrap();
        call(
            &state,
            "t1",
            "add_combo",
            r#"{"entree": "Big Mac", "side": "French Fries (Small)", "drink": "Coca-Cola (Medium)"}"#,
        )
        .await
        .unwrap();

        let placed = call(&state, "t1", "place_order", "").await.unwrap();
        assert_eq!(placed.data["total_cents"], 529 * 2 + 827);

        let order_id = placed.data["order_id"].as_str().unwrap().to_string();
        let Json(order) = get_order(State(state.clone()), Path(order_id)).await.unwrap();
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.session_id, "t1");

        let Json(view) = get_cart(State(state.clone()), Path("t1".into())).await.unwrap();
        assert!(matches!(view, CartView::Empty { .. }));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let state = test_state().await;

        call(&state, "a", "add_to_cart", r#"{"item_name": "Sprite (Medium)"}"#)
            .await
            .unwrap();

        let Json(view) = get_cart(State(state.clone()), Path("b".into())).await.unwrap();
        assert!(matches!(view, CartView::Empty { .. }));

        let err = call(&state, "b", "place_order", "null").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[tokio::test]
    async fn test_bad_inputs() {
        let state = test_state().await;

        let err = call(&state, "has space", "view_cart", "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = call(&state, "t1", "add_to_cart", "{item_name: Big Mac").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedInput);

        let err = call(&state, "t1", "add_to_cart", r#"{"item_name": "Big Mac", "quantity": 0}"#)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = get_order(State(state.clone()), Path("not-a-uuid".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = get_order(
            State(state.clone()),
            Path("550e8400-e29b-41d4-a716-446655440000".into()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_read_only_tools_do_not_create_sessions() {
        let state = test_state().await;

        let view = call(&state, "fresh", "view_cart", "").await.unwrap();
        assert_eq!(view.message, "Your shopping cart is empty.");
        call(&state, "fresh", "get_menu_item", r#"{"category": "Sides"}"#)
            .await
            .unwrap();
        assert_eq!(state.sessions().len().await, 0);

        call(&state, "fresh", "add_to_cart", r#"{"item_name": "Apple Slices"}"#)
            .await
            .unwrap();
        assert_eq!(state.sessions().len().await, 1);

        let view = call(&state, "fresh", "view_cart", "").await.unwrap();
        assert!(view.message.starts_with("Your cart:"));
    }

    #[tokio::test]
    async fn test_end_session() {
        let state = test_state().await;
        call(&state, "t1", "add_to_cart", r#"{"item_name": "Cheeseburger"}"#)
            .await
            .unwrap();

        let Json(body) = end_session(State(state.clone()), Path("t1".into())).await.unwrap();
        assert_eq!(body["ended"], true);
        assert!(state.sessions().is_empty().await);

        let Json(body) = end_session(State(state.clone()), Path("t1".into())).await.unwrap();
        assert_eq!(body["ended"], false);
    }

    #[tokio::test]
    async fn test_list_orders() {
        let state = test_state().await;
        for session in ["a", "b"] {
            call(&state, session, "add_to_cart", r#"{"item_name": "Iced Coffee"}"#)
                .await
                .unwrap();
            call(&state, session, "place_order", "").await.unwrap();
        }

        let Json(body) = list_orders(State(state.clone()), Query(RecentOrdersQuery { limit: Some(1) }))
            .await
            .unwrap();
        assert_eq!(body["total"], 2);
        assert_eq!(body["orders"].as_array().unwrap().len(), 1);

        let Json(body) = list_orders(State(state.clone()), Query(RecentOrdersQuery::default()))
            .await
            .unwrap();
        assert_eq!(body["orders"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let state = test_state().await;
        call(&state, "t1", "add_to_cart", r#"{"item_name": "Cheeseburger"}"#)
            .await
            .unwrap();

        let Json(body) = clear_cart(State(state.clone()), Path("t1".into())).await.unwrap();
        assert_eq!(body["cleared_lines"], 1);

        let Json(view) = get_cart(State(state.clone()), Path("t1".into())).await.unwrap();
        assert!(matches!(view, CartView::Empty { .. }));
    }

    #[tokio::test]
    async fn test_menu_and_health() {
        let state = test_state().await;

        let Json(menu) = get_menu(State(state.clone())).await;
        assert_eq!(menu["summary"].as_array().unwrap().len(), 15);
        assert!(menu["categories"]["burgers"].is_array());

        let Json(health) = health(State(state.clone())).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["menu_items"], 15);

        let Json(tools) = list_tools().await;
        assert!(tools.iter().any(|t| t.name == "place_order"));
    }
}
