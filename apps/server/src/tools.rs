//! # Tool Dispatch
//!
//! Runs one [`Operation`] against a session's cart.
//!
//! ## Turn Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  interpreter picks a tool                                              │
//! │        │  ("add_combo", "{\"entree\": \"Big Mac\", ...}")                │
//! │        ▼                                                                │
//! │  Operation::parse ──► Operation::AddCombo(ComboRequest)                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  dispatch(menu, cart, sink, session_id, op)                             │
//! │        │   cart lock held for the whole call                            │
//! │        ▼                                                                │
//! │  ToolResponse { tool, message, data }                                   │
//! │        │   message: sentence the interpreter reads back                 │
//! │        │   data:    structured result for the front end                 │
//! │        ▼                                                                │
//! │  natural-language reply                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## place_order
//! ```text
//!   lock cart ──► checkout ──► sink.insert ──┬── Ok  ──► clear cart, receipt
//!                    │                       └── Err ──► cart untouched,
//!                    └── EmptyCart (no write)            PersistenceFailure
//! ```

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use orderdesk_core::{Cart, CartView, CoreError, CoreResult, Menu, Operation, QueryOutcome};

use crate::sink::{failure_cause, OrderSink};

/// Result of one tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub tool: &'static str,
    /// Text for the interpreter to phrase back to the customer.
    pub message: String,
    pub data: Value,
}

impl ToolResponse {
    /// Falls back to `null` data if `data` cannot be represented as JSON;
    /// the message still reaches the interpreter.
    fn new(tool: &'static str, message: impl Into<String>, data: impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(tool, error = %e, "Tool result data is not serializable; sending null");
                Value::Null
            }
        };

        ToolResponse {
            tool,
            message: message.into(),
            data,
        }
    }
}

/// Executes `op` for one session.
///
/// The cart stays locked until the operation, including the order write,
/// has finished, so two calls for the same session never interleave.
///
/// ## Errors
/// Every [`CoreError`] the operation can raise. On error the cart is left
/// exactly as it was.
pub async fn dispatch<S: OrderSink>(
    menu: &Menu,
    cart: &Mutex<Cart>,
    sink: &S,
    session_id: &str,
    op: Operation,
) -> CoreResult<ToolResponse> {
    let tool = op.tool_name();
    debug!(session_id = %session_id, tool, "Dispatching operation");

    match op {
        Operation::GetMenuItem(filter) => {
            let outcome = menu.find(&filter);
            let message = match &outcome {
                QueryOutcome::NoMatch => "No matching items found.".to_string(),
                QueryOutcome::Matches(items) => {
                    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
                    format!("Found {} item(s): {}.", items.len(), names.join(", "))
                }
            };
            Ok(ToolResponse::new(tool, message, outcome))
        }

        Operation::AddToCart(request) => {
            let added = cart.lock().await.add_item(menu, &request)?;
            Ok(ToolResponse::new(tool, added.to_string(), &added))
        }

        Operation::RemoveFromCart(request) => {
            let removed = cart.lock().await.remove_item(&request)?;
            Ok(ToolResponse::new(tool, removed.to_string(), &removed))
        }

        Operation::AddCombo(request) => {
            let added = cart.lock().await.add_combo(menu, &request)?;
            Ok(ToolResponse::new(tool, added.to_string(), &added))
        }

        Operation::RemoveCombo(request) => {
            let removed = cart.lock().await.remove_combo(&request)?;
            Ok(ToolResponse::new(tool, removed.to_string(), &removed))
        }

        Operation::ViewCart => {
            let view = cart.lock().await.view(menu);
            Ok(ToolResponse::new(tool, describe_view(&view), &view))
        }

        Operation::PlaceOrder => place_order(menu, cart, sink, session_id).await,

        Operation::NoOp { tool: requested } => {
            debug!(session_id = %session_id, requested = %requested, "No-op tool call");
            Ok(ToolResponse::new(tool, "", json!({ "requested": requested })))
        }
    }
}

async fn place_order<S: OrderSink>(
    menu: &Menu,
    cart: &Mutex<Cart>,
    sink: &S,
    session_id: &str,
) -> CoreResult<ToolResponse> {
    let mut cart = cart.lock().await;

    let order = cart.checkout(menu, session_id, Utc::now())?;

    if let Err(e) = sink.insert(&order).await {
        error!(
            session_id = %session_id,
            order_id = %order.id,
            error = %e,
            "Order sink rejected order"
        );
        warn!(session_id = %session_id, lines = cart.line_count(), "Cart kept after failed order");
        return Err(CoreError::PersistenceFailure {
            cause: failure_cause(&e),
        });
    }

    cart.clear();

    let receipt = order.receipt();
    info!(
        session_id = %session_id,
        order_id = %receipt.order_id,
        total = %receipt.total_cents,
        "Order placed"
    );

    Ok(ToolResponse::new("place_order", receipt.to_string(), &receipt))
}

fn describe_view(view: &CartView) -> String {
    match view {
        CartView::Empty { message } => message.clone(),
        CartView::Contents {
            lines,
            total_cents,
            ..
        } => {
            let mut text = String::from("Your cart:");
            for line in lines {
                if line.available {
                    text.push_str(&format!(
                        "\n- {}x {}: {}",
                        line.quantity, line.description, line.line_total
                    ));
                } else {
                    text.push_str(&format!(
                        "\n- {}x {}: no longer on the menu",
                        line.quantity, line.description
                    ));
                }
            }
            text.push_str(&format!("\nTotal: {}", total_cents));
            text
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::testing::{FailingSink, MemorySink};
    use orderdesk_core::menu_data::house_menu;
    use orderdesk_core::{ItemRequest, LineKey};

    async fn run(
        cart: &Mutex<Cart>,
        sink: &impl OrderSink,
        tool: &str,
        payload: Value,
    ) -> CoreResult<ToolResponse> {
        let op = Operation::parse(tool, payload)?;
        dispatch(&house_menu(), cart, sink, "thread-1", op).await
    }

    #[test]
    fn test_unserializable_data_becomes_null() {
        // JSON object keys must be strings
        let mut data = std::collections::HashMap::new();
        data.insert((1, 2), "pair");

        let response = ToolResponse::new("view_cart", "Your cart:", data);
        assert_eq!(response.data, Value::Null);
        assert_eq!(response.message, "Your cart:");

        let response = ToolResponse::new("view_cart", "ok", json!({"lines": 1}));
        assert_eq!(response.data["lines"], 1);
    }

    #[tokio::test]
    async fn test_add_then_view() {
        let cart = Mutex::new(Cart::new());
        let sink = MemorySink::default();

        let added = run(
            &cart,
            &sink,
            "add_to_cart",
            json!({"item_name": "BIG MAC", "quantity": 2, "modifications": ["No Pickles"]}),
        )
        .await
        .unwrap();
        assert_eq!(added.tool, "add_to_cart");
        assert!(added.message.starts_with("Added 2x Big Mac(s)"));

        let view = run(&cart, &sink, "view_cart", Value::Null).await.unwrap();
        assert_eq!(view.data["status"], "contents");
        assert!(view.message.contains("Total: $10.58"));
    }

    #[tokio::test]
    async fn test_string_payload_is_decoded() {
        let cart = Mutex::new(Cart::new());
        let sink = MemorySink::default();

        run(
            &cart,
            &sink,
            "add_combo",
            json!(r#"{"entree": "Big Mac", "side": "French Fries (Small)", "drink": "Coca-Cola (Medium)"}"#),
        )
        .await
        .unwrap();

        let view = cart.lock().await.view(&house_menu());
        match view {
            CartView::Contents { total_cents, .. } => assert_eq!(total_cents.cents(), 827),
            CartView::Empty { .. } => panic!("cart should not be empty"),
        }
    }

    #[tokio::test]
    async fn test_menu_query_no_match() {
        let cart = Mutex::new(Cart::new());
        let response = run(
            &cart,
            &MemorySink::default(),
            "get_menu_item",
            json!({"category": "Desserts"}),
        )
        .await
        .unwrap();

        assert_eq!(response.message, "No matching items found.");
        assert_eq!(response.data["status"], "no_match");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_noop() {
        let cart = Mutex::new(Cart::new());
        let response = run(&cart, &MemorySink::default(), "order_pizza", json!({}))
            .await
            .unwrap();

        assert_eq!(response.tool, "do_nothing");
        assert!(response.message.is_empty());
        assert!(cart.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_add_leaves_cart_unchanged() {
        let cart = Mutex::new(Cart::new());
        let sink = MemorySink::default();
        run(&cart, &sink, "add_to_cart", json!({"item_name": "Big Mac"}))
            .await
            .unwrap();

        let err = run(&cart, &sink, "add_to_cart", json!({"item_name": "Whopper"}))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound { .. }));
        assert_eq!(cart.lock().await.total_quantity(), 1);
    }

    // =========================================================================
    // place_order
    // =========================================================================

    #[tokio::test]
    async fn test_place_order_empty_cart_writes_nothing() {
        let cart = Mutex::new(Cart::new());
        let sink = MemorySink::default();

        let err = run(&cart, &sink, "place_order", json!({})).await.unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(sink.count(), 0);
    }

    #[tokio::test]
    async fn test_place_order_success_clears_cart() {
        let cart = Mutex::new(Cart::new());
        let sink = MemorySink::default();
        run(&cart, &sink, "add_to_cart", json!({"item_name": "Big Mac", "quantity": 2}))
            .await
            .unwrap();

        let response = run(&cart, &sink, "place_order", Value::Null).await.unwrap();
        assert!(response.message.starts_with("Order placed successfully."));
        assert_eq!(response.data["total_cents"], 1058);

        assert!(cart.lock().await.is_empty());
        assert_eq!(sink.count(), 1);

        let stored = &sink.orders.lock().unwrap()[0];
        assert_eq!(stored.session_id, "thread-1");
        assert_eq!(stored.total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_place_order_sink_failure_keeps_cart() {
        let cart = Mutex::new(Cart::new());
        let menu = house_menu();
        cart.lock()
            .await
            .add_item(&menu, &ItemRequest::new("Cheeseburger", 3))
            .unwrap();

        let err = dispatch(&menu, &cart, &FailingSink, "thread-1", Operation::PlaceOrder)
            .await
            .unwrap_err();

        match err {
            CoreError::PersistenceFailure { cause } => assert!(!cause.contains("locked")),
            other => panic!("unexpected {:?}", other),
        }

        let cart = cart.lock().await;
        let key = cart.lines().map(|(k, _)| k.clone()).next().unwrap();
        assert!(matches!(key, LineKey::Item(_)));
        assert_eq!(cart.quantity_of(&key), Some(3));
    }
}
