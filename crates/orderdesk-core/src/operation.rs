//! # Tool Operations
//!
//! The closed set of structured operations the language-model interpreter
//! can invoke, and their parsing from `(tool name, JSON payload)`.
//!
//! ## Payload Tolerance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payload                               treated as                       │
//! │  ─────────────────────────────────     ───────────────────────────────  │
//! │  {"item_name": "Big Mac"}              object                           │
//! │  "{\"item_name\": \"Big Mac\"}"        JSON string, decoded once        │
//! │  null / "" / missing                   {}                               │
//! │  [1, 2] / 42 / "not json"              MalformedInput                   │
//! │                                                                         │
//! │  quantity       2 | "2" | 2.0          → 2  (default 1)                 │
//! │  modifications  ["no ice"] | "no ice"  → ["no ice"]                     │
//! │  combo slot     "Sprite (Medium)" | {"item_name": .., "modifications"}  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown tool names parse to [`Operation::NoOp`] rather than an error, so
//! a confused interpreter never ends the conversation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cart::ItemRequest;
use crate::combo::{ComboRequest, ComponentRequest};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::menu::MenuFilter;
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Operation
// =============================================================================

/// One structured operation per conversational turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    GetMenuItem(MenuFilter),
    AddToCart(ItemRequest),
    RemoveFromCart(ItemRequest),
    ViewCart,
    AddCombo(ComboRequest),
    RemoveCombo(ComboRequest),
    PlaceOrder,
    /// `do_nothing`, or a tool name this service does not know.
    NoOp { tool: String },
}

impl Operation {
    /// Parses a tool invocation.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::operation::Operation;
    /// use serde_json::json;
    ///
    /// let op = Operation::parse("add_to_cart", json!("{\"item_name\": \"Big Mac\"}")).unwrap();
    /// match op {
    ///     Operation::AddToCart(req) => assert_eq!(req.quantity, 1),
    ///     other => panic!("unexpected {:?}", other),
    /// }
    ///
    /// let op = Operation::parse("order_pizza", json!({})).unwrap();
    /// assert_eq!(op.tool_name(), "do_nothing");
    /// ```
    pub fn parse(tool: &str, payload: Value) -> CoreResult<Operation> {
        let tool = tool.trim().to_lowercase();

        match tool.as_str() {
            "view_cart" => return Ok(Operation::ViewCart),
            "place_order" => return Ok(Operation::PlaceOrder),
            "get_menu_item" | "add_to_cart" | "remove_from_cart" | "add_combo"
            | "remove_combo" => {}
            _ => return Ok(Operation::NoOp { tool }),
        }

        let payload = payload_object(payload)?;

        let op = match tool.as_str() {
            "get_menu_item" => Operation::GetMenuItem(decode::<RawQuery>(&tool, payload)?.into_filter()?),
            "add_to_cart" => Operation::AddToCart(decode::<RawItem>(&tool, payload)?.into_request()?),
            "remove_from_cart" => {
                Operation::RemoveFromCart(decode::<RawItem>(&tool, payload)?.into_request()?)
            }
            "add_combo" => Operation::AddCombo(decode::<RawCombo>(&tool, payload)?.into_request()?),
            _ => Operation::RemoveCombo(decode::<RawCombo>(&tool, payload)?.into_request()?),
        };

        Ok(op)
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Operation::GetMenuItem(_) => "get_menu_item",
            Operation::AddToCart(_) => "add_to_cart",
            Operation::RemoveFromCart(_) => "remove_from_cart",
            Operation::ViewCart => "view_cart",
            Operation::AddCombo(_) => "add_combo",
            Operation::RemoveCombo(_) => "remove_combo",
            Operation::PlaceOrder => "place_order",
            Operation::NoOp { .. } => "do_nothing",
        }
    }

    /// Whether the operation changes the cart.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::AddToCart(_)
                | Operation::RemoveFromCart(_)
                | Operation::AddCombo(_)
                | Operation::RemoveCombo(_)
                | Operation::PlaceOrder
        )
    }
}

// =============================================================================
// Tool Catalog
// =============================================================================

/// Description of a tool as advertised to the interpreter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Short input schema hint.
    pub parameters: &'static str,
}

pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "get_menu_item",
        description: "Retrieves menu items based on search criteria. Supports item_name (string), \
                      category (string), and max_calories (integer). All criteria are optional \
                      and combined; item names must match exactly.",
        parameters: "{ item_name?: string, category?: string, max_calories?: integer }",
    },
    ToolSpec {
        name: "add_to_cart",
        description: "Adds an item to the cart. When adding multiple different items, add them \
                      one at a time. When adding an item with modifications, only use \
                      modifications from the list of available modifications for that item.",
        parameters: "{ item_name: string, quantity?: integer, modifications?: string[] }",
    },
    ToolSpec {
        name: "remove_from_cart",
        description: "Removes an item from the cart. The modifications must match the ones the \
                      item was added with.",
        parameters: "{ item_name: string, quantity?: integer, modifications?: string[] }",
    },
    ToolSpec {
        name: "view_cart",
        description: "Displays the shopping cart.",
        parameters: "{}",
    },
    ToolSpec {
        name: "add_combo",
        description: "Adds a combo to the cart. A combo must include one entree, one side, and \
                      one drink. This combo provides a 10% discount on the total price of the \
                      items.",
        parameters: "{ entree: Component, side: Component, drink: Component, quantity?: integer } \
                     where Component = string | { item_name: string, modifications?: string[] }",
    },
    ToolSpec {
        name: "remove_combo",
        description: "Removes a combo from the cart. The entree, side, drink and their \
                      modifications must match the combo as it was added.",
        parameters: "{ entree: Component, side: Component, drink: Component, quantity?: integer }",
    },
    ToolSpec {
        name: "place_order",
        description: "Places an order with the items in the cart. The order will be stored in \
                      the database and the cart emptied.",
        parameters: "{}",
    },
    ToolSpec {
        name: "do_nothing",
        description: "Use when the request needs no cart or menu action.",
        parameters: "{}",
    },
];

// =============================================================================
// Payload Decoding
// =============================================================================

fn payload_object(payload: Value) -> CoreResult<Value> {
    let value = match payload {
        Value::Null => Value::Object(Map::new()),
        Value::String(text) if text.trim().is_empty() => Value::Object(Map::new()),
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|e| CoreError::MalformedInput {
                reason: format!("payload is not valid JSON: {}", e),
            })?
        }
        other => other,
    };

    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        _ => Err(CoreError::MalformedInput {
            reason: "payload must be a JSON object".to_string(),
        }),
    }
}

fn decode<T: DeserializeOwned>(tool: &str, payload: Value) -> CoreResult<T> {
    serde_json::from_value(payload).map_err(|e| CoreError::MalformedInput {
        reason: format!("invalid {} payload: {}", tool, e),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn as_whole(&self) -> Option<i64> {
        match self {
            RawNumber::Int(n) => Some(*n),
            RawNumber::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(*f as i64),
            RawNumber::Float(_) => None,
            RawNumber::Text(s) => s.trim().parse().ok(),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawNumber::Int(n) => n.to_string(),
            RawNumber::Float(f) => f.to_string(),
            RawNumber::Text(s) => s.clone(),
        }
    }
}

fn parse_quantity(raw: Option<RawNumber>) -> CoreResult<i64> {
    match raw {
        None => Ok(1),
        Some(raw) => raw.as_whole().ok_or_else(|| CoreError::InvalidQuantity {
            value: raw.describe(),
            max: MAX_ITEM_QUANTITY,
        }),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawModifications {
    One(String),
    Many(Vec<String>),
}

fn modifications(raw: Option<RawModifications>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(RawModifications::One(tag)) => vec![tag],
        Some(RawModifications::Many(tags)) => tags,
    }
}

#[derive(Deserialize)]
struct RawQuery {
    item_name: Option<String>,
    category: Option<String>,
    max_calories: Option<RawNumber>,
}

impl RawQuery {
    fn into_filter(self) -> CoreResult<MenuFilter> {
        let mut filter = MenuFilter::new();
        if let Some(name) = self.item_name {
            filter = filter.item_name(&name);
        }
        if let Some(category) = self.category {
            filter = filter.category(&category);
        }
        if let Some(raw) = self.max_calories {
            let max = raw.as_whole().ok_or_else(|| {
                ValidationError::invalid_format("max_calories", "must be a whole number")
            })?;
            filter = filter.max_calories(max);
        }
        Ok(filter)
    }
}

#[derive(Deserialize)]
struct RawItem {
    item_name: Option<String>,
    quantity: Option<RawNumber>,
    modifications: Option<RawModifications>,
}

impl RawItem {
    fn into_request(self) -> CoreResult<ItemRequest> {
        let quantity = parse_quantity(self.quantity)?;
        Ok(ItemRequest::new(self.item_name.unwrap_or_default(), quantity)
            .with_modifications(modifications(self.modifications)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawComponent {
    Name(String),
    Detailed {
        item_name: Option<String>,
        modifications: Option<RawModifications>,
    },
}

impl From<RawComponent> for ComponentRequest {
    fn from(raw: RawComponent) -> Self {
        match raw {
            RawComponent::Name(name) => ComponentRequest::new(name),
            RawComponent::Detailed {
                item_name,
                modifications: mods,
            } => ComponentRequest::new(item_name.unwrap_or_default())
                .with_modifications(modifications(mods)),
        }
    }
}

#[derive(Deserialize)]
struct RawCombo {
    entree: Option<RawComponent>,
    side: Option<RawComponent>,
    drink: Option<RawComponent>,
    quantity: Option<RawNumber>,
}

impl RawCombo {
    fn into_request(self) -> CoreResult<ComboRequest> {
        Ok(ComboRequest {
            entree: self.entree.map(Into::into),
            side: self.side.map(Into::into),
            drink: self.drink.map(Into::into),
            quantity: parse_quantity(self.quantity)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_payload() {
        let op = Operation::parse(
            "add_to_cart",
            json!({"item_name": "Big Mac", "quantity": 2, "modifications": ["no pickles"]}),
        )
        .unwrap();

        assert_eq!(
            op,
            Operation::AddToCart(
                ItemRequest::new("Big Mac", 2).with_modifications(["no pickles"])
            )
        );
        assert!(op.is_mutating());
    }

    #[test]
    fn test_parse_string_payload() {
        let op = Operation::parse(
            "remove_from_cart",
            json!(r#"{"item_name": "Sprite (Medium)", "quantity": "3"}"#),
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::RemoveFromCart(ItemRequest::new("Sprite (Medium)", 3))
        );
    }

    #[test]
    fn test_quantity_forms() {
        let quantity = |v: Value| match Operation::parse("add_to_cart", json!({"item_name": "x", "quantity": v})) {
            Ok(Operation::AddToCart(req)) => Ok(req.quantity),
            Ok(other) => panic!("unexpected {:?}", other),
            Err(e) => Err(e),
        };

        assert_eq!(quantity(json!(4)).unwrap(), 4);
        assert_eq!(quantity(json!(" 4 ")).unwrap(), 4);
        assert_eq!(quantity(json!(4.0)).unwrap(), 4);
        assert_eq!(quantity(Value::Null).unwrap(), 1);
        // Range is checked by the cart, not the parser
        assert_eq!(quantity(json!(0)).unwrap(), 0);

        assert!(matches!(
            quantity(json!(2.5)),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            quantity(json!("two")),
            Err(CoreError::InvalidQuantity { ref value, .. }) if value == "two"
        ));
    }

    #[test]
    fn test_single_modification_string() {
        let op = Operation::parse(
            "add_to_cart",
            json!({"item_name": "Iced Coffee", "modifications": "no sugar"}),
        )
        .unwrap();
        match op {
            Operation::AddToCart(req) => assert_eq!(req.modifications, ["no sugar"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_view_and_order_ignore_payload() {
        assert_eq!(
            Operation::parse("view_cart", json!("garbage {")).unwrap(),
            Operation::ViewCart
        );
        assert_eq!(
            Operation::parse(" PLACE_ORDER ", json!(null)).unwrap(),
            Operation::PlaceOrder
        );
    }

    #[test]
    fn test_unknown_tools_are_noops() {
        let op = Operation::parse("order_pizza", json!({"size": "large"})).unwrap();
        assert_eq!(
            op,
            Operation::NoOp {
                tool: "order_pizza".to_string()
            }
        );
        assert!(!op.is_mutating());

        let op = Operation::parse("do_nothing", json!(null)).unwrap();
        assert_eq!(op.tool_name(), "do_nothing");
    }

    #[test]
    fn test_malformed_payloads() {
        for payload in [json!("{not json"), json!([1, 2]), json!(42)] {
            assert!(matches!(
                Operation::parse("add_to_cart", payload),
                Err(CoreError::MalformedInput { .. })
            ));
        }
        assert!(matches!(
            Operation::parse("add_to_cart", json!({"item_name": 7})),
            Err(CoreError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_menu_query_payload() {
        let op = Operation::parse(
            "get_menu_item",
            json!({"category": "Sides", "max_calories": "300", "item_name": ""}),
        )
        .unwrap();
        assert_eq!(
            op,
            Operation::GetMenuItem(MenuFilter::new().category("sides").max_calories(300))
        );

        let op = Operation::parse("get_menu_item", Value::Null).unwrap();
        assert_eq!(op, Operation::GetMenuItem(MenuFilter::new()));
    }

    #[test]
    fn test_non_integer_calories_is_a_validation_error() {
        let err = Operation::parse("get_menu_item", json!({"max_calories": "lots"})).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidFormat { ref field, .. }) if field == "max_calories"
        ));
    }

    #[test]
    fn test_combo_slot_forms() {
        let op = Operation::parse(
            "add_combo",
            json!({
                "entree": "Big Mac",
                "side": {"item_name": "French Fries (Small)", "modifications": ["no salt"]},
                "drink": {"item_name": "Sprite (Medium)"},
                "quantity": 2
            }),
        )
        .unwrap();

        let expected = ComboRequest::new(
            ComponentRequest::new("Big Mac"),
            ComponentRequest::new("French Fries (Small)").with_modifications(["no salt"]),
            ComponentRequest::new("Sprite (Medium)"),
            2,
        );
        assert_eq!(op, Operation::AddCombo(expected));
    }

    #[test]
    fn test_combo_missing_slots_still_parse() {
        let op = Operation::parse("remove_combo", json!({"entree": "Big Mac"})).unwrap();
        match op {
            Operation::RemoveCombo(req) => {
                assert!(req.side.is_none());
                assert!(req.drink.is_none());
                assert_eq!(req.quantity, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_tool_catalog_covers_every_operation() {
        let names: Vec<_> = TOOLS.iter().map(|t| t.name).collect();
        for name in [
            "get_menu_item",
            "add_to_cart",
            "remove_from_cart",
            "view_cart",
            "add_combo",
            "remove_combo",
            "place_order",
            "do_nothing",
        ] {
            assert!(names.contains(&name), "missing {}", name);
        }
    }
}
