//! # Combo Operations
//!
//! An entree, a side and a drink bundled at a discount.
//!
//! ## Validation Order
//! ```text
//! add_combo { entree, side, drink, quantity }
//!      │
//!      ├── any slot missing / blank?      → IncompleteCombo { missing }
//!      ├── quantity outside 1..=999?      → InvalidQuantity
//!      ├── component not on the menu?     → ComponentNotFound { slot, name }
//!      ├── component type != slot?        → WrongComponentType { .. }
//!      └── modification not offered?      → InvalidModification
//!      │
//!      ▼
//! price_per_combo = (entree + side + drink) - 10%   (snapshotted on the line)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::{Cart, LinePricing, Removed};
use crate::error::{CoreError, CoreResult};
use crate::key::{ComboKey, ItemKey, LineKey, Modifications};
use crate::menu::Menu;
use crate::money::Money;
use crate::types::{CatalogEntry, ComboSlot};
use crate::validation::{validate_modifications, validate_quantity, validate_removal_quantity};
use crate::COMBO_DISCOUNT_BPS;

// =============================================================================
// Requests
// =============================================================================

/// One slot of a combo request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentRequest {
    pub item_name: String,
    #[serde(default)]
    pub modifications: Vec<String>,
}

impl ComponentRequest {
    pub fn new(item_name: impl Into<String>) -> Self {
        ComponentRequest {
            item_name: item_name.into(),
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

    fn key(&self) -> ItemKey {
        ItemKey::new(&self.item_name, Modifications::new(&self.modifications))
    }
}

/// A combo add/remove request. Slots are optional so an incomplete request
/// can be reported precisely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboRequest {
    pub entree: Option<ComponentRequest>,
    pub side: Option<ComponentRequest>,
    pub drink: Option<ComponentRequest>,
    pub quantity: i64,
}

impl ComboRequest {
    pub fn new(
        entree: ComponentRequest,
        side: ComponentRequest,
        drink: ComponentRequest,
        quantity: i64,
    ) -> Self {
        ComboRequest {
            entree: Some(entree),
            side: Some(side),
            drink: Some(drink),
            quantity,
        }
    }

    pub fn slot(&self, slot: ComboSlot) -> Option<&ComponentRequest> {
        match slot {
            ComboSlot::Entree => self.entree.as_ref(),
            ComboSlot::Side => self.side.as_ref(),
            ComboSlot::Drink => self.drink.as_ref(),
        }
    }

    /// Returns the three components, or `IncompleteCombo` listing every
    /// missing or blank slot.
    fn components(&self) -> CoreResult<[&ComponentRequest; 3]> {
        let missing: Vec<ComboSlot> = ComboSlot::ALL
            .into_iter()
            .filter(|&slot| {
                self.slot(slot)
                    .map_or(true, |c| c.item_name.trim().is_empty())
            })
            .collect();

        match (&self.entree, &self.side, &self.drink) {
            (Some(entree), Some(side), Some(drink)) if missing.is_empty() => {
                Ok([entree, side, drink])
            }
            _ => Err(CoreError::IncompleteCombo { missing }),
        }
    }

    fn key(components: [&ComponentRequest; 3]) -> ComboKey {
        let [entree, side, drink] = components;
        ComboKey {
            entree: entree.key(),
            side: side.key(),
            drink: drink.key(),
        }
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Discounted price of one combo built from these entries.
///
/// ## Example
/// ```rust
/// use orderdesk_core::combo::combo_price;
/// use orderdesk_core::menu_data::house_menu;
///
/// let menu = house_menu();
/// let price = combo_price(
///     menu.get("Big Mac").unwrap(),
///     menu.get("French Fries (Small)").unwrap(),
///     menu.get("Coca-Cola (Medium)").unwrap(),
/// );
/// assert_eq!(price.to_string(), "$8.27");
/// ```
pub fn combo_price(entree: &CatalogEntry, side: &CatalogEntry, drink: &CatalogEntry) -> Money {
    let subtotal = entree.price() + side.price() + drink.price();
    subtotal.apply_percentage_discount(COMBO_DISCOUNT_BPS)
}

/// Resolves one component and checks it fits its slot.
fn resolve_component<'m>(
    menu: &'m Menu,
    slot: ComboSlot,
    request: &ComponentRequest,
    key: &ItemKey,
) -> CoreResult<&'m CatalogEntry> {
    let entry = menu
        .get(&request.item_name)
        .ok_or_else(|| CoreError::ComponentNotFound {
            slot,
            name: key.name.clone(),
        })?;

    if entry.item_type != slot.expected_type() {
        return Err(CoreError::WrongComponentType {
            slot,
            name: key.name.clone(),
            expected: slot.expected_type(),
            found: entry.item_type,
        });
    }

    validate_modifications(entry, &key.modifications)?;
    Ok(entry)
}

// =============================================================================
// Cart Operations
// =============================================================================

impl Cart {
    /// Adds a combo to the cart.
    ///
    /// The price is computed from the current menu when the line is first
    /// created and kept for the life of the line.
    pub fn add_combo(&mut self, menu: &Menu, request: &ComboRequest) -> CoreResult<AddedCombo> {
        let components = request.components()?;
        let quantity = validate_quantity(request.quantity)?;
        let key = ComboRequest::key(components);

        let mut entries = Vec::with_capacity(3);
        for (slot, component) in ComboSlot::ALL.into_iter().zip(components) {
            entries.push(resolve_component(menu, slot, component, key.component(slot))?);
        }
        let price_per_combo = combo_price(entries[0], entries[1], entries[2]);

        // An existing line keeps its original snapshot price.
        let line_key = LineKey::Combo(key.clone());
        let pricing = LinePricing::Combo { price_per_combo };
        let line_quantity = self.increment(line_key.clone(), quantity, pricing)?;
        let price_per_combo = self
            .line(&line_key)
            .and_then(|line| match line.pricing {
                LinePricing::Combo { price_per_combo } => Some(price_per_combo),
                LinePricing::Catalog => None,
            })
            .unwrap_or(price_per_combo);

        Ok(AddedCombo {
            key,
            added: quantity,
            line_quantity,
            price_per_combo,
        })
    }

    /// Removes up to `quantity` of a combo line. Components are matched by
    /// normalized name and modifications; the menu is not consulted.
    pub fn remove_combo(&mut self, request: &ComboRequest) -> CoreResult<Removed> {
        let components = request.components()?;
        let quantity = validate_removal_quantity(request.quantity)?;
        let key = ComboRequest::key(components);
        self.decrement(LineKey::Combo(key), quantity)
    }
}

// =============================================================================
// Operation Result
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedCombo {
    pub key: ComboKey,
    pub added: i64,
    pub line_quantity: i64,
    pub price_per_combo: Money,
}

impl fmt::Display for AddedCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added {} combo(s) including {} with a 10% discount to your cart. Price per combo: {}",
            self.added,
            self.key.names(),
            self.price_per_combo
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartView;
    use crate::menu_data::house_menu;
    use crate::types::{CatalogEntry, ItemType};

    fn classic(quantity: i64) -> ComboRequest {
        ComboRequest::new(
            ComponentRequest::new("Big Mac"),
            ComponentRequest::new("French Fries (Small)"),
            ComponentRequest::new("Coca-Cola (Medium)"),
            quantity,
        )
    }

    #[test]
    fn test_combo_price_is_discounted_sum() {
        let menu = house_menu();
        let mut cart = Cart::new();

        let added = cart.add_combo(&menu, &classic(1)).unwrap();

        assert_eq!(added.price_per_combo.cents(), 827);
        assert_eq!(
            added.to_string(),
            "Added 1 combo(s) including big mac, french fries (small), and coca-cola (medium) \
             with a 10% discount to your cart. Price per combo: $8.27"
        );
    }

    #[test]
    fn test_same_combo_increments() {
        let menu = house_menu();
        let mut cart = Cart::new();

        cart.add_combo(&menu, &classic(1)).unwrap();
        let added = cart.add_combo(&menu, &classic(2)).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(added.line_quantity, 3);
    }

    #[test]
    fn test_drink_modifications_make_a_distinct_combo() {
        let menu = house_menu();
        let mut cart = Cart::new();

        cart.add_combo(&menu, &classic(1)).unwrap();
        let mut no_ice = classic(1);
        no_ice.drink = Some(ComponentRequest::new("Coca-Cola (Medium)").with_modifications(["no ice"]));
        cart.add_combo(&menu, &no_ice).unwrap();

        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_wrong_type_names_the_slot() {
        let menu = house_menu();
        let mut cart = Cart::new();

        let mut request = classic(1);
        request.side = Some(ComponentRequest::new("Sprite (Medium)"));
        let err = cart.add_combo(&menu, &request).unwrap_err();

        match err {
            CoreError::WrongComponentType {
                slot,
                expected,
                found,
                ..
            } => {
                assert_eq!(slot, ComboSlot::Side);
                assert_eq!(expected, ItemType::Side);
                assert_eq!(found, ItemType::Drink);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_component() {
        let menu = house_menu();
        let mut cart = Cart::new();

        let mut request = classic(1);
        request.entree = Some(ComponentRequest::new("Whopper"));
        assert!(matches!(
            cart.add_combo(&menu, &request),
            Err(CoreError::ComponentNotFound {
                slot: ComboSlot::Entree,
                ..
            })
        ));
    }

    #[test]
    fn test_incomplete_combo_lists_missing_slots() {
        let menu = house_menu();
        let mut cart = Cart::new();

        let request = ComboRequest {
            entree: Some(ComponentRequest::new("Big Mac")),
            side: Some(ComponentRequest::new("  ")),
            drink: None,
            quantity: 1,
        };
        match cart.add_combo(&menu, &request).unwrap_err() {
            CoreError::IncompleteCombo { missing } => {
                assert_eq!(missing, vec![ComboSlot::Side, ComboSlot::Drink]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_component_modifications_are_validated() {
        let menu = house_menu();
        let mut cart = Cart::new();

        let mut request = classic(1);
        request.side =
            Some(ComponentRequest::new("French Fries (Small)").with_modifications(["no ice"]));
        assert!(matches!(
            cart.add_combo(&menu, &request),
            Err(CoreError::InvalidModification { .. })
        ));
    }

    #[test]
    fn test_snapshot_price_survives_menu_change() {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_combo(&menu, &classic(2)).unwrap();

        let mut pricier: Vec<CatalogEntry> = menu.entries().to_vec();
        for entry in &mut pricier {
            entry.price_cents += 100;
        }
        let pricier = Menu::new(pricier);

        // Adding more of the same combo keeps the original price
        let added = cart.add_combo(&pricier, &classic(1)).unwrap();
        assert_eq!(added.price_per_combo.cents(), 827);

        match cart.view(&pricier) {
            CartView::Contents { total_cents, .. } => assert_eq!(total_cents.cents(), 827 * 3),
            CartView::Empty { .. } => panic!("cart should not be empty"),
        }
    }

    #[test]
    fn test_remove_combo() {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_combo(&menu, &classic(3)).unwrap();

        let removed = cart.remove_combo(&classic(1)).unwrap();
        assert_eq!(removed.remaining, 2);
        assert_eq!(
            removed.to_string(),
            "Removed 1 combo(s) including big mac, french fries (small), and coca-cola (medium) from your cart."
        );

        let removed = cart.remove_combo(&classic(10)).unwrap();
        assert_eq!(removed.removed, 2);
        assert!(cart.is_empty());

        let err = cart.remove_combo(&classic(1)).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { .. }));
    }

    #[test]
    fn test_remove_combo_above_add_limit() {
        let menu = house_menu();

        for quantity in [crate::MAX_ITEM_QUANTITY, 1000, 5000, i64::MAX] {
            let mut cart = Cart::new();
            cart.add_combo(&menu, &classic(1)).unwrap();

            let removed = cart.remove_combo(&classic(quantity)).unwrap();
            assert_eq!(removed.removed, 1, "quantity {}", quantity);
            assert!(cart.is_empty());
        }

        let mut cart = Cart::new();
        cart.add_combo(&menu, &classic(1)).unwrap();
        assert!(matches!(
            cart.remove_combo(&classic(0)),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_mixed_cart_total() {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_combo(&menu, &classic(2)).unwrap();
        cart.add_item(&menu, &crate::cart::ItemRequest::new("Apple Slices", 3))
            .unwrap();

        match cart.view(&menu) {
            CartView::Contents {
                total_cents,
                total_quantity,
                ..
            } => {
                assert_eq!(total_cents.cents(), 827 * 2 + 71 * 3);
                assert_eq!(total_quantity, 5);
            }
            CartView::Empty { .. } => panic!("cart should not be empty"),
        }
    }
}
