//! # House Menu
//!
//! The built-in restaurant menu. Used to seed an empty database and as the
//! shared fixture in tests across the workspace.

use crate::menu::Menu;
use crate::types::{CatalogEntry, ItemType};

const FRIES_DESCRIPTION: &str = "Golden and crispy fries made with premium potatoes.";

/// Entries of the house menu, in display order.
pub fn house_menu_entries() -> Vec<CatalogEntry> {
    use ItemType::*;

    vec![
        // Burgers
        CatalogEntry::new("Big Mac", "Burgers", 529, 590, Entree)
            .with_description(
                "Two beef patties, Big Mac Sauce, pickles, lettuce, onions and American cheese on a sesame seed bun.",
            )
            .with_modifications([
                "no pickles",
                "no onions",
                "no cheese",
                "no lettuce",
                "no sauce",
                "extra sauce",
                "extra cheese",
                "extra lettuce",
                "extra onions",
                "extra pickles",
            ]),
        CatalogEntry::new("Quarter Pounder with Cheese", "Burgers", 639, 520, Entree)
            .with_description(
                "A quarter pound of fresh beef with slivered onions, pickles and two slices of American cheese.",
            )
            .with_modifications([
                "no pickles",
                "no onions",
                "no cheese",
                "no ketchup",
                "no mustard",
                "extra cheese",
                "extra onions",
                "extra pickles",
            ]),
        CatalogEntry::new("Double Quarter Pounder with Cheese", "Burgers", 749, 740, Entree)
            .with_description(
                "Two quarter pound patties, American cheese, onions, pickles, mustard and ketchup.",
            )
            .with_modifications([
                "no pickles",
                "no onions",
                "no cheese",
                "extra cheese",
                "extra pickles",
            ]),
        CatalogEntry::new("Cheeseburger", "Burgers", 299, 300, Entree)
            .with_description("A beef patty with American cheese, pickles, onions, ketchup and mustard.")
            .with_modifications([
                "no pickles",
                "no onions",
                "no cheese",
                "no ketchup",
                "no mustard",
                "extra cheese",
                "extra pickles",
            ]),
        // Chicken & Fish
        CatalogEntry::new("McChicken", "Chicken & Fish Sandwiches", 349, 400, Entree)
            .with_description("A crispy chicken sandwich with mayonnaise and shredded lettuce.")
            .with_modifications(["no lettuce", "no mayonnaise", "extra mayonnaise", "extra lettuce"]),
        CatalogEntry::new("Spicy McChicken", "Chicken & Fish Sandwiches", 379, 410, Entree)
            .with_description("A spicy, crispy chicken sandwich with mayonnaise and shredded lettuce.")
            .with_modifications(["no lettuce", "no mayonnaise", "extra mayonnaise", "extra lettuce"]),
        CatalogEntry::new("Filet-O-Fish", "Chicken & Fish Sandwiches", 499, 380, Entree)
            .with_description("A pollock fillet with American cheese and tartar sauce on a steamed bun.")
            .with_modifications([
                "no cheese",
                "no tartar sauce",
                "extra tartar sauce",
                "extra cheese",
            ]),
        CatalogEntry::new("10 piece Chicken McNuggets", "McNuggets & Meals", 549, 420, Entree)
            .with_description("Ten white meat Chicken McNuggets served with dipping sauce.")
            .with_modifications(["bbq sauce", "sweet and sour sauce", "honey mustard", "ranch"]),
        // Sides
        CatalogEntry::new("French Fries (Small)", "Sides", 191, 230, Side)
            .with_description(FRIES_DESCRIPTION)
            .with_modifications(["no salt", "extra salt"]),
        CatalogEntry::new("French Fries (Medium)", "Sides", 299, 320, Side)
            .with_description(FRIES_DESCRIPTION)
            .with_modifications(["no salt", "extra salt"]),
        CatalogEntry::new("French Fries (Large)", "Sides", 359, 480, Side)
            .with_description(FRIES_DESCRIPTION)
            .with_modifications(["no salt", "extra salt"]),
        CatalogEntry::new("Apple Slices", "Sides", 71, 15, Side)
            .with_description("A snack of fresh apple slices."),
        // Beverages
        CatalogEntry::new("Coca-Cola (Medium)", "Beverages", 199, 150, Drink)
            .with_description("A classic Coca-Cola served cold.")
            .with_modifications(["no ice", "light ice"]),
        CatalogEntry::new("Sprite (Medium)", "Beverages", 199, 140, Drink)
            .with_description("A crisp lemon-lime soda.")
            .with_modifications(["no ice", "light ice"]),
        CatalogEntry::new("Iced Coffee", "Beverages", 249, 180, Drink)
            .with_description("Premium roast iced coffee with cream and liquid sugar.")
            .with_modifications(["no sugar", "extra cream", "extra sugar"]),
    ]
}

/// The house menu as a ready-to-query [`Menu`].
pub fn house_menu() -> Menu {
    Menu::new(house_menu_entries())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_menu_is_valid() {
        let menu = Menu::try_new(house_menu_entries()).unwrap();
        assert_eq!(menu.len(), 15);
    }

    #[test]
    fn test_every_combo_slot_has_candidates() {
        let menu = house_menu();
        for item_type in [ItemType::Entree, ItemType::Side, ItemType::Drink] {
            assert!(menu.entries().iter().any(|e| e.item_type == item_type));
        }
    }
}
