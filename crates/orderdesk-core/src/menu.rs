//! # Menu (Catalog Query)
//!
//! The read-only catalog, loaded once and shared by every session.
//!
//! ## Query Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_menu_item { item_name?, category?, max_calories? }                 │
//! │                                                                         │
//! │  item_name     exact match after trim + lowercase ("fries" matches     │
//! │                nothing; "french fries (small)" matches one entry)      │
//! │  category      exact match after trim + lowercase                      │
//! │  max_calories  inclusive upper bound                                   │
//! │                                                                         │
//! │  All given predicates are ANDed. None given → every entry.             │
//! │  Zero results → QueryOutcome::NoMatch (never an empty Vec).            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::key::normalize_name;
use crate::types::CatalogEntry;
use crate::validation::validate_catalog_entry;

// =============================================================================
// Filter
// =============================================================================

/// Optional, independent predicates for a catalog query.
///
/// Names and categories are stored normalized, so a filter built from raw
/// user text compares correctly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuFilter {
    pub item_name: Option<String>,
    pub category: Option<String>,
    pub max_calories: Option<i64>,
}

impl MenuFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank names are treated as absent.
    pub fn item_name(mut self, name: &str) -> Self {
        self.item_name = Some(normalize_name(name)).filter(|n| !n.is_empty());
        self
    }

    /// Blank categories are treated as absent.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(normalize_name(category)).filter(|c| !c.is_empty());
        self
    }

    pub fn max_calories(mut self, max: i64) -> Self {
        self.max_calories = Some(max);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.item_name.is_none() && self.category.is_none() && self.max_calories.is_none()
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let name_ok = self
            .item_name
            .as_deref()
            .map_or(true, |n| normalize_name(&entry.name) == n);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| normalize_name(&entry.category) == c);
        let calories_ok = self.max_calories.map_or(true, |max| entry.calories <= max);

        name_ok && category_ok && calories_ok
    }
}

// =============================================================================
// Query Outcome
// =============================================================================

/// Result of a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum QueryOutcome {
    Matches(Vec<CatalogEntry>),
    NoMatch,
}

impl QueryOutcome {
    pub fn is_no_match(&self) -> bool {
        matches!(self, QueryOutcome::NoMatch)
    }

    /// Matches as a slice; empty for `NoMatch`.
    pub fn items(&self) -> &[CatalogEntry] {
        match self {
            QueryOutcome::Matches(items) => items,
            QueryOutcome::NoMatch => &[],
        }
    }

    fn from_vec(items: Vec<CatalogEntry>) -> Self {
        if items.is_empty() {
            QueryOutcome::NoMatch
        } else {
            QueryOutcome::Matches(items)
        }
    }
}

// =============================================================================
// Menu
// =============================================================================

/// In-memory catalog with an index by normalized name.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    entries: Vec<CatalogEntry>,
    by_name: HashMap<String, usize>,
}

impl Menu {
    /// Builds a menu from trusted entries. Later duplicates of a name are
    /// ignored.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut menu = Menu::default();
        for mut entry in entries {
            entry.name = entry.name.trim().to_string();
            let key = normalize_name(&entry.name);
            if menu.by_name.contains_key(&key) {
                continue;
            }
            menu.by_name.insert(key, menu.entries.len());
            menu.entries.push(entry);
        }
        menu
    }

    /// Builds a menu from external data, rejecting invalid or duplicate entries.
    ///
    /// ## Errors
    /// * `Validation(Duplicate)` - two entries share a name ignoring case
    /// * `Validation(..)` - an entry has a blank name/category or negative numbers
    pub fn try_new(entries: Vec<CatalogEntry>) -> CoreResult<Self> {
        let mut seen = HashMap::new();
        for entry in &entries {
            validate_catalog_entry(entry)?;
            if seen.insert(normalize_name(&entry.name), ()).is_some() {
                return Err(CoreError::Validation(ValidationError::Duplicate {
                    field: "name".to_string(),
                    value: entry.name.trim().to_string(),
                }));
            }
        }
        Ok(Menu::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Exact, case-insensitive lookup by name.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_name
            .get(&normalize_name(name))
            .map(|&idx| &self.entries[idx])
    }

    /// Like [`Menu::get`] but fails with `ItemNotFound`.
    pub fn resolve(&self, name: &str) -> CoreResult<&CatalogEntry> {
        self.get(name).ok_or_else(|| CoreError::ItemNotFound {
            name: name.trim().to_string(),
        })
    }

    /// Runs a filter query.
    ///
    /// ## Example
    /// ```rust
    /// use orderdesk_core::menu::MenuFilter;
    /// use orderdesk_core::menu_data::house_menu;
    ///
    /// let menu = house_menu();
    /// let light_sides = menu.find(&MenuFilter::new().category("SIDES").max_calories(230));
    /// assert_eq!(light_sides.items().len(), 2); // small fries + apple slices
    ///
    /// assert!(menu.find(&MenuFilter::new().item_name("fries")).is_no_match());
    /// ```
    pub fn find(&self, filter: &MenuFilter) -> QueryOutcome {
        // Name lookups go through the index.
        if let Some(name) = filter.item_name.as_deref() {
            let hit = self.get(name).filter(|e| filter.matches(e)).cloned();
            return QueryOutcome::from_vec(hit.into_iter().collect());
        }

        QueryOutcome::from_vec(
            self.entries
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect(),
        )
    }

    /// Entries grouped by lower-cased category, in menu order within a group.
    pub fn by_category(&self) -> BTreeMap<String, Vec<&CatalogEntry>> {
        let mut groups: BTreeMap<String, Vec<&CatalogEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups
                .entry(normalize_name(&entry.category))
                .or_default()
                .push(entry);
        }
        groups
    }

    /// One digest line per entry: `- Big Mac (Burgers): $5.29`.
    pub fn summary_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("- {} ({}): {}", e.name, e.category, e.price()))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu_data::house_menu;
    use crate::types::ItemType;

    #[test]
    fn test_empty_filter_returns_everything() {
        let menu = house_menu();
        assert_eq!(menu.find(&MenuFilter::new()).items().len(), menu.len());
    }

    #[test]
    fn test_name_match_is_exact_and_case_insensitive() {
        let menu = house_menu();

        let hit = menu.find(&MenuFilter::new().item_name("  big MAC "));
        assert_eq!(hit.items().len(), 1);
        assert_eq!(hit.items()[0].name, "Big Mac");

        // No substring matching across the three fry sizes
        assert!(menu.find(&MenuFilter::new().item_name("french fries")).is_no_match());
    }

    #[test]
    fn test_category_and_calories_are_anded() {
        let menu = house_menu();

        let burgers = menu.find(&MenuFilter::new().category("burgers"));
        assert_eq!(burgers.items().len(), 4);

        let light_burgers = menu.find(&MenuFilter::new().category("Burgers").max_calories(520));
        let names: Vec<_> = light_burgers.items().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Quarter Pounder with Cheese", "Cheeseburger"]);

        // Bound is inclusive
        let exact = menu.find(&MenuFilter::new().item_name("Cheeseburger").max_calories(300));
        assert_eq!(exact.items().len(), 1);
        let below = menu.find(&MenuFilter::new().item_name("Cheeseburger").max_calories(299));
        assert!(below.is_no_match());
    }

    #[test]
    fn test_no_match_is_distinguished() {
        let menu = house_menu();
        let outcome = menu.find(&MenuFilter::new().category("desserts"));
        assert_eq!(outcome, QueryOutcome::NoMatch);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_match");
    }

    #[test]
    fn test_blank_predicates_are_ignored() {
        let filter = MenuFilter::new().item_name("   ").category("");
        assert!(filter.is_empty());
    }

    #[test]
    fn test_try_new_rejects_case_insensitive_duplicates() {
        let entries = vec![
            CatalogEntry::new("Sprite", "Beverages", 199, 140, ItemType::Drink),
            CatalogEntry::new("SPRITE", "Beverages", 209, 140, ItemType::Drink),
        ];
        let err = Menu::try_new(entries.clone()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));

        // The trusting constructor keeps the first
        let menu = Menu::new(entries);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.resolve("sprite").unwrap().price_cents, 199);
    }

    #[test]
    fn test_resolve_trims_names() {
        let menu = house_menu();
        assert!(menu.resolve(" 10 piece chicken mcnuggets ").is_ok());

        let padded = Menu::new(vec![CatalogEntry::new(
            " Iced Coffee ",
            "Beverages",
            249,
            180,
            ItemType::Drink,
        )]);
        assert_eq!(padded.entries()[0].name, "Iced Coffee");
        assert!(matches!(
            menu.resolve("Big Mack"),
            Err(CoreError::ItemNotFound { ref name }) if name == "Big Mack"
        ));
    }

    #[test]
    fn test_grouping_and_summary() {
        let menu = house_menu();
        let groups = menu.by_category();
        assert_eq!(groups["beverages"].len(), 3);
        assert_eq!(groups["sides"].len(), 4);

        let summary = menu.summary_lines();
        assert_eq!(summary[0], "- Big Mac (Burgers): $5.29");
    }
}
