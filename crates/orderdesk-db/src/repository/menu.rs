//! # Menu Repository
//!
//! Catalog reads for startup and reload, plus the inserts used by the seed
//! tool.
//!
//! ## Name Matching
//! `menu_items.name` is declared `COLLATE NOCASE`, so `name = ?` in SQL has
//! the same exact, case-insensitive semantics as [`Menu::get`]. Names are
//! trimmed before they are stored.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use orderdesk_core::{CatalogEntry, ItemType, Menu, MenuFilter, QueryOutcome};

/// Raw `menu_items` row.
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    name: String,
    category: String,
    description: Option<String>,
    price_cents: i64,
    calories: i64,
    item_type: ItemType,
    modifications: String,
}

impl TryFrom<MenuItemRow> for CatalogEntry {
    type Error = DbError;

    fn try_from(row: MenuItemRow) -> DbResult<Self> {
        let allowed_modifications: Vec<String> = serde_json::from_str(&row.modifications)
            .map_err(|e| DbError::corrupt("menu item", format!("{}: {}", row.name, e)))?;

        Ok(CatalogEntry {
            name: row.name,
            category: row.category,
            description: row.description,
            price_cents: row.price_cents,
            calories: row.calories,
            item_type: row.item_type,
            allowed_modifications,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT name, category, description, price_cents, calories, item_type, modifications FROM menu_items";

/// Repository for the menu catalog.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Every catalog entry, in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<CatalogEntry>> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(CatalogEntry::try_from).collect()
    }

    /// Loads the whole catalog as a validated [`Menu`].
    ///
    /// ## Errors
    /// * `CorruptRow` - a stored entry fails catalog validation
    pub async fn load_menu(&self) -> DbResult<Menu> {
        let entries = self.list_all().await?;
        let menu = Menu::try_new(entries).map_err(|e| DbError::corrupt("menu item", e))?;

        info!(items = menu.len(), "Menu loaded from database");
        Ok(menu)
    }

    /// Runs a catalog filter in SQL.
    ///
    /// Same semantics as [`Menu::find`]: exact name and category ignoring
    /// case, inclusive calorie bound, all ANDed.
    pub async fn find(&self, filter: &MenuFilter) -> DbResult<QueryOutcome> {
        debug!(?filter, "Querying menu");

        let sql = format!(
            "{} WHERE (?1 IS NULL OR name = ?1) \
             AND (?2 IS NULL OR category = ?2 COLLATE NOCASE) \
             AND (?3 IS NULL OR calories <= ?3) \
             ORDER BY id",
            SELECT_COLUMNS
        );

        let rows: Vec<MenuItemRow> = sqlx::query_as(&sql)
            .bind(filter.item_name.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.max_calories)
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .into_iter()
            .map(CatalogEntry::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = entries.len(), "Menu query returned entries");

        Ok(if entries.is_empty() {
            QueryOutcome::NoMatch
        } else {
            QueryOutcome::Matches(entries)
        })
    }

    /// Inserts one catalog entry. Returns its row id.
    ///
    /// ## Errors
    /// * `UniqueViolation` - an entry with this name (ignoring case) exists
    pub async fn insert(&self, entry: &CatalogEntry) -> DbResult<i64> {
        let name = entry.name.trim();
        debug!(name = %name, "Inserting menu item");

        let modifications = serde_json::to_string(&entry.allowed_modifications)?;

        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (
                name, category, description, price_cents, calories,
                item_type, modifications, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(name)
        .bind(entry.category.trim())
        .bind(entry.description.as_deref())
        .bind(entry.price_cents)
        .bind(entry.calories)
        .bind(entry.item_type)
        .bind(modifications)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
            other => other,
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts a batch of entries in one transaction. Nothing is written if
    /// any entry fails.
    pub async fn insert_all(&self, entries: &[CatalogEntry]) -> DbResult<usize> {
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            let modifications = serde_json::to_string(&entry.allowed_modifications)?;
            sqlx::query(
                r#"
                INSERT INTO menu_items (
                    name, category, description, price_cents, calories,
                    item_type, modifications, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(entry.name.trim())
            .bind(entry.category.trim())
            .bind(entry.description.as_deref())
            .bind(entry.price_cents)
            .bind(entry.calories)
            .bind(entry.item_type)
            .bind(modifications)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => {
                    DbError::duplicate(field, entry.name.trim())
                }
                other => other,
            })?;
        }

        tx.commit().await?;

        info!(count = entries.len(), "Menu items inserted");
        Ok(entries.len())
    }

    /// Counts catalog entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use orderdesk_core::menu_data::{house_menu, house_menu_entries};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu().insert_all(&house_menu_entries()).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_round_trip_matches_house_menu() {
        let db = seeded().await;

        let loaded = db.menu().load_menu().await.unwrap();
        let expected = house_menu();
        assert_eq!(loaded.entries(), expected.entries());
        assert_eq!(db.menu().count().await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_sql_find_matches_in_memory_find() {
        let db = seeded().await;
        let menu = house_menu();

        let filters = [
            MenuFilter::new(),
            MenuFilter::new().item_name("BIG MAC"),
            MenuFilter::new().item_name("french fries"),
            MenuFilter::new().category("sides").max_calories(230),
            MenuFilter::new().category("Beverages"),
            MenuFilter::new().max_calories(10),
        ];

        for filter in &filters {
            assert_eq!(
                db.menu().find(filter).await.unwrap(),
                menu.find(filter),
                "filter {:?}",
                filter
            );
        }
    }

    #[tokio::test]
    async fn test_duplicate_name_ignoring_case() {
        let db = seeded().await;

        let dup = CatalogEntry::new("big mac", "Burgers", 100, 100, ItemType::Entree);
        let err = db.menu().insert(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "big mac"));
    }

    #[tokio::test]
    async fn test_insert_all_is_atomic() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let entries = vec![
            CatalogEntry::new("Sprite (Medium)", "Beverages", 199, 140, ItemType::Drink),
            CatalogEntry::new("SPRITE (MEDIUM)", "Beverages", 199, 140, ItemType::Drink),
        ];

        assert!(db.menu().insert_all(&entries).await.is_err());
        assert_eq!(db.menu().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_negative_price_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let bad = CatalogEntry::new("Free Lunch", "Other", -1, 0, ItemType::Other);
        assert!(matches!(
            db.menu().insert(&bad).await,
            Err(DbError::QueryFailed(_))
        ));
    }
}
