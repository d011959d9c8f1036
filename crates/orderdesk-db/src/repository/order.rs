//! # Order Repository
//!
//! The append-only order sink. Orders are written once by `place_order`
//! and only ever read back afterwards.
//!
//! ## Stored Shape
//! ```text
//! orders
//! ├── id              uuid (text)
//! ├── session_id      conversation that placed it
//! ├── created_at      RFC 3339, UTC
//! ├── line_count      ┐
//! ├── total_quantity  ├─ denormalized for listing without decoding lines
//! ├── total_cents     ┘
//! └── lines           JSON array of OrderLine snapshots
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use orderdesk_core::{Money, OrderLine, OrderRecord};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    session_id: String,
    created_at: DateTime<Utc>,
    total_cents: i64,
    lines: String,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        let id = Uuid::parse_str(&row.id).map_err(|e| DbError::corrupt("order", e))?;
        let lines: Vec<OrderLine> = serde_json::from_str(&row.lines)?;

        Ok(OrderRecord {
            id,
            session_id: row.session_id,
            created_at: row.created_at,
            lines,
            total_cents: Money::from_cents(row.total_cents),
        })
    }
}

/// Repository for submitted orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a submitted order.
    ///
    /// ## Errors
    /// * `UniqueViolation` - an order with this id was already stored
    /// * `QueryFailed` - the row violates a schema check (e.g. no lines)
    pub async fn insert(&self, order: &OrderRecord) -> DbResult<()> {
        debug!(
            id = %order.id,
            session_id = %order.session_id,
            lines = order.lines.len(),
            "Inserting order"
        );

        let lines = serde_json::to_string(&order.lines)?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, session_id, created_at,
                line_count, total_quantity, total_cents, lines
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(order.id.to_string())
        .bind(&order.session_id)
        .bind(order.created_at)
        .bind(order.lines.len() as i64)
        .bind(order.total_quantity())
        .bind(order.total_cents.cents())
        .bind(lines)
        .execute(&self.pool)
        .await?;

        info!(id = %order.id, total = %order.total_cents, "Order stored");
        Ok(())
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<OrderRecord>> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, session_id, created_at, total_cents, lines
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRecord::try_from).transpose()
    }

    /// Most recent orders first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<OrderRecord>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, session_id, created_at, total_cents, lines
            FROM orders
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderRecord::try_from).collect()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
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
    use chrono::Duration;
    use orderdesk_core::cart::{Cart, ItemRequest};
    use orderdesk_core::menu_data::house_menu;

    fn order_at(session: &str, at: DateTime<Utc>) -> OrderRecord {
        let menu = house_menu();
        let mut cart = Cart::new();
        cart.add_item(&menu, &ItemRequest::new("Big Mac", 2)).unwrap();
        cart.add_item(&menu, &ItemRequest::new("Sprite (Medium)", 1)).unwrap();
        cart.checkout(&menu, session, at).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = order_at("thread-1", Utc::now());

        db.orders().insert(&order).await.unwrap();

        let loaded = db.orders().get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, order.id);
        assert_eq!(loaded.lines, order.lines);
        assert_eq!(loaded.total_cents.cents(), 529 * 2 + 199);
        assert_eq!(loaded.created_at.timestamp(), order.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_missing_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.orders().get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = order_at("thread-1", Utc::now());

        db.orders().insert(&order).await.unwrap();
        assert!(matches!(
            db.orders().insert(&order).await,
            Err(DbError::UniqueViolation { .. })
        ));
        assert_eq!(db.orders().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let older = order_at("a", now - Duration::minutes(5));
        let newer = order_at("b", now);
        db.orders().insert(&older).await.unwrap();
        db.orders().insert(&newer).await.unwrap();

        let recent = db.orders().list_recent(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, newer.id);

        assert_eq!(db.orders().list_recent(1).await.unwrap().len(), 1);
    }
}
