//! # Order Sink
//!
//! Where `place_order` writes submitted orders. The database repository is
//! the production sink; tests plug in memory and failing sinks.

use std::future::Future;

use orderdesk_core::OrderRecord;
use orderdesk_db::{DbError, DbResult, OrderRepository};

pub trait OrderSink: Send + Sync {
    /// Persists one order. Either the whole record is stored or nothing is.
    fn insert(&self, order: &OrderRecord) -> impl Future<Output = DbResult<()>> + Send;
}

impl OrderSink for OrderRepository {
    fn insert(&self, order: &OrderRecord) -> impl Future<Output = DbResult<()>> + Send {
        OrderRepository::insert(self, order)
    }
}

/// Customer-facing cause for a failed order write. The full error is logged
/// separately.
pub fn failure_cause(err: &DbError) -> String {
    match err {
        DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
            "order storage is unavailable, please try again".to_string()
        }
        DbError::UniqueViolation { .. } => "an order with this id already exists".to_string(),
        _ => "order storage rejected the order".to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps orders in memory.
    #[derive(Debug, Default)]
    pub struct MemorySink {
        pub orders: Mutex<Vec<OrderRecord>>,
    }

    impl MemorySink {
        pub fn count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }
    }

    impl OrderSink for MemorySink {
        async fn insert(&self, order: &OrderRecord) -> DbResult<()> {
            self.orders.lock().unwrap().push(order.clone());
            Ok(())
        }
    }

    /// Rejects every write.
    #[derive(Debug, Default)]
    pub struct FailingSink;

    impl OrderSink for FailingSink {
        async fn insert(&self, _order: &OrderRecord) -> DbResult<()> {
            Err(DbError::ConnectionFailed("database is locked".into()))
        }
    }
}
