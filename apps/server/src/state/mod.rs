//! # Application State
//!
//! Shared by every route through `State<Arc<AppState>>`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌─────────────────────┐  ┌──────────────────────┐   │
//! │  │   Database   │  │  RwLock<Arc<Menu>>  │  │    SessionStore      │   │
//! │  │              │  │                     │  │                      │   │
//! │  │  SQLite pool │  │  read: clone Arc    │  │  session_id ──►      │   │
//! │  │  (catalog +  │  │  reload: swap Arc   │  │    Arc<Mutex<Cart>>  │   │
//! │  │   orders)    │  │                     │  │                      │   │
//! │  └──────────────┘  └─────────────────────┘  └──────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool                                  │
//! │  • Menu: immutable once built; a reload never mutates a live menu      │
//! │  • Carts: one tokio Mutex per session                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod sessions;

pub use sessions::{SessionStore, SharedCart};

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use orderdesk_core::menu_data::house_menu_entries;
use orderdesk_core::Menu;
use orderdesk_db::{Database, DbConfig, DbResult};

use crate::config::DatabaseSettings;
use crate::error::ServerResult;

pub type SharedState = Arc<AppState>;

#[derive(Debug)]
pub struct AppState {
    db: Database,
    menu: RwLock<Arc<Menu>>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(db: Database, menu: Menu) -> Self {
        AppState {
            db,
            menu: RwLock::new(Arc::new(menu)),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Opens the database, seeds an empty catalog if configured to, and
    /// loads the menu.
    ///
    /// ## Startup Sequence
    /// 1. Connect and run migrations
    /// 2. Seed the house menu if `menu_items` is empty and `seed_if_empty`
    /// 3. Load and validate the catalog
    pub async fn initialize(settings: &DatabaseSettings) -> ServerResult<Self> {
        let config = if settings.path.as_os_str() == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&settings.path).max_connections(settings.max_connections)
        };

        let db = Database::new(config).await?;

        if settings.seed_if_empty && db.menu().count().await? == 0 {
            let seeded = db.menu().insert_all(&house_menu_entries()).await?;
            info!(items = seeded, "Seeded empty catalog with the house menu");
        }

        let menu = db.menu().load_menu().await?;
        if menu.is_empty() {
            tracing::warn!("Menu is empty; every item lookup will fail");
        }

        Ok(AppState::new(db, menu))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// The current menu. Callers keep their snapshot for the whole operation.
    pub async fn menu(&self) -> Arc<Menu> {
        self.menu.read().await.clone()
    }

    /// Reloads the catalog from the database and swaps it in.
    ///
    /// Carts keep their lines; simple lines are re-priced against the new
    /// menu on the next view, combo lines keep their snapshot price.
    pub async fn reload_menu(&self) -> DbResult<usize> {
        let fresh = self.db.menu().load_menu().await?;
        let count = fresh.len();
        *self.menu.write().await = Arc::new(fresh);

        info!(items = count, "Menu reloaded");
        Ok(count)
    }
}
