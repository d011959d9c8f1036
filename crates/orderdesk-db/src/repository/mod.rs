//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Server                                                                 │
//! │       │                                                                 │
//! │       │  db.menu().load_menu()          db.orders().insert(&order)     │
//! │       ▼                                        ▼                        │
//! │  MenuRepository                         OrderRepository                 │
//! │  ├── list_all / load_menu               ├── insert                      │
//! │  ├── find(&MenuFilter)                  ├── get_by_id                   │
//! │  ├── insert / insert_all                ├── list_recent                 │
//! │  └── count                              └── count                       │
//! │       │                                        │                        │
//! │       ▼                                        ▼                        │
//! │  menu_items                              orders                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are runtime-checked (`sqlx::query_as` + `FromRow` row structs)
//! and converted to `orderdesk-core` types at the repository boundary.

pub mod menu;
pub mod order;
