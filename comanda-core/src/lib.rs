//! comanda-core — order lifecycle and multi-client synchronization
//!
//! The core of the front-of-house system: the order state machine, the store
//! boundary with optimistic concurrency, the change-feed consumer each role
//! runs, the sales ledger projector and the takeout notification side channel.
//!
//! Persistence, authentication and the realtime transport are external
//! boundaries injected at construction; nothing here holds a global client.

pub mod catalog;
pub mod config;
pub mod feed;
pub mod ledger;
pub mod logger;
pub mod machine;
pub mod money;
pub mod notify;
pub mod orders;
pub mod report;
pub mod store;
pub mod validation;

pub use catalog::{CatalogService, MenuItemUpdate};
pub use config::Config;
pub use feed::{BoardView, FeedConsumer, PendingOverlay, RoleFilter};
pub use ledger::SalesLedger;
pub use machine::TransitionKind;
pub use notify::{CustomerNotifier, NoopNotifier};
pub use orders::{CreateOrder, OrderService};
pub use report::{DailySummary, ReportService};
pub use store::{ChangeFeed, MemoryStore, OrderFilter, OrderStore, StoreError, StoreResult};
