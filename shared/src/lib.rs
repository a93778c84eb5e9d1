//! Shared types for the comanda front-of-house system
//!
//! Domain models, the error taxonomy, change-feed event types and phone
//! normalization used by every client role (waiter, kitchen, cashier, admin).

pub mod error;
pub mod feed;
pub mod models;
pub mod phone;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use models::order::{LineItem, Order, OrderStatus, ServiceType};
pub use models::menu_item::MenuItem;
pub use models::role::{Actor, Role};
pub use models::sales_record::SalesRecord;
pub use serde::{Deserialize, Serialize};
