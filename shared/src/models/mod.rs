//! Domain models

pub mod menu_item;
pub mod order;
pub mod role;
pub mod sales_record;

pub use menu_item::MenuItem;
pub use order::{LineItem, Order, OrderStatus, ServiceType};
pub use role::{Actor, Role};
pub use sales_record::SalesRecord;
