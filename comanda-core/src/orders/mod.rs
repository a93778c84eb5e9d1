//! Order aggregate operations

mod service;

pub use service::{CreateOrder, OrderService};
