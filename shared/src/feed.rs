//! Change-feed wire events
//!
//! The external realtime boundary delivers these at-least-once, with no
//! ordering guarantee across distinct orders. Consumers never trust the
//! embedded row: they re-fetch the full order from the store on receipt,
//! which is what makes per-order status observation monotonic.

use crate::models::order::Order;
use serde::{Deserialize, Serialize};

/// Kind of mutation observed at the store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Insert,
    Update,
}

/// One change-feed delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEvent {
    pub order_id: String,
    pub kind: ChangeKind,
    /// Row state at emission time. Informational only: may be stale by the
    /// time it is delivered, so consumers re-fetch instead of applying it.
    pub order: Order,
}

impl FeedEvent {
    pub fn insert(order: Order) -> Self {
        Self {
            order_id: order.id.clone(),
            kind: ChangeKind::Insert,
            order,
        }
    }

    pub fn update(order: Order) -> Self {
        Self {
            order_id: order.id.clone(),
            kind: ChangeKind::Update,
            order,
        }
    }
}

/// Typed notification handed to role views after the consumer has re-fetched
/// and accepted a change. The view decides when to re-derive, decoupling
/// notification from projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderChanged {
    pub order_id: String,
}
