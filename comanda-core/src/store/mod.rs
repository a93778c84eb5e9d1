//! Store boundary
//!
//! The external managed database is reached exclusively through the
//! [`OrderStore`] trait, injected into every service at construction.
//! The store must provide, per the synchronization contract:
//!
//! | Capability | Used by |
//! |------------|---------|
//! | filter-and-query over orders | change-feed resync, role boards |
//! | conditional update on `status` | every state transition (optimistic CAS) |
//! | first-writer-wins sales append | ledger projection idempotency |
//! | row-level security (external) | surfaced here as `PermissionDenied` |
//!
//! Rows that fail to decode against the typed schema are a `Decode` error at
//! this boundary, surfaced to callers as `ValidationError` — never silently
//! defaulted.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::CoreError;
use shared::feed::FeedEvent;
use shared::models::menu_item::MenuItem;
use shared::models::order::{Order, OrderStatus, ServiceType};
use shared::models::sales_record::SalesRecord;
use thiserror::Error;
use tokio::sync::broadcast;

/// Store boundary errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row-level security denied the write (external policy)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Conditional update failed: stored status no longer matches
    #[error("Conflict on order {order_id}: expected {expected}, found {actual}")]
    Conflict {
        order_id: String,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// Row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Insert collided with an existing row
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Row failed schema validation at the boundary
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transport or capacity failure
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied(msg) => CoreError::Authorization(msg),
            StoreError::Conflict { .. } => CoreError::Conflict(err.to_string()),
            StoreError::NotFound(msg) => CoreError::NotFound(msg),
            StoreError::Duplicate(msg) => CoreError::Conflict(msg),
            StoreError::Decode(msg) => CoreError::Validation(msg),
            StoreError::Unavailable(msg) => CoreError::Store(msg),
        }
    }
}

/// Server-side query filter for orders
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Restrict to these statuses (None = any)
    pub statuses: Option<Vec<OrderStatus>>,
    /// Restrict to orders owned by this staff account
    pub owner_id: Option<String>,
    /// Restrict to one service type
    pub service_type: Option<ServiceType>,
    /// Drop archived (`Completed`) orders
    pub exclude_completed: bool,
}

impl OrderFilter {
    /// Everything, including archived orders
    pub fn all() -> Self {
        Self::default()
    }

    /// Everything still on an active board
    pub fn active() -> Self {
        Self {
            exclude_completed: true,
            ..Self::default()
        }
    }

    pub fn with_statuses(statuses: impl Into<Vec<OrderStatus>>) -> Self {
        Self {
            statuses: Some(statuses.into()),
            ..Self::default()
        }
    }

    /// Whether an order row matches this filter
    pub fn matches(&self, order: &Order) -> bool {
        if self.exclude_completed && order.status == OrderStatus::Completed {
            return false;
        }
        if let Some(statuses) = &self.statuses
            && !statuses.contains(&order.status)
        {
            return false;
        }
        if let Some(owner) = &self.owner_id
            && order.owner_id.as_deref() != Some(owner.as_str())
        {
            return false;
        }
        if let Some(service) = self.service_type
            && order.service_type != service
        {
            return false;
        }
        true
    }
}

/// CRUD plus conditional-update access to the shared collections.
///
/// Implementations must guarantee per-row atomicity: `update_order` commits
/// only when the stored status equals `expected_status`, even under
/// concurrent writers. That single guarantee is what serializes racing
/// transitions from independent clients.
#[async_trait]
pub trait OrderStore: Send + Sync {
    // ── Orders ──────────────────────────────────────────────────────

    async fn insert_order(&self, order: &Order) -> StoreResult<()>;

    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    /// Replace the order row, conditioned on the stored status still being
    /// `expected_status`. Returns the persisted row.
    async fn update_order(&self, order: &Order, expected_status: OrderStatus)
    -> StoreResult<Order>;

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>>;

    // ── Menu catalog ────────────────────────────────────────────────

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<()>;

    async fn get_menu_item(&self, menu_item_id: &str) -> StoreResult<Option<MenuItem>>;

    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<()>;

    async fn list_menu_items(&self, only_active: bool) -> StoreResult<Vec<MenuItem>>;

    // ── Sales ledger ────────────────────────────────────────────────

    /// Append the sales rows for one order, first-writer-wins.
    ///
    /// Returns `false` without writing when records for `order_id` already
    /// exist; this is the at-most-once guard the ledger projector relies on
    /// when change-feed events are redelivered.
    async fn append_sales_records(
        &self,
        order_id: &str,
        records: &[SalesRecord],
    ) -> StoreResult<bool>;

    async fn sales_by_date(&self, date: NaiveDate) -> StoreResult<Vec<SalesRecord>>;
}

/// Realtime notification side of the store boundary.
///
/// Delivery is at-least-once with no ordering guarantee across distinct
/// orders; consumers re-fetch on receipt and resync on (re)connect.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<FeedEvent>;
}
