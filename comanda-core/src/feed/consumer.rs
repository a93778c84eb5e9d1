//! Per-client feed consumer
//!
//! One consumer per connected client: it full-resyncs its board from the
//! store on startup, then folds at-least-once, unordered feed deliveries
//! into the board by re-fetching each touched order. A fetched status older
//! than one already observed is a stale read and is ignored, which keeps
//! per-order status observation monotonic even when deliveries race.

use crate::store::{OrderFilter, OrderStore};
use shared::error::{CoreError, CoreResult};
use shared::feed::{FeedEvent, OrderChanged};
use shared::models::order::{Order, OrderStatus};
use shared::models::role::{Actor, Role};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};

use super::view::BoardView;

/// Capacity of the per-client notification channel
const NOTIFY_CAPACITY: usize = 256;

/// What each role's board subscribes to
#[derive(Debug, Clone)]
pub enum RoleFilter {
    /// Submitted and ready orders, in preparation order
    Kitchen,
    /// Orders approaching or awaiting settlement
    Cashier,
    /// The waiter's own active orders
    Waiter { owner_id: String },
    /// Every order, archived included
    Admin,
}

impl RoleFilter {
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::Kitchen => Self::Kitchen,
            Role::Cashier => Self::Cashier,
            Role::Waiter => Self::Waiter {
                owner_id: actor.id.clone(),
            },
            Role::Admin => Self::Admin,
        }
    }

    /// Store-side query equivalent of this board
    pub fn query(&self) -> OrderFilter {
        match self {
            Self::Kitchen => {
                OrderFilter::with_statuses(vec![OrderStatus::Submitted, OrderStatus::Ready])
            }
            Self::Cashier => OrderFilter::with_statuses(vec![
                OrderStatus::Ready,
                OrderStatus::PendingPayment,
                OrderStatus::Delivered,
            ]),
            Self::Waiter { owner_id } => OrderFilter {
                owner_id: Some(owner_id.clone()),
                exclude_completed: true,
                ..OrderFilter::default()
            },
            Self::Admin => OrderFilter::all(),
        }
    }

    pub fn accepts(&self, order: &Order) -> bool {
        self.query().matches(order)
    }
}

pub struct FeedConsumer<S: OrderStore + ?Sized> {
    store: Arc<S>,
    filter: RoleFilter,
    view: BoardView,
    /// Highest status observed per order, the monotonicity guard
    seen: HashMap<String, OrderStatus>,
    notify_tx: mpsc::Sender<OrderChanged>,
}

impl<S: OrderStore + ?Sized> FeedConsumer<S> {
    /// Build a consumer and the notification channel its client listens on.
    pub fn new(store: Arc<S>, filter: RoleFilter) -> (Self, mpsc::Receiver<OrderChanged>) {
        let (notify_tx, notify_rx) = mpsc::channel(NOTIFY_CAPACITY);
        let consumer = Self {
            store,
            filter,
            view: BoardView::new(),
            seen: HashMap::new(),
            notify_tx,
        };
        (consumer, notify_rx)
    }

    /// Handle to the board this consumer maintains. Clone before `run`.
    pub fn view(&self) -> BoardView {
        self.view.clone()
    }

    /// Resync, then fold feed deliveries until the feed closes.
    ///
    /// A delivery that fails mid-handling (store hiccup) is logged and
    /// skipped; the next event or resync for that order repairs the board.
    pub async fn run(mut self, mut rx: broadcast::Receiver<FeedEvent>) -> CoreResult<()> {
        self.resync().await?;

        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(err) = self.apply(&event.order_id).await {
                        tracing::warn!(
                            order_id = %event.order_id,
                            error = %err,
                            "Skipping feed delivery"
                        );
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Feed consumer lagged, resyncing board");
                    self.resync().await?;
                }
                Err(RecvError::Closed) => {
                    tracing::info!(filter = ?self.filter, "Change feed closed");
                    return Ok(());
                }
            }
        }
    }

    /// Replace the board wholesale from a store query. Run on startup and
    /// after any gap in deliveries; also the reconnect path.
    async fn resync(&mut self) -> CoreResult<()> {
        let rows = self
            .store
            .list_orders(&self.filter.query())
            .await
            .map_err(CoreError::from)?;
        self.seen = rows.iter().map(|o| (o.id.clone(), o.status)).collect();
        tracing::info!(filter = ?self.filter, orders = rows.len(), "Board resynced");
        self.view.replace_all(rows);
        Ok(())
    }

    async fn apply(&mut self, order_id: &str) -> CoreResult<()> {
        let Some(order) = self
            .store
            .get_order(order_id)
            .await
            .map_err(CoreError::from)?
        else {
            // Row deleted out from under the feed
            self.seen.remove(order_id);
            self.view.remove(order_id);
            return Ok(());
        };

        if !should_apply(self.seen.get(order_id).copied(), order.status) {
            tracing::debug!(order_id = %order_id, status = %order.status, "Stale read ignored");
            return Ok(());
        }
        self.seen.insert(order_id.to_string(), order.status);

        if self.filter.accepts(&order) {
            self.view.upsert(order);
        } else {
            self.view.remove(order_id);
        }

        // Nudge, not data: the view already holds the fresh row, so a full
        // channel just drops the nudge.
        if self
            .notify_tx
            .try_send(OrderChanged {
                order_id: order_id.to_string(),
            })
            .is_err()
        {
            tracing::debug!(order_id = %order_id, "Notification channel full, dropping nudge");
        }
        Ok(())
    }
}

/// A re-fetch that reads an earlier status than one already observed is a
/// stale replica read, never a real rollback.
fn should_apply(observed: Option<OrderStatus>, fetched: OrderStatus) -> bool {
    observed.is_none_or(|prior| fetched >= prior)
}
