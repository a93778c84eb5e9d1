//! OrderService — aggregate mutations behind the state machine
//!
//! Every mutation follows the same shape: load the row, validate against the
//! machine, write back with a conditional update, run side effects only after
//! the write committed. Optimistic-concurrency conflicts are retried a
//! bounded number of times; a retried transition that was already applied
//! fails as `InvalidTransition`, which callers treat as success-in-practice.

use crate::config::Config;
use crate::ledger::SalesLedger;
use crate::machine::{self, TransitionKind};
use crate::money;
use crate::notify::{self, CustomerNotifier};
use crate::store::{OrderStore, StoreError};
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use shared::error::{CoreError, CoreResult};
use shared::models::order::{Order, OrderStatus};
use shared::models::role::{Actor, Role};
use shared::phone;
use std::sync::Arc;

/// Order creation request
#[derive(Debug, Clone)]
pub enum CreateOrder {
    DineIn {
        table_number: u32,
        occupants: Option<u32>,
        note: Option<String>,
    },
    Takeout {
        customer_name: String,
        /// Raw phone input; normalized before the order is created
        customer_phone: String,
        note: Option<String>,
    },
}

pub struct OrderService<S: OrderStore + ?Sized> {
    store: Arc<S>,
    ledger: SalesLedger<S>,
    notifier: Arc<dyn CustomerNotifier>,
    config: Config,
}

impl<S: OrderStore + ?Sized> OrderService<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn CustomerNotifier>, config: Config) -> Self {
        Self {
            ledger: SalesLedger::new(store.clone()),
            store,
            notifier,
            config,
        }
    }

    /// Create a new order in `Unconfirmed` with no line items.
    ///
    /// Dine-in requires a table number; takeout requires a normalizable
    /// phone number. Admin-created orders carry no owner so any waiter can
    /// drive them.
    pub async fn create(&self, request: CreateOrder, actor: &Actor) -> CoreResult<Order> {
        let owner_id = match actor.role {
            Role::Admin => None,
            _ => Some(actor.id.clone()),
        };

        let order = match request {
            CreateOrder::DineIn {
                table_number,
                occupants,
                note,
            } => {
                if table_number == 0 {
                    return Err(CoreError::validation("Dine-in orders require a table number"));
                }
                validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
                let mut order = Order::dine_in(table_number, owner_id, occupants);
                order.note = note;
                order
            }
            CreateOrder::Takeout {
                customer_name,
                customer_phone,
                note,
            } => {
                validate_required_text(&customer_name, "customer_name", MAX_NAME_LEN)?;
                validate_optional_text(&note, "note", MAX_NOTE_LEN)?;
                // Rejecting the phone here means no order row is ever created
                // for an unreachable customer.
                let normalized = phone::normalize(&customer_phone, &self.config.country_code)?;
                let mut order = Order::takeout(customer_name, normalized, owner_id);
                order.note = note;
                order
            }
        };

        self.store.insert_order(&order).await?;
        tracing::info!(
            order_id = %order.id,
            service_type = ?order.service_type,
            label = %order.table_label(),
            "Order created"
        );
        Ok(order)
    }

    /// Append or merge a line item while the order is still `Unconfirmed`.
    ///
    /// Merge policy: re-adding the same menu item with an equal note merges
    /// quantities; a differing note appends a new row, since a note like
    /// "sin cebolla" is a distinct kitchen instruction.
    pub async fn add_line_item(
        &self,
        order_id: &str,
        menu_item_id: &str,
        quantity: u32,
        note: Option<String>,
        actor: &Actor,
    ) -> CoreResult<Order> {
        if quantity == 0 {
            return Err(CoreError::validation("Quantity must be at least 1"));
        }
        validate_optional_text(&note, "note", MAX_NOTE_LEN)?;

        let menu_item = self
            .store
            .get_menu_item(menu_item_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("menu item {}", menu_item_id)))?;
        if !menu_item.active {
            return Err(CoreError::validation(format!(
                "Menu item '{}' is not available",
                menu_item.name
            )));
        }

        self.mutate_line_items(order_id, actor, |order| {
            if let Some(existing) = order
                .line_items
                .iter_mut()
                .find(|li| li.menu_item_id == menu_item_id && li.note == note)
            {
                existing.quantity += quantity;
            } else {
                order.line_items.push(shared::models::order::LineItem {
                    id: uuid::Uuid::new_v4().to_string(),
                    order_id: order.id.clone(),
                    menu_item_id: menu_item_id.to_string(),
                    name: menu_item.name.clone(),
                    description: menu_item.description.clone(),
                    quantity,
                    // Price snapshot: later catalog edits never touch this
                    unit_price: menu_item.price,
                    note: note.clone(),
                });
            }
            Ok(())
        })
        .await
    }

    /// Remove a line item while the order is still `Unconfirmed`.
    pub async fn remove_line_item(
        &self,
        order_id: &str,
        line_item_id: &str,
        actor: &Actor,
    ) -> CoreResult<Order> {
        self.mutate_line_items(order_id, actor, |order| {
            let before = order.line_items.len();
            order.line_items.retain(|li| li.id != line_item_id);
            if order.line_items.len() == before {
                return Err(CoreError::not_found(format!("line item {}", line_item_id)));
            }
            Ok(())
        })
        .await
    }

    /// Drive the order to `target` on behalf of `actor`.
    ///
    /// Validated by the state machine, persisted with a status-conditional
    /// update, side effects (ledger projection, takeout notification) run
    /// only after commit.
    pub async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: &Actor,
    ) -> CoreResult<Order> {
        let mut attempts = 0u32;
        loop {
            let order = self.fetch(order_id).await?;
            let kind = machine::validate(&order, target, actor)?;

            let mut updated = order.clone();
            updated.status = target;
            if kind.recomputes_total() {
                // Total and status land in one conditional write so no reader
                // ever observes them out of sync.
                updated.total = money::order_total(&updated.line_items);
            }

            match self.store.update_order(&updated, order.status).await {
                Ok(persisted) => {
                    tracing::info!(
                        order_id = %persisted.id,
                        from = %order.status,
                        to = %persisted.status,
                        actor = %actor.role,
                        "Order transitioned"
                    );
                    self.run_side_effects(&persisted, kind).await;
                    return Ok(persisted);
                }
                Err(StoreError::Conflict { .. }) if attempts < self.config.conflict_retry_limit => {
                    attempts += 1;
                    tracing::debug!(
                        order_id = %order_id,
                        attempt = attempts,
                        "Transition hit a concurrent write, refetching"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Fetch one order, surfacing a missing row as `NotFound`.
    pub async fn fetch(&self, order_id: &str) -> CoreResult<Order> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("order {}", order_id)))
    }

    async fn run_side_effects(&self, order: &Order, kind: TransitionKind) {
        if kind == TransitionKind::ConfirmPayment {
            // The transition has committed; a ledger failure is logged and
            // left to the idempotent projector on the next feed delivery.
            if let Err(err) = self
                .ledger
                .project_sale(order, self.config.business_date())
                .await
            {
                tracing::error!(order_id = %order.id, error = %err, "Sales projection failed");
            }
        }

        if let Some(phone) = &order.customer_phone {
            let message = match kind {
                TransitionKind::Submit => Some(notify::order_received_message(&order.id)),
                TransitionKind::MarkReady => Some(notify::order_ready_message(&order.id)),
                _ => None,
            };
            if let Some(message) = message {
                notify::dispatch(self.notifier.clone(), phone.clone(), message);
            }
        }
    }

    /// Shared load → check lock → mutate → recompute → conditional write
    /// path for line-item changes. Converts a concurrent submission into
    /// `OrderLocked` instead of a raw conflict.
    async fn mutate_line_items<F>(
        &self,
        order_id: &str,
        actor: &Actor,
        mutate: F,
    ) -> CoreResult<Order>
    where
        F: Fn(&mut Order) -> CoreResult<()>,
    {
        let mut attempts = 0u32;
        loop {
            let order = self.fetch(order_id).await?;
            if !order.status.allows_item_mutation() {
                return Err(CoreError::OrderLocked(order.status));
            }
            ensure_owner(&order, actor)?;

            let mut updated = order.clone();
            mutate(&mut updated)?;
            updated.total = money::order_total(&updated.line_items);

            match self.store.update_order(&updated, order.status).await {
                Ok(persisted) => return Ok(persisted),
                Err(StoreError::Conflict { actual, .. }) => {
                    if !actual.allows_item_mutation() {
                        return Err(CoreError::OrderLocked(actual));
                    }
                    if attempts >= self.config.conflict_retry_limit {
                        return Err(StoreError::Conflict {
                            order_id: order_id.to_string(),
                            expected: OrderStatus::Unconfirmed,
                            actual,
                        }
                        .into());
                    }
                    attempts += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Line items are mutated only by the owning creator prior to submission;
/// admin bypasses, ownerless orders accept any staff member.
fn ensure_owner(order: &Order, actor: &Actor) -> CoreResult<()> {
    if actor.role == Role::Admin {
        return Ok(());
    }
    if let Some(owner) = &order.owner_id
        && owner != &actor.id
    {
        return Err(CoreError::authorization(format!(
            "{} {} does not own order {}",
            actor.role, actor.id, order.id
        )));
    }
    Ok(())
}
