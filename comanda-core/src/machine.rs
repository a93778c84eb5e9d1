//! Order lifecycle state machine
//!
//! Forward-only, no cycles:
//!
//! ```text
//! Unconfirmed --(submit, waiter)----------> Submitted
//! Submitted   --(mark_ready, kitchen)-----> Ready
//! Ready       --(request_payment, waiter)-> PendingPayment   [dine-in only]
//! PendingPayment --(confirm_payment, cashier)--> Delivered
//! Ready       --(confirm_payment, cashier)-----> Delivered   [takeout skips PendingPayment]
//! Delivered   --(close, waiter)-----------> Completed
//! ```
//!
//! A transition attempted from a non-predecessor state fails with
//! `InvalidTransition` and leaves the order untouched. Because the store-level
//! update is additionally conditioned on the expected predecessor, retrying an
//! already-applied transition fails harmlessly as `InvalidTransition`, which
//! makes every transition idempotent in practice.

use shared::error::{CoreError, CoreResult};
use shared::models::order::{Order, OrderStatus, ServiceType};
use shared::models::role::{Actor, Role};

/// The five legal transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Waiter sends the order to the kitchen
    Submit,
    /// Kitchen finished preparing
    MarkReady,
    /// Waiter asks the cashier for the bill (dine-in only)
    RequestPayment,
    /// Cashier collects; triggers the sales ledger projection
    ConfirmPayment,
    /// Waiter archives a delivered order
    Close,
}

impl TransitionKind {
    /// Resolve the transition that produces `target`.
    ///
    /// `current` is only used to build the error for unreachable targets.
    pub fn for_target(
        target: OrderStatus,
        current: OrderStatus,
        service_type: ServiceType,
    ) -> CoreResult<Self> {
        match target {
            OrderStatus::Submitted => Ok(TransitionKind::Submit),
            OrderStatus::Ready => Ok(TransitionKind::MarkReady),
            OrderStatus::PendingPayment => match service_type {
                ServiceType::DineIn => Ok(TransitionKind::RequestPayment),
                // Takeout goes straight from Ready to Delivered
                ServiceType::Takeout => Err(CoreError::InvalidTransition {
                    from: current,
                    to: target,
                }),
            },
            OrderStatus::Delivered => Ok(TransitionKind::ConfirmPayment),
            OrderStatus::Completed => Ok(TransitionKind::Close),
            // Nothing transitions back into Unconfirmed
            OrderStatus::Unconfirmed => Err(CoreError::InvalidTransition {
                from: current,
                to: target,
            }),
        }
    }

    /// Role allowed to trigger this transition (admin acts as any role)
    pub fn required_role(&self) -> Role {
        match self {
            TransitionKind::Submit => Role::Waiter,
            TransitionKind::MarkReady => Role::Kitchen,
            TransitionKind::RequestPayment => Role::Waiter,
            TransitionKind::ConfirmPayment => Role::Cashier,
            TransitionKind::Close => Role::Waiter,
        }
    }

    /// The only status this transition may start from
    pub fn predecessor(&self, service_type: ServiceType) -> OrderStatus {
        match self {
            TransitionKind::Submit => OrderStatus::Unconfirmed,
            TransitionKind::MarkReady => OrderStatus::Submitted,
            TransitionKind::RequestPayment => OrderStatus::Ready,
            TransitionKind::ConfirmPayment => match service_type {
                ServiceType::DineIn => OrderStatus::PendingPayment,
                ServiceType::Takeout => OrderStatus::Ready,
            },
            TransitionKind::Close => OrderStatus::Delivered,
        }
    }

    /// The status this transition produces
    pub fn target(&self) -> OrderStatus {
        match self {
            TransitionKind::Submit => OrderStatus::Submitted,
            TransitionKind::MarkReady => OrderStatus::Ready,
            TransitionKind::RequestPayment => OrderStatus::PendingPayment,
            TransitionKind::ConfirmPayment => OrderStatus::Delivered,
            TransitionKind::Close => OrderStatus::Completed,
        }
    }

    /// Transitions into Ready or Delivered recompute and persist the total
    /// atomically with the status change.
    pub fn recomputes_total(&self) -> bool {
        matches!(self, TransitionKind::MarkReady | TransitionKind::ConfirmPayment)
    }
}

/// Validate a requested transition against role, ownership and predecessor.
///
/// Returns the resolved [`TransitionKind`] without mutating anything; the
/// caller persists the status change with a conditional store update.
pub fn validate(order: &Order, target: OrderStatus, actor: &Actor) -> CoreResult<TransitionKind> {
    let kind = TransitionKind::for_target(target, order.status, order.service_type)?;

    let required = kind.required_role();
    if !actor.role.acts_as(required) {
        return Err(CoreError::authorization(format!(
            "{} cannot {:?} order {} (requires {})",
            actor.role, kind, order.id, required
        )));
    }

    // Waiter-triggered transitions are restricted to the order's creator;
    // admin bypasses, and ownerless (admin-created) orders accept any waiter.
    if required == Role::Waiter
        && actor.role == Role::Waiter
        && let Some(owner) = &order.owner_id
        && owner != &actor.id
    {
        return Err(CoreError::authorization(format!(
            "waiter {} does not own order {}",
            actor.id, order.id
        )));
    }

    if order.status != kind.predecessor(order.service_type) {
        return Err(CoreError::InvalidTransition {
            from: order.status,
            to: target,
        });
    }

    Ok(kind)
}
