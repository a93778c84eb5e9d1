//! Shared board projection
//!
//! The set of orders a role currently sees. Written by one feed consumer,
//! read by the client's render loop; the handle is cheap to clone.

use parking_lot::RwLock;
use shared::models::order::Order;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct BoardView {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current board contents in creation order
    pub fn snapshot(&self) -> Vec<Order> {
        let mut rows: Vec<Order> = self.orders.read().values().cloned().collect();
        rows.sort_by_key(|o| o.created_at);
        rows
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders.read().get(order_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    pub(crate) fn upsert(&self, order: Order) {
        self.orders.write().insert(order.id.clone(), order);
    }

    pub(crate) fn remove(&self, order_id: &str) {
        self.orders.write().remove(order_id);
    }

    pub(crate) fn replace_all(&self, rows: Vec<Order>) {
        let mut orders = self.orders.write();
        orders.clear();
        orders.extend(rows.into_iter().map(|o| (o.id.clone(), o)));
    }
}

impl std::fmt::Debug for BoardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardView")
            .field("orders", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_in_creation_order() {
        let view = BoardView::new();
        let mut first = Order::dine_in(1, None, None);
        first.created_at = 100;
        let mut second = Order::dine_in(2, None, None);
        second.created_at = 50;

        view.upsert(first.clone());
        view.upsert(second.clone());

        let snapshot = view.snapshot();
        assert_eq!(snapshot[0].id, second.id);
        assert_eq!(snapshot[1].id, first.id);
    }

    #[test]
    fn replace_all_drops_absent_rows() {
        let view = BoardView::new();
        let stale = Order::dine_in(1, None, None);
        let kept = Order::dine_in(2, None, None);
        view.upsert(stale.clone());

        view.replace_all(vec![kept.clone()]);
        assert!(view.get(&stale.id).is_none());
        assert!(view.get(&kept.id).is_some());
    }
}
