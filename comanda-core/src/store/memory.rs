//! In-memory reference store
//!
//! Implements the full store contract — per-row CAS semantics and a broadcast
//! change feed — against process memory. Used by tests and single-node runs;
//! the managed-database adapter implements the same traits in production.

use super::{ChangeFeed, OrderFilter, OrderStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::RwLock;
use shared::feed::FeedEvent;
use shared::models::menu_item::MenuItem;
use shared::models::order::{Order, OrderStatus};
use shared::models::sales_record::SalesRecord;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Default change-feed channel capacity
const FEED_CAPACITY: usize = 1024;

pub struct MemoryStore {
    orders: RwLock<HashMap<String, Order>>,
    menu: RwLock<HashMap<String, MenuItem>>,
    sales: RwLock<Vec<SalesRecord>>,
    /// First-writer-wins guard for ledger projection (order_id -> ())
    projected: DashMap<String, ()>,
    feed_tx: broadcast::Sender<FeedEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_feed_capacity(FEED_CAPACITY)
    }

    pub fn with_feed_capacity(capacity: usize) -> Self {
        let (feed_tx, _) = broadcast::channel(capacity);
        Self {
            orders: RwLock::new(HashMap::new()),
            menu: RwLock::new(HashMap::new()),
            sales: RwLock::new(Vec::new()),
            projected: DashMap::new(),
            feed_tx,
        }
    }

    fn publish(&self, event: FeedEvent) {
        // No subscribers is fine; boards may not be open
        let _ = self.feed_tx.send(event);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("orders", &self.orders.read().len())
            .field("menu_items", &self.menu.read().len())
            .field("sales_records", &self.sales.read().len())
            .finish()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut orders = self.orders.write();
        if orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate(format!("order {}", order.id)));
        }
        orders.insert(order.id.clone(), order.clone());
        drop(orders);
        self.publish(FeedEvent::insert(order.clone()));
        Ok(())
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        Ok(self.orders.read().get(order_id).cloned())
    }

    async fn update_order(
        &self,
        order: &Order,
        expected_status: OrderStatus,
    ) -> StoreResult<Order> {
        let mut orders = self.orders.write();
        let current = orders
            .get(&order.id)
            .ok_or_else(|| StoreError::NotFound(format!("order {}", order.id)))?;

        // The compare-and-set the whole synchronization model hangs on:
        // commit only from the expected predecessor status.
        if current.status != expected_status {
            return Err(StoreError::Conflict {
                order_id: order.id.clone(),
                expected: expected_status,
                actual: current.status,
            });
        }

        orders.insert(order.id.clone(), order.clone());
        drop(orders);
        self.publish(FeedEvent::update(order.clone()));
        Ok(order.clone())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let mut rows: Vec<Order> = self
            .orders
            .read()
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.created_at);
        Ok(rows)
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        let mut menu = self.menu.write();
        if menu.contains_key(&item.id) {
            return Err(StoreError::Duplicate(format!("menu item {}", item.id)));
        }
        menu.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get_menu_item(&self, menu_item_id: &str) -> StoreResult<Option<MenuItem>> {
        Ok(self.menu.read().get(menu_item_id).cloned())
    }

    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<()> {
        let mut menu = self.menu.write();
        if !menu.contains_key(&item.id) {
            return Err(StoreError::NotFound(format!("menu item {}", item.id)));
        }
        menu.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn list_menu_items(&self, only_active: bool) -> StoreResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .menu
            .read()
            .values()
            .filter(|m| !only_active || m.active)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn append_sales_records(
        &self,
        order_id: &str,
        records: &[SalesRecord],
    ) -> StoreResult<bool> {
        // DashMap insert is atomic: exactly one writer claims the order_id.
        if self.projected.insert(order_id.to_string(), ()).is_some() {
            return Ok(false);
        }
        self.sales.write().extend_from_slice(records);
        Ok(true)
    }

    async fn sales_by_date(&self, date: NaiveDate) -> StoreResult<Vec<SalesRecord>> {
        Ok(self
            .sales
            .read()
            .iter()
            .filter(|r| r.business_date == date)
            .cloned()
            .collect())
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.feed_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::feed::ChangeKind;

    fn dine_in() -> Order {
        Order::dine_in(3, Some("w1".into()), None)
    }

    #[tokio::test]
    async fn cas_update_rejects_wrong_expected_status() {
        let store = MemoryStore::new();
        let order = dine_in();
        store.insert_order(&order).await.unwrap();

        let mut moved = order.clone();
        moved.status = OrderStatus::Submitted;
        store
            .update_order(&moved, OrderStatus::Unconfirmed)
            .await
            .unwrap();

        // Second writer still expecting Unconfirmed loses the race
        let err = store
            .update_order(&moved, OrderStatus::Unconfirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let order = dine_in();
        store.insert_order(&order).await.unwrap();
        assert!(matches!(
            store.insert_order(&order).await.unwrap_err(),
            StoreError::Duplicate(_)
        ));
    }

    #[tokio::test]
    async fn feed_publishes_insert_and_update() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe();

        let order = dine_in();
        store.insert_order(&order).await.unwrap();

        let mut moved = order.clone();
        moved.status = OrderStatus::Submitted;
        store
            .update_order(&moved, OrderStatus::Unconfirmed)
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ChangeKind::Insert);
        assert_eq!(first.order_id, order.id);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, ChangeKind::Update);
        assert_eq!(second.order.status, OrderStatus::Submitted);
    }

    #[tokio::test]
    async fn sales_append_is_first_writer_wins() {
        let store = MemoryStore::new();
        let record = SalesRecord {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: "o1".into(),
            table_label: "Mesa 3".into(),
            item_name: "Tacos".into(),
            description: None,
            quantity: 2,
            unit_price: 50.0,
            business_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
        };

        assert!(
            store
                .append_sales_records("o1", std::slice::from_ref(&record))
                .await
                .unwrap()
        );
        // Redelivery: no second write
        assert!(
            !store
                .append_sales_records("o1", std::slice::from_ref(&record))
                .await
                .unwrap()
        );

        let rows = store
            .sales_by_date(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn list_orders_applies_filter_and_creation_order() {
        let store = MemoryStore::new();
        let a = dine_in();
        let mut b = Order::dine_in(5, Some("w2".into()), None);
        b.status = OrderStatus::Completed;
        store.insert_order(&a).await.unwrap();
        store.insert_order(&b).await.unwrap();

        let active = store.list_orders(&OrderFilter::active()).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);

        let all = store.list_orders(&OrderFilter::all()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
