//! Sales ledger projector
//!
//! Snapshots an order's line items into immutable sales rows at the moment of
//! collection (the transition into `Delivered`). One row per line item,
//! at most once per order: the store's first-writer-wins append absorbs
//! change-feed redeliveries.

use crate::store::OrderStore;
use chrono::NaiveDate;
use shared::error::{CoreError, CoreResult};
use shared::models::order::Order;
use shared::models::sales_record::SalesRecord;
use std::sync::Arc;

pub struct SalesLedger<S: OrderStore + ?Sized> {
    store: Arc<S>,
}

impl<S: OrderStore + ?Sized> SalesLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Build the ledger rows for an order without writing them.
    pub fn rows_for(order: &Order, business_date: NaiveDate) -> Vec<SalesRecord> {
        order
            .line_items
            .iter()
            .map(|item| SalesRecord {
                id: uuid::Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                table_label: order.table_label(),
                item_name: item.name.clone(),
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                business_date,
            })
            .collect()
    }

    /// Project one order into the ledger.
    ///
    /// Idempotent: returns `false` when the order was already projected
    /// (redelivered event), `true` when rows were written. An order with no
    /// line items writes nothing.
    pub async fn project_sale(&self, order: &Order, business_date: NaiveDate) -> CoreResult<bool> {
        if order.line_items.is_empty() {
            tracing::warn!(order_id = %order.id, "Order delivered with no line items; nothing to project");
            return Ok(false);
        }

        let rows = Self::rows_for(order, business_date);
        let written = self
            .store
            .append_sales_records(&order.id, &rows)
            .await
            .map_err(CoreError::from)?;

        if written {
            tracing::info!(
                order_id = %order.id,
                rows = rows.len(),
                %business_date,
                "Sales recorded"
            );
        } else {
            tracing::debug!(order_id = %order.id, "Sales already projected, skipping redelivery");
        }
        Ok(written)
    }
}
