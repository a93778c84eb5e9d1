//! Daily sales ledger row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One append-only sales row ("venta diaria"), produced by the ledger
/// projector when a cashier confirms payment.
///
/// Immutable once written: exactly one record per (order_id, line item).
/// Queryable by `business_date` for the reporting export boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    pub id: String,
    pub order_id: String,
    /// "Mesa N" or "Para llevar"
    pub table_label: String,
    /// Item name snapshot
    pub item_name: String,
    /// Item description snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    /// Unit price in currency unit, frozen from the line item
    pub unit_price: f64,
    pub business_date: NaiveDate,
}

impl SalesRecord {
    /// Line subtotal in currency unit
    pub fn subtotal(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}
