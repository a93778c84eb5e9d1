//! Daily sales report
//!
//! Read-side aggregation over the sales ledger for one business date: gross
//! total, collected-order count, average ticket and a per-item breakdown.
//! Derived entirely from immutable `SalesRecord` rows, so later edits to the
//! catalog or to archived orders can never change a past day's numbers.

use crate::money;
use crate::store::OrderStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::CoreResult;
use shared::models::sales_record::SalesRecord;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Aggregated sales for one menu item over one business date
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemBreakdown {
    pub item_name: String,
    pub quantity: u32,
    pub revenue: f64,
}

/// One business day's figures
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub business_date: NaiveDate,
    /// Sum over every ledger row of quantity × unit price
    pub gross_total: f64,
    /// Distinct collected orders
    pub order_count: usize,
    /// Gross total divided by order count; zero on an empty day
    pub average_ticket: f64,
    /// Per-item totals, alphabetical by item name
    pub items: Vec<ItemBreakdown>,
}

pub struct ReportService<S: OrderStore + ?Sized> {
    store: Arc<S>,
}

impl<S: OrderStore + ?Sized> ReportService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn daily_summary(&self, business_date: NaiveDate) -> CoreResult<DailySummary> {
        let rows = self.store.sales_by_date(business_date).await?;
        Ok(summarize(business_date, &rows))
    }
}

/// Fold ledger rows into the day's summary. Pure so it is testable without
/// a store.
pub fn summarize(business_date: NaiveDate, rows: &[SalesRecord]) -> DailySummary {
    let mut gross = Decimal::ZERO;
    let mut orders: HashSet<&str> = HashSet::new();
    let mut per_item: BTreeMap<&str, (u32, Decimal)> = BTreeMap::new();

    for row in rows {
        let subtotal = money::to_decimal(row.unit_price) * Decimal::from(row.quantity);
        gross += subtotal;
        orders.insert(row.order_id.as_str());
        let entry = per_item.entry(row.item_name.as_str()).or_default();
        entry.0 += row.quantity;
        entry.1 += subtotal;
    }

    let order_count = orders.len();
    let average_ticket = if order_count == 0 {
        0.0
    } else {
        money::to_f64(gross / Decimal::from(order_count as u64))
    };

    DailySummary {
        business_date,
        gross_total: money::to_f64(gross),
        order_count,
        average_ticket,
        items: per_item
            .into_iter()
            .map(|(name, (quantity, revenue))| ItemBreakdown {
                item_name: name.to_string(),
                quantity,
                revenue: money::to_f64(revenue),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_id: &str, item: &str, quantity: u32, unit_price: f64) -> SalesRecord {
        SalesRecord {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order_id.into(),
            table_label: "Mesa 1".into(),
            item_name: item.into(),
            description: None,
            quantity,
            unit_price,
            business_date: date(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
    }

    #[test]
    fn empty_day_summarizes_to_zero() {
        let summary = summarize(date(), &[]);
        assert_eq!(summary.gross_total, 0.0);
        assert_eq!(summary.order_count, 0);
        assert_eq!(summary.average_ticket, 0.0);
        assert!(summary.items.is_empty());
    }

    #[test]
    fn summary_counts_distinct_orders_and_groups_items() {
        let rows = vec![
            row("o1", "Enchiladas", 2, 50.0),
            row("o1", "Agua de horchata", 1, 30.0),
            row("o2", "Enchiladas", 1, 50.0),
        ];
        let summary = summarize(date(), &rows);

        assert_eq!(summary.gross_total, 180.0);
        assert_eq!(summary.order_count, 2);
        assert_eq!(summary.average_ticket, 90.0);
        assert_eq!(
            summary.items,
            vec![
                ItemBreakdown {
                    item_name: "Agua de horchata".into(),
                    quantity: 1,
                    revenue: 30.0,
                },
                ItemBreakdown {
                    item_name: "Enchiladas".into(),
                    quantity: 3,
                    revenue: 150.0,
                },
            ]
        );
    }

    #[test]
    fn average_ticket_rounds_to_cents() {
        let rows = vec![row("o1", "Tacos", 1, 50.0), row("o2", "Tacos", 1, 50.0), row("o3", "Tacos", 1, 0.01)];
        let summary = summarize(date(), &rows);
        assert_eq!(summary.average_ticket, 33.34);
    }

    #[test]
    fn summary_serializes_for_the_admin_dashboard() {
        let summary = summarize(date(), &[row("o1", "Tacos", 2, 45.0)]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["business_date"], "2026-08-31");
        assert_eq!(json["gross_total"], 90.0);
        assert_eq!(json["items"][0]["item_name"], "Tacos");
    }

    #[tokio::test]
    async fn service_reads_only_the_requested_date() {
        use crate::store::{MemoryStore, OrderStore};
        let store = Arc::new(MemoryStore::new());
        store
            .append_sales_records("o1", &[row("o1", "Tacos", 2, 45.0)])
            .await
            .unwrap();
        let mut other_day = row("o2", "Tacos", 1, 45.0);
        other_day.business_date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        store
            .append_sales_records("o2", &[other_day])
            .await
            .unwrap();

        let report = ReportService::new(store);
        let summary = report.daily_summary(date()).await.unwrap();
        assert_eq!(summary.gross_total, 90.0);
        assert_eq!(summary.order_count, 1);
    }
}
