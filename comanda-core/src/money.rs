//! Money arithmetic
//!
//! Model fields stay `f64` for wire compatibility; every computation goes
//! through `rust_decimal` so totals never accumulate float error.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use shared::models::order::LineItem;

/// Convert an f64 currency amount to Decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0)
}

/// Subtotal of one line item: quantity × unit price
pub fn line_subtotal(item: &LineItem) -> f64 {
    to_f64(to_decimal(item.unit_price) * Decimal::from(item.quantity))
}

/// Order total recomputed from line items.
///
/// This is the only authoritative total: the persisted `Order::total` is a
/// cache refreshed from this on every Ready/Delivered transition.
pub fn order_total(items: &[LineItem]) -> f64 {
    let sum = items
        .iter()
        .fold(Decimal::ZERO, |acc, item| {
            acc + to_decimal(item.unit_price) * Decimal::from(item.quantity)
        });
    to_f64(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, unit_price: f64) -> LineItem {
        LineItem {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: "order-1".to_string(),
            menu_item_id: "menu-1".to_string(),
            name: "Test".to_string(),
            description: None,
            quantity,
            unit_price,
            note: None,
        }
    }

    #[test]
    fn total_sums_line_subtotals() {
        let items = vec![item(2, 50.0), item(1, 30.0)];
        assert_eq!(order_total(&items), 130.0);
    }

    #[test]
    fn total_avoids_float_accumulation() {
        // 0.1 * 3 would drift with naive f64 accumulation
        let items = vec![item(3, 0.1), item(3, 0.2)];
        assert_eq!(order_total(&items), 0.9);
    }

    #[test]
    fn subtotal_rounds_to_cents() {
        assert_eq!(line_subtotal(&item(3, 33.335)), 100.01);
    }

    #[test]
    fn empty_order_totals_zero() {
        assert_eq!(order_total(&[]), 0.0);
    }
}
