//! Order aggregate and line items

use serde::{Deserialize, Serialize};

/// Order lifecycle status (forward-only, see the transition table in
/// `comanda-core::machine`).
///
/// Wire names are the legacy Spanish schema values so rows written by the
/// original mobile/web clients still decode. Variant order is the lifecycle
/// order; the derived `Ord` is what makes the monotonic feed guard possible.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub enum OrderStatus {
    /// Open order, line items still mutable
    #[default]
    #[serde(rename = "Inconclusa")]
    Unconfirmed,
    /// Sent to the kitchen
    #[serde(rename = "Enviado")]
    Submitted,
    /// Kitchen finished preparing
    #[serde(rename = "Listo")]
    Ready,
    /// Waiter requested the bill (dine-in only)
    #[serde(rename = "Pendiente de cobro")]
    PendingPayment,
    /// Cashier confirmed payment; sales ledger written
    #[serde(rename = "Entregado")]
    Delivered,
    /// Closed and archived out of active views
    #[serde(rename = "Completada")]
    Completed,
}

impl OrderStatus {
    /// Terminal state: no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Whether line items may still be mutated
    pub fn allows_item_mutation(&self) -> bool {
        matches!(self, OrderStatus::Unconfirmed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Unconfirmed => "Inconclusa",
            OrderStatus::Submitted => "Enviado",
            OrderStatus::Ready => "Listo",
            OrderStatus::PendingPayment => "Pendiente de cobro",
            OrderStatus::Delivered => "Entregado",
            OrderStatus::Completed => "Completada",
        };
        write!(f, "{}", s)
    }
}

/// Service type, immutable after creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    #[default]
    DineIn,
    Takeout,
}

/// One menu item entry within an order
///
/// `name`, `description` and `unit_price` are denormalized snapshots taken at
/// insertion time: the catalog item may be edited or deactivated later without
/// changing historical orders. `unit_price` is never mutated after insertion;
/// quantity changes do not touch it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: String,
    pub order_id: String,
    /// Weak reference to the catalog item (may be deleted independently)
    pub menu_item_id: String,
    /// Name snapshot at time of add
    pub name: String,
    /// Description snapshot at time of add
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    /// Price in currency unit, frozen at insertion
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Order aggregate root
///
/// `total` is derived and recomputed from line items on every transition into
/// `Ready` or `Delivered`; it is never authoritative on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub service_type: ServiceType,
    /// Present iff dine-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    /// Present iff takeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Present iff takeout; stored normalized (country code + 10 digits)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    /// Staff account that created the order (None for admin-created)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub status: OrderStatus,
    /// Dine-in only, informational
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Unix millis, immutable
    pub created_at: i64,
    /// Total amount in currency unit, derived from line items
    pub total: f64,
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Create a dine-in order in `Unconfirmed` with no items.
    pub fn dine_in(table_number: u32, owner_id: Option<String>, occupants: Option<u32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            service_type: ServiceType::DineIn,
            table_number: Some(table_number),
            customer_name: None,
            customer_phone: None,
            owner_id,
            status: OrderStatus::Unconfirmed,
            occupants,
            note: None,
            created_at: chrono::Utc::now().timestamp_millis(),
            total: 0.0,
            line_items: Vec::new(),
        }
    }

    /// Create a takeout order in `Unconfirmed` with no items.
    ///
    /// `customer_phone` must already be normalized (see `shared::phone`).
    pub fn takeout(customer_name: String, customer_phone: String, owner_id: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            service_type: ServiceType::Takeout,
            table_number: None,
            customer_name: Some(customer_name),
            customer_phone: Some(customer_phone),
            owner_id,
            status: OrderStatus::Unconfirmed,
            occupants: None,
            note: None,
            created_at: chrono::Utc::now().timestamp_millis(),
            total: 0.0,
            line_items: Vec::new(),
        }
    }

    /// Label used on sales records and receipts: "Mesa N" or "Para llevar".
    pub fn table_label(&self) -> String {
        match self.table_number {
            Some(n) => format!("Mesa {}", n),
            None => "Para llevar".to_string(),
        }
    }

    /// Whether the order still shows up on active boards
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering_follows_lifecycle() {
        assert!(OrderStatus::Unconfirmed < OrderStatus::Submitted);
        assert!(OrderStatus::Submitted < OrderStatus::Ready);
        assert!(OrderStatus::Ready < OrderStatus::PendingPayment);
        assert!(OrderStatus::PendingPayment < OrderStatus::Delivered);
        assert!(OrderStatus::Delivered < OrderStatus::Completed);
    }

    #[test]
    fn status_serializes_with_legacy_wire_names() {
        let json = serde_json::to_string(&OrderStatus::PendingPayment).unwrap();
        assert_eq!(json, "\"Pendiente de cobro\"");
        let back: OrderStatus = serde_json::from_str("\"Listo\"").unwrap();
        assert_eq!(back, OrderStatus::Ready);
    }

    #[test]
    fn dine_in_order_has_table_and_no_phone() {
        let order = Order::dine_in(4, Some("waiter-1".into()), Some(2));
        assert_eq!(order.service_type, ServiceType::DineIn);
        assert_eq!(order.table_number, Some(4));
        assert!(order.customer_phone.is_none());
        assert_eq!(order.status, OrderStatus::Unconfirmed);
        assert_eq!(order.table_label(), "Mesa 4");
    }

    #[test]
    fn takeout_order_label() {
        let order = Order::takeout("Ana".into(), "526531234567".into(), None);
        assert_eq!(order.table_label(), "Para llevar");
        assert!(order.table_number.is_none());
    }
}
