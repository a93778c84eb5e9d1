//! Optimistic transition overlay
//!
//! After a client issues a transition it renders the target status
//! immediately instead of waiting for the feed round trip. The overlay
//! remembers that expectation per order and clears it once the observed
//! status catches up. A mark that is never confirmed within the TTL is
//! dropped so a failed write cannot pin a phantom status on screen.

use parking_lot::Mutex;
use shared::models::order::{Order, OrderStatus};
use std::collections::HashMap;
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
struct PendingMark {
    expected: OrderStatus,
    marked_at: Instant,
}

#[derive(Debug)]
pub struct PendingOverlay {
    marks: Mutex<HashMap<String, PendingMark>>,
    ttl: Duration,
}

impl Default for PendingOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl PendingOverlay {
    pub fn new(ttl: Duration) -> Self {
        Self {
            marks: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Record that this client just asked to move `order_id` to `expected`.
    pub fn mark(&self, order_id: &str, expected: OrderStatus) {
        self.marks.lock().insert(
            order_id.to_string(),
            PendingMark {
                expected,
                marked_at: Instant::now(),
            },
        );
    }

    /// Feed confirmation hook. Clears the mark once the observed status has
    /// reached (or passed) the expectation; returns whether it cleared.
    pub fn reconcile(&self, order_id: &str, observed: OrderStatus) -> bool {
        let mut marks = self.marks.lock();
        if let Some(mark) = marks.get(order_id)
            && observed >= mark.expected
        {
            marks.remove(order_id);
            return true;
        }
        false
    }

    pub fn is_pending(&self, order_id: &str) -> bool {
        self.marks.lock().contains_key(order_id)
    }

    /// Status to render: the pending expectation when it is ahead of the
    /// stored row, the stored row otherwise.
    pub fn display_status(&self, order: &Order) -> OrderStatus {
        match self.marks.lock().get(&order.id) {
            Some(mark) if mark.expected > order.status => mark.expected,
            _ => order.status,
        }
    }

    /// Drop marks older than the TTL. Returns the affected order ids so the
    /// caller can force a re-render from stored state.
    pub fn sweep_stale(&self) -> Vec<String> {
        let mut marks = self.marks.lock();
        let now = Instant::now();
        let stale: Vec<String> = marks
            .iter()
            .filter(|(_, mark)| now.duration_since(mark.marked_at) > self.ttl)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            marks.remove(id);
            tracing::warn!(order_id = %id, "Unconfirmed optimistic transition expired");
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_shows_expectation_until_confirmed() {
        let overlay = PendingOverlay::default();
        let mut order = Order::dine_in(4, None, None);
        order.status = OrderStatus::Submitted;

        overlay.mark(&order.id, OrderStatus::Ready);
        assert_eq!(overlay.display_status(&order), OrderStatus::Ready);

        // Feed confirms the write
        assert!(overlay.reconcile(&order.id, OrderStatus::Ready));
        assert_eq!(overlay.display_status(&order), OrderStatus::Submitted);
        assert!(!overlay.is_pending(&order.id));
    }

    #[test]
    fn earlier_status_does_not_clear_mark() {
        let overlay = PendingOverlay::default();
        let order = Order::dine_in(4, None, None);

        overlay.mark(&order.id, OrderStatus::Ready);
        assert!(!overlay.reconcile(&order.id, OrderStatus::Submitted));
        assert!(overlay.is_pending(&order.id));
    }

    #[test]
    fn later_status_clears_mark_too() {
        // A concurrent actor may have pushed the order past the expectation
        let overlay = PendingOverlay::default();
        let order = Order::dine_in(4, None, None);

        overlay.mark(&order.id, OrderStatus::Ready);
        assert!(overlay.reconcile(&order.id, OrderStatus::Delivered));
    }

    #[test]
    fn stale_marks_are_swept() {
        let overlay = PendingOverlay::new(Duration::from_millis(0));
        let order = Order::dine_in(4, None, None);

        overlay.mark(&order.id, OrderStatus::Ready);
        std::thread::sleep(Duration::from_millis(5));

        let swept = overlay.sweep_stale();
        assert_eq!(swept, vec![order.id.clone()]);
        assert!(!overlay.is_pending(&order.id));
    }

    #[test]
    fn overlay_never_renders_backwards() {
        let overlay = PendingOverlay::default();
        let mut order = Order::dine_in(4, None, None);
        order.status = OrderStatus::Delivered;

        // A stale mark below the stored status is ignored for display
        overlay.mark(&order.id, OrderStatus::Ready);
        assert_eq!(overlay.display_status(&order), OrderStatus::Delivered);
    }
}
