//! Unified error taxonomy
//!
//! Every fallible core operation returns [`CoreError`]. The variants map to
//! distinct recovery policies:
//!
//! | Variant | Recovery |
//! |---------|----------|
//! | `Validation` | surface to the initiating user, never auto-retry |
//! | `InvalidTransition` | benign race; refetch current state silently |
//! | `OrderLocked` | hard error, not retried |
//! | `Authorization` | fatal for the attempted action |
//! | `Conflict` | refetch-and-retry, bounded |
//! | `NotFound` | surface to user |
//! | `Store` | infrastructure failure, logged |

use crate::models::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// Core error enumeration
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq)]
pub enum CoreError {
    /// Malformed input: missing table number, invalid phone, bad quantity
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transition attempted from a non-predecessor state
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Line-item mutation attempted after submission
    #[error("Order is locked in {0:?}; line items can only change while unconfirmed")]
    OrderLocked(OrderStatus),

    /// Role lacks permission for the attempted action, or the external store
    /// denied the write under row-level security
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Optimistic concurrency failure at the store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store boundary failure (transport, decode, capacity)
    #[error("Store error: {0}")]
    Store(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Whether a client may retry the failed operation automatically.
    ///
    /// Only optimistic-concurrency conflicts qualify; everything else is either
    /// user-correctable or a benign race that a refetch resolves.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Conflict(_))
    }

    /// Whether the error is an expected outcome of two actors racing.
    ///
    /// Clients treat these as success-in-practice: refetch and move on
    /// instead of alarming the user.
    pub fn is_benign_race(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidTransition { .. } | CoreError::Conflict(_)
        )
    }
}

/// Result alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_retryable() {
        assert!(CoreError::Conflict("status changed".into()).is_retryable());
        assert!(!CoreError::validation("bad phone").is_retryable());
    }

    #[test]
    fn invalid_transition_is_benign_race() {
        let err = CoreError::InvalidTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::Ready,
        };
        assert!(err.is_benign_race());
        assert!(!err.is_retryable());
    }
}
