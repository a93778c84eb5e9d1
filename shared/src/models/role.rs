//! Actor roles
//!
//! Identity and role claims are resolved by the external auth boundary; the
//! core only authorizes transitions against the supplied role.

use serde::{Deserialize, Serialize};

/// Staff role claim attached to every mutating call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Waiter,
    Kitchen,
    Cashier,
    Admin,
}

impl Role {
    /// Whether this role may manage the menu catalog
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Admin acts as a superset of every role for order operations.
    pub fn acts_as(&self, required: Role) -> bool {
        *self == required || matches!(self, Role::Admin)
    }
}

/// Caller identity resolved by the external auth boundary.
///
/// The core never authenticates; it only authorizes transitions against the
/// role claim carried here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Waiter => "waiter",
            Role::Kitchen => "kitchen",
            Role::Cashier => "cashier",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}
