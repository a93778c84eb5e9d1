//! Menu catalog item

use serde::{Deserialize, Serialize};

/// A catalog item ("platillo"), admin-managed.
///
/// `price` is mutable over time; existing line items keep the price snapshot
/// taken when they were added, so edits are never retroactive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in currency unit
    pub price: f64,
    /// Inactive items stay referenced by historical orders but cannot be added
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, description: Option<String>, price: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            price,
            active: true,
            image_url: None,
        }
    }
}
