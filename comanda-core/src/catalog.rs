//! Menu catalog management
//!
//! Admin-managed catalog of menu items. Items are retired by deactivation
//! rather than deletion so historical line items keep a valid reference, and
//! price edits only affect items added afterwards (line items snapshot the
//! price at add time).

use crate::store::OrderStore;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text};
use shared::error::{CoreError, CoreResult};
use shared::models::menu_item::MenuItem;
use shared::models::role::Actor;
use std::sync::Arc;

/// Fields an admin may change on an existing item. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub image_url: Option<Option<String>>,
}

pub struct CatalogService<S: OrderStore + ?Sized> {
    store: Arc<S>,
}

impl<S: OrderStore + ?Sized> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn create_item(
        &self,
        name: String,
        description: Option<String>,
        price: f64,
        actor: &Actor,
    ) -> CoreResult<MenuItem> {
        ensure_admin(actor)?;
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
        validate_price(price, "price")?;

        let item = MenuItem::new(name, description, price);
        self.store.insert_menu_item(&item).await?;
        tracing::info!(menu_item_id = %item.id, name = %item.name, price = item.price, "Menu item created");
        Ok(item)
    }

    pub async fn update_item(
        &self,
        menu_item_id: &str,
        update: MenuItemUpdate,
        actor: &Actor,
    ) -> CoreResult<MenuItem> {
        ensure_admin(actor)?;
        let mut item = self.fetch(menu_item_id).await?;

        if let Some(name) = update.name {
            validate_required_text(&name, "name", MAX_NAME_LEN)?;
            item.name = name;
        }
        if let Some(description) = update.description {
            validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
            item.description = description;
        }
        if let Some(price) = update.price {
            validate_price(price, "price")?;
            item.price = price;
        }
        if let Some(image_url) = update.image_url {
            item.image_url = image_url;
        }

        self.store.update_menu_item(&item).await?;
        tracing::info!(menu_item_id = %item.id, "Menu item updated");
        Ok(item)
    }

    /// Toggle availability. Deactivated items vanish from ordering surfaces
    /// but remain resolvable for historical rows.
    pub async fn set_active(
        &self,
        menu_item_id: &str,
        active: bool,
        actor: &Actor,
    ) -> CoreResult<MenuItem> {
        ensure_admin(actor)?;
        let mut item = self.fetch(menu_item_id).await?;
        item.active = active;
        self.store.update_menu_item(&item).await?;
        tracing::info!(menu_item_id = %item.id, active, "Menu item availability changed");
        Ok(item)
    }

    /// Items offered for ordering right now. Open to every role.
    pub async fn available_items(&self) -> CoreResult<Vec<MenuItem>> {
        Ok(self.store.list_menu_items(true).await?)
    }

    /// Full catalog, retired items included. Admin management view.
    pub async fn all_items(&self, actor: &Actor) -> CoreResult<Vec<MenuItem>> {
        ensure_admin(actor)?;
        Ok(self.store.list_menu_items(false).await?)
    }

    async fn fetch(&self, menu_item_id: &str) -> CoreResult<MenuItem> {
        self.store
            .get_menu_item(menu_item_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("menu item {}", menu_item_id)))
    }
}

fn ensure_admin(actor: &Actor) -> CoreResult<()> {
    if !actor.role.can_manage_catalog() {
        return Err(CoreError::authorization(format!(
            "{} cannot manage the catalog",
            actor.role
        )));
    }
    Ok(())
}
