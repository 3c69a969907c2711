//! Backend endpoint paths and front-end routes.
//!
//! Front-end routes are what [`RedirectLinks`](crate::table::RedirectLinks)
//! and row-click handlers navigate to.

use std::fmt::Display;

pub const LOGIN: &str = "auth/login";
pub const REGISTER: &str = "auth/register";

pub const INVENTORY_LIST: &str = "inventory/list";
pub const INVENTORY_ADD: &str = "inventory/add";
pub const INVENTORY_UPDATE: &str = "inventory/update";
pub const INVENTORY_DELETE: &str = "inventory/delete";

pub const ITEM_LIST: &str = "item/list";
pub const ITEM_ADD: &str = "item/add";
pub const ITEM_UPDATE: &str = "item/update";

/// `inventory/{id}`
pub fn inventory_details(id: impl Display) -> String {
    format!("inventory/{}", id)
}

/// `item-detail/{id}`
pub fn item_details(id: impl Display) -> String {
    format!("item-detail/{}", id)
}

/// `item/delete/{id}`
pub fn item_delete(id: impl Display) -> String {
    format!("item/delete/{}", id)
}

/// Front-end page routes.
pub mod links {
    use std::fmt::Display;

    pub const HOME: &str = "/";
    pub const REGISTER: &str = "/register";
    pub const INVENTORY_LIST: &str = "/inventory/list";

    /// `/inventory/{id}`
    pub fn inventory(id: impl Display) -> String {
        format!("/inventory/{}", id)
    }

    /// `/inventory-item/{id}`
    pub fn inventory_item(id: impl Display) -> String {
        format!("/inventory-item/{}", id)
    }

    /// `/error?code={status}`
    pub fn error(status: u16) -> String {
        format!("/error?code={}", status)
    }
}
