//! Inventory REST API operations

mod auth;
mod envelope;
mod inventory;
mod item;
pub mod routes;

pub use auth::*;
pub use envelope::*;
pub use inventory::*;
pub use item::*;
