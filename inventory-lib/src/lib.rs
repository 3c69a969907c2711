//! Inventory table engine and API client library
//!
//! - [`table`]: a paginated, selectable data table over local rows or a
//!   remote JSON endpoint, with cross-page selection and stale-fetch fencing.
//! - [`export`]: Excel, CSV and PDF downloads of a table page.
//! - [`InventoryClient`]: async client for the inventory REST API
//!   (authentication, inventories, items).

pub mod api;
pub mod auth;
pub mod error;
pub mod export;
pub mod retry;
pub mod table;

mod client;
mod transport;

pub use client::*;
