//! Paginated, selectable data table.
//!
//! A [`DataTable`] serves pages of rows either from an in-memory array
//! (local mode) or from a remote endpoint (remote mode), remembers row
//! selection across pages and exports the loaded page.
//!
//! # Example
//!
//! ```ignore
//! use inventory_lib::table::{ColumnDef, DataTable, TableConfig, UrlSource};
//!
//! let config = TableConfig::remote(
//!     vec![ColumnDef::new("name", "Name"), ColumnDef::new("quantity", "Qty")],
//!     UrlSource::new("https://inventory.example.com/api/item/page"),
//! )
//! .data_accessor_key("results.content")
//! .total_row_name("totalRows")
//! .page_size(20);
//!
//! let mut table = DataTable::mount(config).await?;
//! for row in table.rows() {
//!     println!("{:?}", row.get("name"));
//! }
//! table.goto_page(1).await;
//! ```

mod accessor;
mod config;
mod data_table;
mod page;
mod pagination;
mod policy;
mod selection;
mod sort;
mod source;

pub use accessor::AccessorPath;
pub use config::*;
pub use data_table::*;
pub use page::*;
pub use pagination::PaginationState;
pub use policy::*;
pub use selection::*;
pub use sort::*;
pub use source::*;
