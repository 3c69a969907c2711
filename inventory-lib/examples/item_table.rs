//! Logs in, pages through the items of an inventory and exports a page.
//!
//! Run with: cargo run --example item_table
//!
//! Requires .env file with:
//! - INVENTORY_API_URL
//! - INVENTORY_EMAIL
//! - INVENTORY_PASSWORD
//! - INVENTORY_ID

use std::env;

use inventory_lib::InventoryClient;
use inventory_lib::api::Credentials;
use inventory_lib::export::ExportFormat;
use inventory_lib::export::PrintOptions;
use inventory_lib::table::ColumnDef;
use inventory_lib::table::DataTable;
use inventory_lib::table::HttpMethod;
use inventory_lib::table::TableConfig;
use inventory_lib::table::UrlSource;
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let api_url = env::var("INVENTORY_API_URL").expect("INVENTORY_API_URL not set");
    let email = env::var("INVENTORY_EMAIL").expect("INVENTORY_EMAIL not set");
    let password = env::var("INVENTORY_PASSWORD").expect("INVENTORY_PASSWORD not set");
    let inventory_id: i64 = env::var("INVENTORY_ID").expect("INVENTORY_ID not set").parse()?;

    let client = InventoryClient::builder().url(&api_url).build()?;
    let login = client.login(&Credentials::new(email, password)).await?;
    println!("Logged in as user {}", login.user.id);

    let config = TableConfig::remote(
        vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("quantity", "Quantity"),
            ColumnDef::new("description", "Description"),
        ],
        UrlSource::new(client.endpoint("item/list")).bearer(&login.token),
    )
    .method(HttpMethod::Post)
    .body(json!({ "userId": login.user.id, "inventoryId": inventory_id }))
    .page_size(5)
    .enable_row_selection(true)
    .print_options(PrintOptions::default().enable_csv(true).file_name("items"));

    let mut table = DataTable::mount(config)
        .await?
        .on_loading(|loading| println!("loading: {}", loading));

    println!("{} items over {} pages", table.total_count(), table.page_count());
    for page in 0..table.page_count() {
        table.goto_page(page).await;
        for row in table.rows() {
            println!("  {}", serde_json::Value::Object(row.clone()));
        }
        table.toggle_row(0);
    }

    println!("Selected {} rows", table.selected_rows().len());

    table.goto_page(0).await;
    let path = table.export(ExportFormat::Csv, env::temp_dir())?;
    println!("Exported first page to {}", path.display());

    Ok(())
}
