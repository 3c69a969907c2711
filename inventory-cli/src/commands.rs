//! Subcommand handlers.

use std::error::Error;
use std::fs;

use inventory_lib::InventoryClient;
use inventory_lib::api::Credentials;
use inventory_lib::api::InventoryInput;
use inventory_lib::api::InventoryItemInput;
use inventory_lib::api::ItemImage;
use inventory_lib::auth::StaticTokenProvider;
use inventory_lib::export::cell_text;
use inventory_lib::table::DataTable;
use inventory_lib::table::PaginationState;
use inventory_lib::table::SortState;
use inventory_lib::table::TableConfig;
use log::info;
use serde::Serialize;

use crate::args::Cli;
use crate::args::Command;
use crate::args::InventoryCommand;
use crate::args::ItemCommand;
use crate::args::ItemFields;
use crate::args::PageArgs;
use crate::args::TableCommand;

type CliResult = Result<(), Box<dyn Error>>;

pub async fn run(cli: Cli) -> CliResult {
    match cli.command {
        Command::Table(command) => table(command, cli.token.as_deref()).await,
        Command::Login { email, password } => {
            let login = client(cli.api_url, None)?
                .login(&Credentials::new(email, password))
                .await?;
            info!("logged in as user {}", login.user.id);
            println!("{}", login.token);
            Ok(())
        }
        Command::Register { email, password } => {
            let status = client(cli.api_url, None)?
                .register(&Credentials::new(email, password))
                .await?;
            println!("{}", status.message);
            Ok(())
        }
        Command::Inventory(command) => inventory(&client(cli.api_url, cli.token)?, command).await,
        Command::Item(command) => item(&client(cli.api_url, cli.token)?, command).await,
    }
}

fn client(api_url: Option<String>, token: Option<String>) -> Result<InventoryClient, Box<dyn Error>> {
    let url = api_url.ok_or("no API url: pass --api-url or set INVENTORY_API_URL")?;
    let mut builder = InventoryClient::builder().url(url);
    if let Some(token) = token {
        builder = builder.token_provider(StaticTokenProvider::new(token));
    }
    Ok(builder.build()?)
}

fn print_json(value: &impl Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn inventory(client: &InventoryClient, command: InventoryCommand) -> CliResult {
    match command {
        InventoryCommand::List { user_id } => print_json(&client.list_inventories(user_id).await?),
        InventoryCommand::Get { id } => print_json(&client.get_inventory(id).await?),
        InventoryCommand::Create {
            user_id,
            name,
            description,
        } => {
            let mut input = InventoryInput::new(name).user_id(user_id);
            input.description = description;
            println!("{}", client.create_inventory(&input).await?.message);
            Ok(())
        }
        InventoryCommand::Update { id, name, description } => {
            let mut input = InventoryInput::new(name).id(id);
            input.description = description;
            println!("{}", client.update_inventory(&input).await?.message);
            Ok(())
        }
        InventoryCommand::Delete { id } => {
            println!("{}", client.delete_inventory(id).await?.message);
            Ok(())
        }
    }
}

fn item_input(fields: ItemFields) -> Result<InventoryItemInput, Box<dyn Error>> {
    let mut input = InventoryItemInput::new(fields.inventory_id, fields.name, fields.quantity);
    input.description = fields.description;
    if let Some(path) = fields.image {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        input.image = Some(ItemImage::File {
            file_name,
            bytes: fs::read(&path)?,
        });
    } else if let Some(url) = fields.image_url {
        input.image = Some(ItemImage::Url(url));
    }
    Ok(input)
}

async fn item(client: &InventoryClient, command: ItemCommand) -> CliResult {
    match command {
        ItemCommand::List { user_id, inventory_id } => print_json(&client.list_items(user_id, inventory_id).await?),
        ItemCommand::Get { id, user_id } => print_json(&client.get_item(id, user_id).await?),
        ItemCommand::Create(fields) => {
            println!("{}", client.create_item(&item_input(fields)?).await?.message);
            Ok(())
        }
        ItemCommand::Update { id, fields } => {
            let input = item_input(fields)?.id(id);
            println!("{}", client.update_item(&input).await?.message);
            Ok(())
        }
        ItemCommand::Delete { id } => {
            println!("{}", client.delete_item(id).await?.message);
            Ok(())
        }
    }
}

/// Loads the definition and the requested page.
async fn load_page(args: &PageArgs, token: Option<&str>) -> Result<DataTable, Box<dyn Error>> {
    let mut config = TableConfig::from_json(&fs::read_to_string(&args.definition)?)?;
    if let Some(size) = args.page_size {
        config = config.page_size(size);
    }
    if let (Some(source), Some(token)) = (config.url.as_mut(), token) {
        let has_auth = source
            .headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("authorization"));
        if !has_auth {
            source
                .headers
                .insert("Authorization".to_string(), format!("Bearer {}", token));
        }
    }

    let mut table = DataTable::new(config)?;
    if let Some(key) = &args.sort {
        let sort = if args.desc { SortState::desc(key) } else { SortState::asc(key) };
        table.set_sorting(Some(sort));
    }
    table.set_pagination(PaginationState::new(table.config().page_size).with_page_index(args.page));
    table.refresh().await;

    if table.is_error() {
        let reason = match table.redirect() {
            Some(route) => format!("{:?} (redirect to {})", table.status(), route),
            None => format!("{:?}", table.status()),
        };
        return Err(format!("loading page {} failed: {}", args.page, reason).into());
    }
    Ok(table)
}

async fn table(command: TableCommand, token: Option<&str>) -> CliResult {
    match command {
        TableCommand::Show { page } => {
            let table = load_page(&page, token).await?;
            print_table(&table);
            Ok(())
        }
        TableCommand::Export { page, format, out } => {
            let table = load_page(&page, token).await?;
            let path = table.export(format, &out)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn print_table(table: &DataTable) {
    let columns = &table.config().columns;
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| columns.iter().map(|column| cell_text(row, column)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|line| line[i].chars().count())
                .chain(std::iter::once(column.header_text().chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(columns.iter().map(|c| c.header_text()).collect()));
    for row in &cells {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
    let pagination = table.pagination();
    println!(
        "page {}/{} ({} rows total)",
        pagination.page_index + 1,
        table.page_count().max(1),
        table.total_count()
    );
}
