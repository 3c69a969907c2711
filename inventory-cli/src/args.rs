//! Command line arguments.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use inventory_lib::export::ExportFormat;

#[derive(Parser)]
#[command(name = "inventory", about = "Browse and export inventory tables", version)]
pub struct Cli {
    /// Base URL of the inventory API
    #[arg(long, env = "INVENTORY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for authenticated endpoints
    #[arg(long, env = "INVENTORY_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Increase terminal log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and print the bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new user
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Inventory operations
    #[command(subcommand)]
    Inventory(InventoryCommand),
    /// Inventory item operations
    #[command(subcommand)]
    Item(ItemCommand),
    /// Load a table from a JSON definition
    #[command(subcommand)]
    Table(TableCommand),
}

#[derive(Subcommand)]
pub enum InventoryCommand {
    List {
        #[arg(long)]
        user_id: i64,
    },
    Get {
        id: i64,
    },
    Create {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ItemCommand {
    List {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        inventory_id: i64,
    },
    Get {
        id: i64,
        #[arg(long)]
        user_id: i64,
    },
    Create(ItemFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ItemFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args)]
pub struct ItemFields {
    #[arg(long)]
    pub inventory_id: i64,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub quantity: i64,
    #[arg(long)]
    pub description: Option<String>,
    /// Image file to upload
    #[arg(long, conflicts_with = "image_url")]
    pub image: Option<PathBuf>,
    /// URL of an already uploaded image
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Args)]
pub struct PageArgs {
    /// JSON table definition
    pub definition: PathBuf,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    pub page: usize,
    /// Overrides the page size of the definition
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Orders the page by this accessor key
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

#[derive(Subcommand)]
pub enum TableCommand {
    /// Print one page of the table
    Show {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Write one page of the table as a download
    Export {
        #[command(flatten)]
        page: PageArgs,
        /// excel, csv or pdf
        #[arg(long)]
        format: ExportFormat,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}
