use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stockpile_inventory::ItemId;
use stockpile_observability::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "stockpile")]
#[command(version, about = "Single-user inventory tracker backed by a CSV file", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Inventory file [env: STOCKPILE_FILE] [default: inventory.csv]
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Skip unreadable rows instead of failing the load [env: STOCKPILE_SKIP_MALFORMED]
    #[arg(long, global = true)]
    pub skip_malformed: bool,

    /// Log output format: text or json [env: STOCKPILE_LOG_FORMAT]
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a new item
    #[command(allow_negative_numbers = true)]
    Add {
        id: ItemId,
        name: String,
        quantity: i64,
        price: f64,
        category: String,
    },
    /// Remove an item by id
    Remove { id: ItemId },
    /// Change fields of an item, e.g. `update 3 quantity=15 price=2.75`
    #[command(allow_negative_numbers = true)]
    Update {
        id: ItemId,
        /// `field=value` pairs; unknown fields are ignored
        #[arg(value_parser = parse_assignment)]
        changes: Vec<(String, String)>,
    },
    /// Show one item
    Search { id: ItemId },
    /// Show all items
    List {
        /// Print JSON instead of CSV rows
        #[arg(long)]
        json: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `field=value`, got `{raw}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}
