use std::io::Write;

use anyhow::{Context, Result};
use stockpile_inventory::{Item, ItemChanges, Store};

use crate::args::Command;
use crate::config::Config;

/// Whether a command changed the store and it must be saved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Modified,
}

/// Load the configured file, run `command`, and save if it changed anything.
///
/// A failing command leaves the file untouched.
pub fn run(command: Command, config: &Config, out: &mut impl Write) -> Result<()> {
    let path = &config.data_file;
    let mut store = Store::load_with(path, config.load_policy)
        .with_context(|| format!("failed to load inventory from {}", path.display()))?;

    if execute(command, &mut store, out)? == Outcome::Modified {
        store
            .save(path)
            .with_context(|| format!("failed to save inventory to {}", path.display()))?;
    }
    Ok(())
}

/// Run one command against an in-memory store.
pub fn execute(command: Command, store: &mut Store, out: &mut impl Write) -> Result<Outcome> {
    match command {
        Command::Add {
            id,
            name,
            quantity,
            price,
            category,
        } => {
            let item = store.add(Item::new(id, name, quantity, price, category))?;
            writeln!(out, "Added item: {}", item.name())?;
            Ok(Outcome::Modified)
        }
        Command::Remove { id } => {
            store.remove(id)?;
            writeln!(out, "Removed item ID {id}")?;
            Ok(Outcome::Modified)
        }
        Command::Update { id, changes } => {
            let mut pending = ItemChanges::new();
            for (key, value) in &changes {
                pending.set_field(key, value)?;
            }
            let item = store.update(id, &pending)?;
            writeln!(out, "{}", format_row(item))?;
            Ok(Outcome::Modified)
        }
        Command::Search { id } => {
            match store.find(id) {
                Some(item) => writeln!(out, "{}", format_row(item))?,
                None => writeln!(out, "No item found with ID {id}.")?,
            }
            Ok(Outcome::Unchanged)
        }
        Command::List { json } => {
            if json {
                let items: Vec<&Item> = store.list_all().map(|(_, item)| item).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
            } else if store.is_empty() {
                writeln!(out, "Inventory is empty.")?;
            } else {
                for (_, item) in store.list_all() {
                    writeln!(out, "{}", format_row(item))?;
                }
            }
            Ok(Outcome::Unchanged)
        }
    }
}

fn format_row(item: &Item) -> String {
    format!(
        "{},{},{},{},{}",
        item.id(),
        item.name(),
        item.quantity(),
        item.price(),
        item.category()
    )
}
