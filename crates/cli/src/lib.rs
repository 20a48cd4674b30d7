//! `stockpile` command-line front end.
//!
//! Each invocation loads the inventory file once, runs one command against
//! the [`Store`](stockpile_inventory::Store), and saves once if it changed.

pub mod args;
pub mod commands;
pub mod config;

pub use args::{Cli, Command, GlobalArgs};
pub use commands::{execute, run, Outcome};
pub use config::Config;
