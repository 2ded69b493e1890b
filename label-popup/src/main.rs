//! label-popup: print SKU barcode labels through DYMO Connect
//!
//! Without a subcommand the interactive popup opens. `print`, `categories`
//! and `add-category` run once and exit.

mod app;
mod commands;
mod config;
mod controller;
mod logger;
mod state;
mod store;
mod ui;

use config::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::load();

    match cli.command() {
        Command::Popup => {
            logger::init_tui_logger(&cli.log_level, cli.log_dir.as_deref());
            app::run(&cli).await
        }
        Command::Print {
            category,
            sku,
            copies,
        } => {
            logger::init_logger(&cli.log_level, cli.log_dir.as_deref());
            commands::print(&cli, &category, &sku, copies).await
        }
        Command::Categories => {
            logger::init_logger(&cli.log_level, cli.log_dir.as_deref());
            commands::list_categories(&cli.store());
            Ok(())
        }
        Command::AddCategory { name } => {
            logger::init_logger(&cli.log_level, cli.log_dir.as_deref());
            commands::add_category(&cli.store(), &name)
        }
    }
}
