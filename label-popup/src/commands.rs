// label-popup/src/commands.rs
// One-shot command line actions

use std::sync::Arc;

use anyhow::{Context, bail};
use label_printer::{PrintRequest, PrintWorkflow, ValidationError};
use shared::{ADD_NEW_SENTINEL, LabelCategory};
use tracing::info;

use crate::config::Cli;
use crate::store::{CategoryStore, load_categories, save_categories};

/// Build the print workflow from configuration
pub fn build_workflow(cli: &Cli) -> anyhow::Result<PrintWorkflow> {
    let client = cli
        .client_config()
        .build_client()
        .context("Failed to create DYMO Connect client")?;

    Ok(PrintWorkflow::new(Arc::new(client))
        .with_template(cli.template())
        .with_copy_delay(cli.copy_delay()))
}

/// Print without the popup. The category is normalized like a stored one.
pub async fn print(cli: &Cli, category: &str, sku: &str, copies: u32) -> anyhow::Result<()> {
    let workflow = build_workflow(cli)?;

    if category.trim() == ADD_NEW_SENTINEL {
        return Err(ValidationError::NoCategory.into());
    }
    let category = LabelCategory::parse(category).map_err(|_| ValidationError::NoCategory)?;
    let request = PrintRequest::new(category.as_str(), sku)?.with_copies(copies)?;

    match workflow
        .print_with_progress(&request, |progress| info!("{}", progress))
        .await
    {
        Ok(outcome) => {
            println!("{}", outcome.message());
            Ok(())
        }
        Err(e) => bail!("Print failed: {}", e),
    }
}

/// Print the stored category list, one per line
pub fn list_categories(store: &dyn CategoryStore) {
    for category in load_categories(store).iter() {
        println!("{}", category);
    }
}

/// Add a category to the store
pub fn add_category(store: &dyn CategoryStore, name: &str) -> anyhow::Result<()> {
    let mut categories = load_categories(store);
    let category = categories.add(name)?;
    save_categories(store, &categories);
    println!("Label type added successfully: {}", category);
    Ok(())
}
