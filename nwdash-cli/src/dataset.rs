use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use nwdash_common::Scope;

use crate::context::DashboardContext;
use crate::render;

#[derive(Subcommand)]
pub enum DatasetCommands {
    /// Print the active dataset
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
    /// Validate the active configuration and report dataset statistics
    Validate,
}

pub fn handle_command(context: &DashboardContext, command: DatasetCommands) -> Result<()> {
    match command {
        DatasetCommands::Show { format } => show_dataset(context, &format),
        DatasetCommands::Validate => validate_dataset(context),
    }
}

fn show_dataset(context: &DashboardContext, format: &str) -> Result<()> {
    let config = &context.config;
    let rendered = match format.to_ascii_lowercase().as_str() {
        "toml" => toml::to_string_pretty(config)?,
        "json" => serde_json::to_string_pretty(config)?,
        other => bail!("unsupported dataset format '{}' (expected toml or json)", other),
    };
    println!("{}", rendered);
    Ok(())
}

fn validate_dataset(context: &DashboardContext) -> Result<()> {
    context.config.validate()?;

    let catalog = context.aggregator.catalog();
    let store = context.aggregator.store();

    println!("{}", render::heading("Dataset"));
    println!("{} configuration is valid", "✓".green());
    println!("  Schema:        {}", store.schema());
    println!("  Customers:     {}", catalog.customers().len());
    println!(
        "  Data centers:  {}",
        catalog.data_centers_for(&Scope::All).len()
    );
    println!(
        "  Backup servers: {}",
        catalog.backup_servers_for(&Scope::All).len()
    );
    println!("  Entries:       {}", store.len());
    Ok(())
}
