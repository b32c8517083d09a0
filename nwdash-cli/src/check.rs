use anyhow::Result;
use colored::Colorize;
use nwdash_common::{check_consistency, OutputFormat};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::context::DashboardContext;
use crate::render;

#[derive(Tabled)]
struct UnreachableRow {
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Data Center")]
    data_center: String,
    #[tabled(rename = "Backup Server")]
    backup_server: String,
}

#[derive(Tabled)]
struct MissingRow {
    #[tabled(rename = "Data Center")]
    data_center: String,
    #[tabled(rename = "Backup Server")]
    backup_server: String,
}

/// Report catalog/store gaps. Gaps are flagged, not failures.
pub fn handle_command(context: &DashboardContext, format: Option<&str>) -> Result<()> {
    let aggregator = &context.aggregator;
    let report = check_consistency(aggregator.catalog(), aggregator.store());

    if context.output_format(format)? == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", render::heading("Dataset consistency"));
    if report.is_clean() {
        println!("{} every catalog option has data and every entry is reachable", "✓".green());
        return Ok(());
    }

    if !report.missing_data.is_empty() {
        println!(
            "{} catalog options without stored data: {}",
            "⚠".yellow(),
            report.missing_data.len()
        );
        let rows = report.missing_data.iter().map(|gap| MissingRow {
            data_center: gap.data_center.clone(),
            backup_server: gap.backup_server.clone(),
        });
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    if !report.unreachable_entries.is_empty() {
        println!(
            "{} stored entries not reachable through the catalog: {}",
            "⚠".yellow(),
            report.unreachable_entries.len()
        );
        let rows = report.unreachable_entries.iter().map(|key| UnreachableRow {
            customer: key.customer.clone(),
            data_center: key.data_center.clone(),
            backup_server: key.backup_server.clone(),
        });
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
        println!("These entries still count toward selections that leave a level at All.");
    }

    Ok(())
}
