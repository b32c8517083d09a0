use anyhow::{bail, Context, Result};
use nwdash_common::metrics::summary_gauges;
use nwdash_common::{OutputFormat, Selection, Summary};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::context::DashboardContext;
use crate::render;

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub generated_at: String,
    pub selection: Selection,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<ChildSummary>>,
}

#[derive(Debug, Serialize)]
pub struct ChildSummary {
    pub name: String,
    pub summary: Summary,
}

fn build_report(context: &DashboardContext, selection: &Selection, breakdown: bool) -> SummaryReport {
    let aggregator = &context.aggregator;
    SummaryReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        selection: selection.clone(),
        summary: aggregator.aggregate(selection),
        breakdown: breakdown.then(|| {
            aggregator
                .aggregate_children(selection)
                .into_iter()
                .map(|(name, summary)| ChildSummary { name, summary })
                .collect()
        }),
    }
}

/// Name of the level `aggregate_children` splits the selection on.
fn breakdown_level(selection: &Selection) -> &'static str {
    if selection.customer.is_all() {
        "Customer"
    } else if selection.data_center.is_all() {
        "Data Center"
    } else {
        "Backup Server"
    }
}

pub fn show_summary(
    context: &DashboardContext,
    selection: &Selection,
    format: Option<&str>,
    breakdown: bool,
) -> Result<()> {
    let report = build_report(context, selection, breakdown);

    match context.output_format(format)? {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            let no_data = context.no_data_label();
            println!("{}", render::heading(&format!("Overview for {}", selection)));
            println!("{}", render::cards_table(&report.summary, no_data));
            if report.summary.is_no_data() {
                println!("{}", render::no_data_notice(no_data));
            } else {
                println!("Entries: {}", report.summary.matched());
            }

            if let Some(children) = &report.breakdown {
                println!();
                if children.is_empty() {
                    println!("Nothing to break down: every level is selected");
                } else {
                    let rows: Vec<_> = children
                        .iter()
                        .map(|child| (child.name.as_str(), &child.summary))
                        .collect();
                    println!(
                        "{}",
                        render::breakdown_table(breakdown_level(selection), &rows, no_data)
                    );
                }
            }
            println!(
                "Generated: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
        }
    }

    Ok(())
}

pub fn export_summary(
    context: &DashboardContext,
    selection: &Selection,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = match format.to_ascii_lowercase().as_str() {
        "json" => serde_json::to_string_pretty(&build_report(context, selection, true))?,
        "prometheus" => {
            let summary = context.aggregator.aggregate(selection);
            let mut text = summary_gauges(selection, &summary)?;
            text.push_str(&context.registry.export_text()?);
            text
        }
        other => bail!("unsupported export format '{}' (expected json or prometheus)", other),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), format, "exported summary");
            println!("Exported {} summary to {}", format, path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
