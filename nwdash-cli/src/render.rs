use colored::Colorize;
use nwdash_common::{MetricName, Summary};
use tabled::builder::Builder;
use tabled::settings::Style;

/// Card value for one metric, or the no-data label.
pub fn metric_value(summary: &Summary, name: MetricName, no_data_label: &str) -> String {
    match summary.value(name) {
        Some(value) => value.to_string(),
        None => no_data_label.to_string(),
    }
}

/// Metric cards as a two-column table.
pub fn cards_table(summary: &Summary, no_data_label: &str) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Metric".to_string(), "Value".to_string()]);
    for name in summary.schema().metrics() {
        builder.push_record([
            name.label().to_string(),
            metric_value(summary, *name, no_data_label),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// One row per child selection, one column per metric.
pub fn breakdown_table(level: &str, children: &[(&str, &Summary)], no_data_label: &str) -> String {
    let metrics = children
        .first()
        .map(|(_, summary)| summary.schema().metrics())
        .unwrap_or_default();

    let mut builder = Builder::default();
    let mut header = vec![level.to_string()];
    header.extend(metrics.iter().map(|name| name.label().to_string()));
    header.push("Entries".to_string());
    builder.push_record(header);

    for (label, summary) in children {
        let mut row = vec![label.to_string()];
        row.extend(
            metrics
                .iter()
                .map(|name| metric_value(summary, *name, no_data_label)),
        );
        row.push(summary.matched().to_string());
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn heading(text: &str) -> String {
    format!("{}\n{}", text.bold(), "=".repeat(text.chars().count()))
}

pub fn no_data_notice(label: &str) -> String {
    format!("{} no stored entry matches this selection", label.yellow().bold())
}
