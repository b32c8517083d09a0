use anyhow::Result;
use colored::Colorize;
use nwdash_common::{OutputFormat, Selection};

use crate::context::DashboardContext;
use crate::render;

pub fn handle_command(
    context: &DashboardContext,
    selection: &Selection,
    format: Option<&str>,
) -> Result<()> {
    let options = context.aggregator.options_for(selection);

    match context.output_format(format)? {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Table => {
            println!("{}", render::heading("Drill-down options"));
            let levels = [
                ("Customer", &selection.customer, &options.customers),
                ("Data Center", &selection.data_center, &options.data_centers),
                ("Backup Server", &selection.backup_server, &options.backup_servers),
            ];
            for (level, current, values) in levels {
                let listed = values
                    .iter()
                    .map(|value| {
                        if value == current.as_str() {
                            format!("[{}]", value).green().bold().to_string()
                        } else {
                            value.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{:<14} {}", format!("{}:", level), listed);
            }
        }
    }

    Ok(())
}
