use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

mod check;
mod context;
mod dataset;
mod options;
mod render;
mod summary;

use context::{DashboardContext, SelectionArgs};

#[derive(Parser)]
#[command(name = "nwdash")]
#[command(about = "Networker backup dashboard CLI")]
#[command(version)]
struct Cli {
    /// Dashboard configuration file (TOML); the built-in sample dataset is used when omitted
    #[arg(short, long, global = true, env = "NWDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Replace the configured dataset with the built-in backup job status dataset
    #[arg(long, global = true)]
    job_status: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the drill-down options for a selection
    Options {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Show the metric summary for a selection
    Summary {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
        /// Also break the summary down over the next level of the hierarchy
        #[arg(short, long)]
        breakdown: bool,
    },
    /// Export the summary for a selection
    Export {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Export format (json, prometheus)
        #[arg(short, long, default_value = "json")]
        format: String,
        /// Output file path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Cross-check the catalog against the metrics store
    Check {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },
    /// Dataset inspection
    Dataset {
        #[command(subcommand)]
        action: dataset::DatasetCommands,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let context = DashboardContext::load(cli.config.as_deref(), cli.job_status)?;

    match cli.command {
        Commands::Options { selection, format } => {
            options::handle_command(&context, &selection.into(), format.as_deref())
        }
        Commands::Summary { selection, format, breakdown } => {
            summary::show_summary(&context, &selection.into(), format.as_deref(), breakdown)
        }
        Commands::Export { selection, format, output } => {
            summary::export_summary(&context, &selection.into(), &format, output.as_deref())
        }
        Commands::Check { format } => check::handle_command(&context, format.as_deref()),
        Commands::Dataset { action } => dataset::handle_command(&context, action),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
