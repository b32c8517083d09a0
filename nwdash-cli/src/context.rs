use anyhow::{Context, Result};
use clap::Args;
use nwdash_common::{
    AggregatorMetrics, DashboardConfig, DatasetConfig, MetricsRegistry, OutputFormat, Scope,
    Selection, SelectionAggregator,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Customer / data center / backup server flags shared by the selection commands.
///
/// Each level defaults to `All`. Inconsistent combinations are not rejected.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Customer name, or All
    #[arg(long, default_value = "All")]
    pub customer: String,
    /// Data center name, or All
    #[arg(long, default_value = "All")]
    pub data_center: String,
    /// Backup server name, or All
    #[arg(long, default_value = "All")]
    pub backup_server: String,
}

impl From<SelectionArgs> for Selection {
    fn from(args: SelectionArgs) -> Self {
        Selection {
            customer: Scope::parse(&args.customer),
            data_center: Scope::parse(&args.data_center),
            backup_server: Scope::parse(&args.backup_server),
        }
    }
}

/// Loaded configuration plus the aggregator built from its dataset.
pub struct DashboardContext {
    pub config: DashboardConfig,
    pub aggregator: SelectionAggregator,
    /// Operational counters of `aggregator`
    pub registry: MetricsRegistry,
}

impl DashboardContext {
    pub fn load(path: Option<&Path>, job_status: bool) -> Result<Self> {
        let mut config = DashboardConfig::load(path).with_context(|| match path {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "failed to load configuration".to_string(),
        })?;
        if job_status {
            config.dataset = DatasetConfig::sample_job_status();
        }

        let (catalog, store) = config
            .dataset
            .build()
            .context("configured dataset is invalid")?;
        debug!(
            customers = catalog.customers().len(),
            entries = store.len(),
            schema = %store.schema(),
            "dataset ready"
        );

        let registry = MetricsRegistry::new("aggregator");
        let metrics = AggregatorMetrics::new(&registry)?;
        let aggregator = SelectionAggregator::new(Arc::new(catalog), Arc::new(store))
            .with_metrics(Arc::new(metrics));
        Ok(Self {
            config,
            aggregator,
            registry,
        })
    }

    /// Requested format, falling back to the configured default.
    pub fn output_format(&self, requested: Option<&str>) -> Result<OutputFormat> {
        match requested {
            Some(format) => Ok(format.parse()?),
            None => Ok(self.config.display.default_format),
        }
    }

    pub fn no_data_label(&self) -> &str {
        &self.config.display.no_data_label
    }
}
