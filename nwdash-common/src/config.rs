use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::catalog::HierarchyCatalog;
use crate::error::{DashboardError, Result};
use crate::store::MetricsStore;
use crate::types::{EntryKey, MetricName, MetricSchema, MetricSet};

/// Environment variable prefix for overrides, e.g. `NWDASH_DISPLAY__NO_DATA_LABEL`
pub const ENV_PREFIX: &str = "NWDASH";

/// Top-level dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Presentation preferences
    #[serde(default)]
    pub display: DisplayConfig,

    /// Hierarchy and metric data; the built-in sample when omitted
    #[serde(default = "DatasetConfig::sample")]
    pub dataset: DatasetConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            dataset: DatasetConfig::sample(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Text rendered in place of values when a selection has no data
    pub no_data_label: String,

    /// Output format used when a command does not ask for one
    pub default_format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            no_data_label: "N/A".to_string(),
            default_format: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(DashboardError::Config(ConfigError::Message(format!(
                "unsupported output format '{}' (expected table or json)",
                other
            )))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Declarative form of a catalog plus metrics store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub schema: MetricSchema,

    #[serde(default)]
    pub customers: Vec<CustomerConfig>,

    #[serde(default)]
    pub data_centers: Vec<DataCenterConfig>,

    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerConfig {
    pub name: String,
    #[serde(default)]
    pub data_centers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenterConfig {
    pub name: String,
    #[serde(default)]
    pub backup_servers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    pub customer: String,
    pub data_center: String,
    pub backup_server: String,
    pub metrics: BTreeMap<MetricName, u64>,
}

impl DatasetConfig {
    /// The built-in counts dataset
    pub fn sample() -> Self {
        Self::from_parts(&HierarchyCatalog::sample(), &MetricsStore::sample())
    }

    /// The built-in job status dataset over the sample topology
    pub fn sample_job_status() -> Self {
        Self::from_parts(&HierarchyCatalog::sample(), &MetricsStore::sample_job_status())
    }

    pub fn from_parts(catalog: &HierarchyCatalog, store: &MetricsStore) -> Self {
        Self {
            schema: store.schema(),
            customers: catalog
                .customer_entries()
                .map(|(name, dcs)| CustomerConfig {
                    name: name.to_string(),
                    data_centers: dcs.to_vec(),
                })
                .collect(),
            data_centers: catalog
                .data_center_entries()
                .map(|(name, servers)| DataCenterConfig {
                    name: name.to_string(),
                    backup_servers: servers.to_vec(),
                })
                .collect(),
            entries: store
                .entries()
                .map(|(key, metrics)| EntryConfig {
                    customer: key.customer.clone(),
                    data_center: key.data_center.clone(),
                    backup_server: key.backup_server.clone(),
                    metrics: metrics.iter().collect(),
                })
                .collect(),
        }
    }

    /// Construct the immutable catalog and store described by this dataset
    pub fn build(&self) -> Result<(HierarchyCatalog, MetricsStore)> {
        let mut catalog = HierarchyCatalog::new();
        for customer in &self.customers {
            catalog.add_customer(customer.name.as_str(), customer.data_centers.iter().cloned())?;
        }
        for dc in &self.data_centers {
            catalog.add_data_center(dc.name.as_str(), dc.backup_servers.iter().cloned())?;
        }

        let mut store = MetricsStore::new(self.schema);
        for entry in &self.entries {
            let key = EntryKey::new(
                entry.customer.as_str(),
                entry.data_center.as_str(),
                entry.backup_server.as_str(),
            );
            let metrics: MetricSet = entry.metrics.iter().map(|(name, value)| (*name, *value)).collect();
            store.insert(key, metrics)?;
        }

        Ok((catalog, store))
    }
}

impl DashboardConfig {
    /// Load configuration from an optional TOML file, then `NWDASH_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            let name = path.to_string_lossy();
            builder = builder.add_source(File::new(name.as_ref(), FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: DashboardConfig = builder.build()?.try_deserialize()?;
        info!(
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "built-in".to_string()),
            schema = %config.dataset.schema,
            entries = config.dataset.entries.len(),
            "loaded dashboard configuration"
        );
        Ok(config)
    }

    /// Validate that the dataset builds into a catalog and store
    pub fn validate(&self) -> Result<()> {
        self.dataset.build().map(|_| ())
    }
}
