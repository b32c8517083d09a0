//! Hierarchical filter-and-aggregate core for the Networker backup dashboard.
//!
//! Presentation layers ask the [`HierarchyCatalog`] for drill-down options and
//! the [`SelectionAggregator`] for the metric summary of a [`Selection`].

pub mod types;
pub mod error;
pub mod config;
pub mod catalog;
pub mod store;
pub mod aggregator;
pub mod consistency;
pub mod metrics;

pub use types::*;
pub use catalog::{HierarchyCatalog, SelectionOptions};
pub use store::MetricsStore;
pub use aggregator::SelectionAggregator;
pub use consistency::{check_consistency, ConsistencyReport, MissingData};
pub use config::{DashboardConfig, DatasetConfig, DisplayConfig, OutputFormat};
pub use error::{DashboardError, Result};
pub use metrics::{AggregatorMetrics, MetricsRegistry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(ALL, "All");
        assert_eq!(NWDASH_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
