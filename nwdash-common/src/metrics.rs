//! Prometheus metrics for the dashboard.
//!
//! Two concerns live here: operational counters for the aggregator itself, and
//! rendering an aggregated summary as gauges for scraping.

use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::error::{DashboardError, Result};
use crate::types::{Selection, Summary};

/// Metrics registry for one dashboard component
pub struct MetricsRegistry {
    registry: Registry,
    component: String,
}

impl MetricsRegistry {
    pub fn new(component: &str) -> Self {
        Self {
            registry: Registry::new(),
            component: component.to_string(),
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DashboardError::Serialization(e.to_string()))
    }

    pub fn create_counter(&self, name: &str, help: &str) -> Result<IntCounter> {
        let opts = Opts::new(name, help).const_label("component", &self.component);
        let counter = IntCounter::with_opts(opts)?;
        self.registry.register(Box::new(counter.clone()))?;
        Ok(counter)
    }

    pub fn create_counter_vec(&self, name: &str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
        let opts = Opts::new(name, help).const_label("component", &self.component);
        let counter_vec = IntCounterVec::new(opts, labels)?;
        self.registry.register(Box::new(counter_vec.clone()))?;
        Ok(counter_vec)
    }

    pub fn create_gauge(&self, name: &str, help: &str) -> Result<IntGauge> {
        let opts = Opts::new(name, help).const_label("component", &self.component);
        let gauge = IntGauge::with_opts(opts)?;
        self.registry.register(Box::new(gauge.clone()))?;
        Ok(gauge)
    }

    pub fn create_gauge_vec(&self, name: &str, help: &str, labels: &[&str]) -> Result<IntGaugeVec> {
        let opts = Opts::new(name, help).const_label("component", &self.component);
        let gauge_vec = IntGaugeVec::new(opts, labels)?;
        self.registry.register(Box::new(gauge_vec.clone()))?;
        Ok(gauge_vec)
    }
}

/// Counters updated by the selection aggregator.
#[derive(Clone)]
pub struct AggregatorMetrics {
    pub aggregations: IntCounter,
    pub outcomes: IntCounterVec,
    pub matched_entries: IntGauge,
}

impl AggregatorMetrics {
    pub fn new(registry: &MetricsRegistry) -> Result<Self> {
        Ok(Self {
            aggregations: registry
                .create_counter("nwdash_aggregations_total", "Selections aggregated")?,
            outcomes: registry.create_counter_vec(
                "nwdash_aggregation_outcomes_total",
                "Aggregation results by outcome",
                &["outcome"],
            )?,
            matched_entries: registry.create_gauge(
                "nwdash_matched_entries",
                "Store entries matched by the most recent aggregation",
            )?,
        })
    }

    pub fn record(&self, summary: &Summary) {
        self.aggregations.inc();
        let outcome = if summary.is_no_data() { "no_data" } else { "data" };
        self.outcomes.with_label_values(&[outcome]).inc();
        self.matched_entries.set(summary.matched() as i64);
    }
}

/// Render one summary as `nwdash_summary_value` gauges.
///
/// The no-data outcome produces no samples, only `nwdash_summary_no_data 1`.
pub fn summary_gauges(selection: &Selection, summary: &Summary) -> Result<String> {
    let registry = MetricsRegistry::new("nwdash");
    let values = registry.create_gauge_vec(
        "nwdash_summary_value",
        "Aggregated metric value for the selection",
        &["customer", "data_center", "backup_server", "metric"],
    )?;
    let no_data = registry.create_gauge(
        "nwdash_summary_no_data",
        "1 when the selection names no stored entry",
    )?;

    let customer = selection.customer.as_str();
    let data_center = selection.data_center.as_str();
    let backup_server = selection.backup_server.as_str();

    match summary.metrics() {
        Some(metrics) => {
            for (name, value) in metrics.iter() {
                values
                    .with_label_values(&[customer, data_center, backup_server, name.key()])
                    .set(i64::try_from(value).unwrap_or(i64::MAX));
            }
        }
        None => no_data.set(1),
    }

    registry.export_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricName, MetricSchema, MetricSet};

    #[test]
    fn test_aggregator_metrics_record() {
        let registry = MetricsRegistry::new("test");
        let metrics = AggregatorMetrics::new(&registry).unwrap();

        metrics.record(&Summary::Data {
            metrics: MetricSet::zeroed(MetricSchema::Counts),
            matched: 3,
        });
        metrics.record(&Summary::NoData {
            schema: MetricSchema::Counts,
        });

        assert_eq!(metrics.aggregations.get(), 2);
        assert_eq!(metrics.outcomes.with_label_values(&["data"]).get(), 1);
        assert_eq!(metrics.outcomes.with_label_values(&["no_data"]).get(), 1);
        assert_eq!(metrics.matched_entries.get(), 0);

        let text = registry.export_text().unwrap();
        assert!(text.contains("nwdash_aggregations_total{component=\"test\"} 2"));
    }

    #[test]
    fn test_summary_gauges() {
        let selection = Selection::new("Customer 1", "DC 1", "Server A");
        let summary = Summary::Data {
            metrics: MetricSet::new().with(MetricName::ObjectCount, 8),
            matched: 1,
        };

        let text = summary_gauges(&selection, &summary).unwrap();
        assert!(text.contains("metric=\"object_count\""));
        assert!(text.contains("customer=\"Customer 1\""));
        assert!(text.contains("nwdash_summary_no_data{component=\"nwdash\"} 0"));
    }
}
