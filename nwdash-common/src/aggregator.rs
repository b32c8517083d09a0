//! Selection aggregator.
//!
//! Every selection, whatever mix of `All` and concrete levels it holds, goes
//! through the same conjunctive filter over the store entries. A backup server
//! chosen without its data center therefore still picks up every entry for
//! that server, and a server shared by several data centers is summed across
//! all of them.

use std::sync::Arc;

use indexmap::IndexSet;
use tracing::debug;

use crate::catalog::{HierarchyCatalog, SelectionOptions};
use crate::metrics::AggregatorMetrics;
use crate::store::MetricsStore;
use crate::types::{EntryKey, MetricSet, Scope, Selection, Summary};

/// Computes summaries over an immutable catalog and store.
#[derive(Clone)]
pub struct SelectionAggregator {
    catalog: Arc<HierarchyCatalog>,
    store: Arc<MetricsStore>,
    metrics: Option<Arc<AggregatorMetrics>>,
}

impl SelectionAggregator {
    pub fn new(catalog: Arc<HierarchyCatalog>, store: Arc<MetricsStore>) -> Self {
        Self {
            catalog,
            store,
            metrics: None,
        }
    }

    /// Aggregator over the built-in sample counts dataset.
    pub fn sample() -> Self {
        Self::new(
            Arc::new(HierarchyCatalog::sample()),
            Arc::new(MetricsStore::sample()),
        )
    }

    pub fn with_metrics(mut self, metrics: Arc<AggregatorMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn catalog(&self) -> &HierarchyCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    pub fn options_for(&self, selection: &Selection) -> SelectionOptions {
        self.catalog.options_for(selection)
    }

    /// Sum the metric sets of every entry the selection matches.
    ///
    /// A fully specific selection that matches nothing yields
    /// [`Summary::NoData`]; any other selection yields data, possibly zero.
    pub fn aggregate(&self, selection: &Selection) -> Summary {
        let mut metrics = MetricSet::zeroed(self.store.schema());
        let mut matched = 0usize;

        for (key, entry) in self.store.entries() {
            if selection.matches(key) {
                metrics.accumulate(entry);
                matched += 1;
            }
        }

        let summary = if matched == 0 && selection.is_fully_specific() {
            Summary::NoData {
                schema: self.store.schema(),
            }
        } else {
            Summary::Data { metrics, matched }
        };

        debug!(%selection, matched, no_data = summary.is_no_data(), "aggregated selection");
        if let Some(metrics) = &self.metrics {
            metrics.record(&summary);
        }
        summary
    }

    /// Break a selection down over the children of its first `All` level.
    ///
    /// Children are the catalog options under the selection, followed by any
    /// value of that level held by matching store entries the catalog does not
    /// list. Every matched entry therefore lands in exactly one child, and the
    /// children sum to the parent. Returns an empty list when every level is
    /// already specific.
    pub fn aggregate_children(&self, selection: &Selection) -> Vec<(String, Summary)> {
        let Some(level) = Level::first_open(selection) else {
            return Vec::new();
        };

        let mut names: IndexSet<&str> = match level {
            Level::Customer => self.catalog.customers().into_iter().collect(),
            Level::DataCenter => self
                .catalog
                .data_centers_for(&selection.customer)
                .into_iter()
                .collect(),
            Level::BackupServer => self
                .catalog
                .backup_servers_for(&selection.data_center)
                .into_iter()
                .collect(),
        };
        let listed = names.len();
        for (key, _) in self.store.entries() {
            if selection.matches(key) {
                names.insert(level.of(key));
            }
        }
        if names.len() > listed {
            debug!(
                %selection,
                unlisted = names.len() - listed,
                "breakdown includes values missing from the catalog"
            );
        }

        names
            .into_iter()
            .map(|name| (name.to_string(), self.aggregate(&level.narrow(selection, name))))
            .collect()
    }
}

/// Hierarchy level a breakdown splits on.
#[derive(Debug, Clone, Copy)]
enum Level {
    Customer,
    DataCenter,
    BackupServer,
}

impl Level {
    fn first_open(selection: &Selection) -> Option<Self> {
        if selection.customer.is_all() {
            Some(Level::Customer)
        } else if selection.data_center.is_all() {
            Some(Level::DataCenter)
        } else if selection.backup_server.is_all() {
            Some(Level::BackupServer)
        } else {
            None
        }
    }

    fn of(self, key: &EntryKey) -> &str {
        match self {
            Level::Customer => &key.customer,
            Level::DataCenter => &key.data_center,
            Level::BackupServer => &key.backup_server,
        }
    }

    fn narrow(self, selection: &Selection, name: &str) -> Selection {
        let mut child = selection.clone();
        let scope = match self {
            Level::Customer => &mut child.customer,
            Level::DataCenter => &mut child.data_center,
            Level::BackupServer => &mut child.backup_server,
        };
        *scope = Scope::only(name);
        child
    }
}
