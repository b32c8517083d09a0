//! Metric sets keyed by (customer, data center, backup server).

use indexmap::IndexMap;

use crate::error::{DashboardError, Result};
use crate::types::{EntryKey, MetricName, MetricSchema, MetricSet};

/// Immutable per-triple metric data of one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsStore {
    schema: MetricSchema,
    entries: IndexMap<EntryKey, MetricSet>,
}

impl MetricsStore {
    pub fn new(schema: MetricSchema) -> Self {
        Self {
            schema,
            entries: IndexMap::new(),
        }
    }

    pub fn from_entries<I>(schema: MetricSchema, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (EntryKey, MetricSet)>,
    {
        let mut store = Self::new(schema);
        for (key, metrics) in entries {
            store.insert(key, metrics)?;
        }
        Ok(store)
    }

    /// Add one entry. A triple may appear once and may only carry metrics of
    /// the store's schema.
    pub fn insert(&mut self, key: EntryKey, metrics: MetricSet) -> Result<()> {
        if let Some(foreign) = metrics.names().find(|name| name.schema() != self.schema) {
            return Err(DashboardError::InvalidStore(format!(
                "entry {} carries {} which is not part of the {} schema",
                key, foreign, self.schema
            )));
        }
        if self.entries.contains_key(&key) {
            return Err(DashboardError::InvalidStore(format!(
                "entry {} declared twice",
                key
            )));
        }
        self.entries.insert(key, metrics);
        Ok(())
    }

    /// Built-in counts dataset; totals 38 / 23 / 95 / 56.
    pub fn sample() -> Self {
        use MetricName::*;

        let rows: [(&str, &str, &str, [u64; 4]); 10] = [
            ("Customer 1", "DC 1", "Server A", [5, 3, 10, 8]),
            ("Customer 1", "DC 1", "Server B", [4, 2, 12, 6]),
            ("Customer 1", "DC 2", "Server A", [3, 1, 8, 5]),
            ("Customer 1", "DC 2", "Server B", [2, 1, 6, 4]),
            ("Customer 2", "DC 3", "Server A", [6, 4, 14, 7]),
            ("Customer 2", "DC 3", "Server C", [5, 3, 11, 6]),
            ("Customer 3", "DC 2", "Server B", [3, 2, 8, 5]),
            ("Customer 3", "DC 2", "Server C", [4, 3, 10, 6]),
            ("Customer 3", "DC 3", "Server A", [4, 3, 9, 5]),
            ("Customer 3", "DC 3", "Server C", [2, 1, 7, 4]),
        ];

        let mut store = Self::new(MetricSchema::Counts);
        for (customer, dc, server, [nw, stg, dd, so]) in rows {
            let metrics = MetricSet::new()
                .with(NwServerCount, nw)
                .with(StorageNodeCount, stg)
                .with(DomainCount, dd)
                .with(ObjectCount, so);
            store
                .entries
                .insert(EntryKey::new(customer, dc, server), metrics);
        }
        store
    }

    /// Backup job status over the sample topology; totals 60 / 25 / 15.
    pub fn sample_job_status() -> Self {
        use MetricName::*;

        let rows: [(&str, &str, &str, [u64; 3]); 10] = [
            ("Customer 1", "DC 1", "Server A", [8, 3, 2]),
            ("Customer 1", "DC 1", "Server B", [7, 2, 1]),
            ("Customer 1", "DC 2", "Server A", [5, 2, 1]),
            ("Customer 1", "DC 2", "Server B", [4, 3, 2]),
            ("Customer 2", "DC 3", "Server A", [9, 4, 2]),
            ("Customer 2", "DC 3", "Server C", [6, 2, 1]),
            ("Customer 3", "DC 2", "Server B", [5, 3, 2]),
            ("Customer 3", "DC 2", "Server C", [6, 2, 1]),
            ("Customer 3", "DC 3", "Server A", [5, 2, 2]),
            ("Customer 3", "DC 3", "Server C", [5, 2, 1]),
        ];

        let mut store = Self::new(MetricSchema::JobStatus);
        for (customer, dc, server, [ok, failed, running]) in rows {
            let metrics = MetricSet::new()
                .with(Successful, ok)
                .with(Failed, failed)
                .with(Running, running);
            store
                .entries
                .insert(EntryKey::new(customer, dc, server), metrics);
        }
        store
    }

    pub fn schema(&self) -> MetricSchema {
        self.schema
    }

    /// Absent triples have no data.
    pub fn get(&self, key: &EntryKey) -> Option<&MetricSet> {
        self.entries.get(key)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&EntryKey, &MetricSet)> {
        self.entries.iter()
    }

    /// Metric-wise sum of every entry.
    pub fn total(&self) -> MetricSet {
        let mut total = MetricSet::zeroed(self.schema);
        for metrics in self.entries.values() {
            total.accumulate(metrics);
        }
        total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_lookup() {
        let store = MetricsStore::sample();
        assert_eq!(store.len(), 10);
        assert_eq!(store.schema(), MetricSchema::Counts);

        let metrics = store
            .get(&EntryKey::new("Customer 2", "DC 3", "Server C"))
            .unwrap();
        assert_eq!(metrics.get(MetricName::NwServerCount), 5);
        assert_eq!(metrics.get(MetricName::DomainCount), 11);

        assert!(store.get(&EntryKey::new("Customer 2", "DC 3", "Server B")).is_none());
    }

    #[test]
    fn test_sample_total() {
        let total = MetricsStore::sample().total();
        assert_eq!(total.get(MetricName::NwServerCount), 38);
        assert_eq!(total.get(MetricName::StorageNodeCount), 23);
        assert_eq!(total.get(MetricName::DomainCount), 95);
        assert_eq!(total.get(MetricName::ObjectCount), 56);
    }

    #[test]
    fn test_job_status_sample_matches_dashboard_pie() {
        let total = MetricsStore::sample_job_status().total();
        assert_eq!(total.get(MetricName::Successful), 60);
        assert_eq!(total.get(MetricName::Failed), 25);
        assert_eq!(total.get(MetricName::Running), 15);
    }

    #[test]
    fn test_insert_rejects_mixed_schema() {
        let mut store = MetricsStore::new(MetricSchema::Counts);
        let result = store.insert(
            EntryKey::new("Acme", "DC 1", "Server A"),
            MetricSet::new().with(MetricName::Failed, 1),
        );
        assert!(matches!(result, Err(DashboardError::InvalidStore(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_triple() {
        let key = EntryKey::new("Acme", "DC 1", "Server A");
        let metrics = MetricSet::new().with(MetricName::ObjectCount, 1);
        let result = MetricsStore::from_entries(
            MetricSchema::Counts,
            vec![(key.clone(), metrics.clone()), (key, metrics)],
        );
        assert!(result.is_err());
    }
}
