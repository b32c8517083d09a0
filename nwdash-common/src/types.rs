use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Networker dashboard version information
pub const NWDASH_VERSION: &str = "0.1.0";

/// Sentinel used by every selection level to mean "no filter"
pub const ALL: &str = "All";

/// One level of a drill-down selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    All,
    Only(String),
}

impl Scope {
    /// Parse a selector value; the literal `"All"` is the sentinel.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            Scope::All
        } else {
            Scope::Only(value.to_string())
        }
    }

    pub fn only(value: impl Into<String>) -> Self {
        Scope::Only(value.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scope::All => ALL,
            Scope::Only(id) => id,
        }
    }

    /// Whether an identifier passes this level of the filter.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(selected) => selected == id,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Scope::parse(value)
    }
}

impl From<Option<&str>> for Scope {
    fn from(value: Option<&str>) -> Self {
        value.map(Scope::parse).unwrap_or_default()
    }
}

impl Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Scope::parse(&value))
    }
}

/// Operator selection across the customer / data center / backup server levels.
///
/// Selections are never validated against the catalog: an inconsistent
/// combination is evaluated as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub customer: Scope,
    #[serde(default)]
    pub data_center: Scope,
    #[serde(default)]
    pub backup_server: Scope,
}

impl Selection {
    pub fn new(
        customer: impl Into<Scope>,
        data_center: impl Into<Scope>,
        backup_server: impl Into<Scope>,
    ) -> Self {
        Self {
            customer: customer.into(),
            data_center: data_center.into(),
            backup_server: backup_server.into(),
        }
    }

    /// All / All / All
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_fully_specific(&self) -> bool {
        !self.customer.is_all() && !self.data_center.is_all() && !self.backup_server.is_all()
    }

    /// Conjunction of the three per-level tests.
    pub fn matches(&self, key: &EntryKey) -> bool {
        self.customer.matches(&key.customer)
            && self.data_center.matches(&key.data_center)
            && self.backup_server.matches(&key.backup_server)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.customer, self.data_center, self.backup_server)
    }
}

/// Concrete (customer, data center, backup server) triple keying a store entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub customer: String,
    pub data_center: String,
    pub backup_server: String,
}

impl EntryKey {
    pub fn new(
        customer: impl Into<String>,
        data_center: impl Into<String>,
        backup_server: impl Into<String>,
    ) -> Self {
        Self {
            customer: customer.into(),
            data_center: data_center.into(),
            backup_server: backup_server.into(),
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.customer, self.data_center, self.backup_server)
    }
}

/// Metric names recognized by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    NwServerCount,
    StorageNodeCount,
    ObjectCount,
    DomainCount,
    Successful,
    Failed,
    Running,
}

impl MetricName {
    /// Canonical metric identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NwServerCount => "NWServerCount",
            MetricName::StorageNodeCount => "StorageNodeCount",
            MetricName::ObjectCount => "ObjectCount",
            MetricName::DomainCount => "DomainCount",
            MetricName::Successful => "Successful",
            MetricName::Failed => "Failed",
            MetricName::Running => "Running",
        }
    }

    /// Label shown on the dashboard metric card.
    pub fn label(&self) -> &'static str {
        match self {
            MetricName::NwServerCount => "NW Server",
            MetricName::StorageNodeCount => "STG Node",
            MetricName::ObjectCount => "SO Count",
            MetricName::DomainCount => "DD's Count",
            MetricName::Successful => "Successful",
            MetricName::Failed => "Failed",
            MetricName::Running => "Running",
        }
    }

    /// snake_case form used in configuration files and metric labels
    pub fn key(&self) -> &'static str {
        match self {
            MetricName::NwServerCount => "nw_server_count",
            MetricName::StorageNodeCount => "storage_node_count",
            MetricName::ObjectCount => "object_count",
            MetricName::DomainCount => "domain_count",
            MetricName::Successful => "successful",
            MetricName::Failed => "failed",
            MetricName::Running => "running",
        }
    }

    pub fn schema(&self) -> MetricSchema {
        match self {
            MetricName::NwServerCount
            | MetricName::StorageNodeCount
            | MetricName::ObjectCount
            | MetricName::DomainCount => MetricSchema::Counts,
            MetricName::Successful | MetricName::Failed | MetricName::Running => {
                MetricSchema::JobStatus
            }
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the metric sets held by one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSchema {
    #[default]
    Counts,
    JobStatus,
}

impl MetricSchema {
    /// Metric names in dashboard card order.
    pub fn metrics(&self) -> &'static [MetricName] {
        match self {
            MetricSchema::Counts => &[
                MetricName::NwServerCount,
                MetricName::StorageNodeCount,
                MetricName::ObjectCount,
                MetricName::DomainCount,
            ],
            MetricSchema::JobStatus => {
                &[MetricName::Successful, MetricName::Failed, MetricName::Running]
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricSchema::Counts => "counts",
            MetricSchema::JobStatus => "job_status",
        }
    }
}

impl fmt::Display for MetricSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named non-negative metric values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeMap<MetricName, u64>);

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One zero per metric of the schema.
    pub fn zeroed(schema: MetricSchema) -> Self {
        Self(schema.metrics().iter().map(|name| (*name, 0)).collect())
    }

    pub fn with(mut self, name: MetricName, value: u64) -> Self {
        self.0.insert(name, value);
        self
    }

    /// Missing metrics read as zero.
    pub fn get(&self, name: MetricName) -> u64 {
        self.0.get(&name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: MetricName) -> bool {
        self.0.contains_key(&name)
    }

    /// Adds every metric of `other` into `self`, saturating at `u64::MAX`.
    pub fn accumulate(&mut self, other: &MetricSet) {
        for (name, value) in &other.0 {
            let slot = self.0.entry(*name).or_insert(0);
            *slot = slot.saturating_add(*value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, u64)> + '_ {
        self.0.iter().map(|(name, value)| (*name, *value))
    }

    pub fn names(&self) -> impl Iterator<Item = MetricName> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.0.values().all(|value| *value == 0)
    }
}

impl FromIterator<(MetricName, u64)> for MetricSet {
    fn from_iter<I: IntoIterator<Item = (MetricName, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> std::iter::Sum<&'a MetricSet> for MetricSet {
    fn sum<I: Iterator<Item = &'a MetricSet>>(iter: I) -> Self {
        let mut total = MetricSet::new();
        for set in iter {
            total.accumulate(set);
        }
        total
    }
}

/// Outcome of aggregating one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Summary {
    /// Sum over the matching entries; may legitimately be all zeros.
    Data { metrics: MetricSet, matched: usize },
    /// A fully specific selection that names no stored entry.
    NoData { schema: MetricSchema },
}

impl Summary {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Summary::NoData { .. })
    }

    pub fn metrics(&self) -> Option<&MetricSet> {
        match self {
            Summary::Data { metrics, .. } => Some(metrics),
            Summary::NoData { .. } => None,
        }
    }

    /// Number of store entries that contributed.
    pub fn matched(&self) -> usize {
        match self {
            Summary::Data { matched, .. } => *matched,
            Summary::NoData { .. } => 0,
        }
    }

    /// Value of one metric, `None` for the no-data marker.
    pub fn value(&self, name: MetricName) -> Option<u64> {
        self.metrics().map(|metrics| metrics.get(name))
    }

    pub fn schema(&self) -> MetricSchema {
        match self {
            Summary::Data { metrics, .. } => metrics
                .names()
                .next()
                .map(|name| name.schema())
                .unwrap_or_default(),
            Summary::NoData { schema } => *schema,
        }
    }
}
