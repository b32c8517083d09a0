//! Cross-check between the catalog and the metrics store.
//!
//! Neither finding is fatal. Options without data aggregate to zero, and
//! entries the catalog cannot reach are still counted by `All` selections.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::HierarchyCatalog;
use crate::store::MetricsStore;
use crate::types::EntryKey;

/// Backup server offered under a data center without any stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingData {
    pub data_center: String,
    pub backup_server: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub missing_data: Vec<MissingData>,
    pub unreachable_entries: Vec<EntryKey>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.missing_data.is_empty() && self.unreachable_entries.is_empty()
    }
}

pub fn check_consistency(catalog: &HierarchyCatalog, store: &MetricsStore) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();

    for (data_center, servers) in catalog.data_center_entries() {
        for server in servers {
            let has_entry = store
                .entries()
                .any(|(key, _)| key.data_center == data_center && &key.backup_server == server);
            if !has_entry {
                warn!(data_center, backup_server = %server, "catalog option has no stored data");
                report.missing_data.push(MissingData {
                    data_center: data_center.to_string(),
                    backup_server: server.clone(),
                });
            }
        }
    }

    for (key, _) in store.entries() {
        if !catalog.contains_path(key) {
            warn!(entry = %key, "stored entry is not reachable through the catalog");
            report.unreachable_entries.push(key.clone());
        }
    }

    report
}
