//! Customer → data center → backup server hierarchy.
//!
//! The catalog only answers "which options exist under this parent". It never
//! fails: unknown parents simply have no children.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::types::{EntryKey, Scope, Selection, ALL};

/// Immutable lookup of the valid drill-down options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyCatalog {
    customers: IndexMap<String, Vec<String>>,
    data_centers: IndexMap<String, Vec<String>>,
}

/// The three cascading option lists for a selection, each led by `All`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub customers: Vec<String>,
    pub data_centers: Vec<String>,
    pub backup_servers: Vec<String>,
}

impl HierarchyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a customer and the data centers it uses.
    pub fn add_customer<I, S>(&mut self, name: impl Into<String>, data_centers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name == ALL {
            return Err(DashboardError::InvalidCatalog(format!(
                "'{}' is reserved and cannot name a customer",
                ALL
            )));
        }
        if self.customers.contains_key(&name) {
            return Err(DashboardError::InvalidCatalog(format!(
                "customer '{}' declared twice",
                name
            )));
        }
        self.customers.insert(name, dedup(data_centers));
        Ok(())
    }

    /// Declare a data center and the backup servers it hosts.
    pub fn add_data_center<I, S>(&mut self, name: impl Into<String>, backup_servers: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name == ALL {
            return Err(DashboardError::InvalidCatalog(format!(
                "'{}' is reserved and cannot name a data center",
                ALL
            )));
        }
        if self.data_centers.contains_key(&name) {
            return Err(DashboardError::InvalidCatalog(format!(
                "data center '{}' declared twice",
                name
            )));
        }
        self.data_centers.insert(name, dedup(backup_servers));
        Ok(())
    }

    /// Built-in three-customer sample topology.
    pub fn sample() -> Self {
        let mut catalog = Self::new();
        let customers: [(&str, &[&str]); 3] = [
            ("Customer 1", &["DC 1", "DC 2"]),
            ("Customer 2", &["DC 3"]),
            ("Customer 3", &["DC 2", "DC 3"]),
        ];
        let data_centers: [(&str, &[&str]); 3] = [
            ("DC 1", &["Server A", "Server B"]),
            ("DC 2", &["Server B", "Server C"]),
            ("DC 3", &["Server A", "Server C"]),
        ];
        for (name, dcs) in customers {
            catalog
                .customers
                .insert(name.to_string(), dcs.iter().map(|dc| dc.to_string()).collect());
        }
        for (name, servers) in data_centers {
            catalog
                .data_centers
                .insert(name.to_string(), servers.iter().map(|s| s.to_string()).collect());
        }
        catalog
    }

    pub fn customers(&self) -> Vec<&str> {
        self.customers.keys().map(String::as_str).collect()
    }

    /// Data centers of a customer; for `All`, the ordered union over every customer.
    pub fn data_centers_for(&self, customer: &Scope) -> Vec<&str> {
        match customer {
            Scope::All => self
                .customers
                .values()
                .flatten()
                .map(String::as_str)
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect(),
            Scope::Only(name) => self
                .customers
                .get(name)
                .map(|dcs| dcs.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    /// Backup servers of a data center; for `All`, the ordered union over every data center.
    pub fn backup_servers_for(&self, data_center: &Scope) -> Vec<&str> {
        match data_center {
            Scope::All => self
                .data_centers
                .values()
                .flatten()
                .map(String::as_str)
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect(),
            Scope::Only(name) => self
                .data_centers
                .get(name)
                .map(|servers| servers.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    pub fn options_for(&self, selection: &Selection) -> SelectionOptions {
        let with_all = |options: Vec<&str>| {
            std::iter::once(ALL)
                .chain(options)
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        SelectionOptions {
            customers: with_all(self.customers()),
            data_centers: with_all(self.data_centers_for(&selection.customer)),
            backup_servers: with_all(self.backup_servers_for(&selection.data_center)),
        }
    }

    /// Whether the triple can be reached by drilling down the catalog.
    pub fn contains_path(&self, key: &EntryKey) -> bool {
        let customer_has_dc = self
            .customers
            .get(&key.customer)
            .is_some_and(|dcs| dcs.contains(&key.data_center));
        let dc_has_server = self
            .data_centers
            .get(&key.data_center)
            .is_some_and(|servers| servers.contains(&key.backup_server));
        customer_has_dc && dc_has_server
    }

    /// Declared data centers with their servers, in declaration order.
    pub fn data_center_entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.data_centers
            .iter()
            .map(|(name, servers)| (name.as_str(), servers.as_slice()))
    }

    /// Declared customers with their data centers, in declaration order.
    pub fn customer_entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.customers
            .iter()
            .map(|(name, dcs)| (name.as_str(), dcs.as_slice()))
    }
}

fn dedup<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}
