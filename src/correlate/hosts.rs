//! Per-host bundlers.

use crate::error::StatsError;
use crate::netstats::Bundler;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Source IP address of a query.
pub type HostKey = String;

/// Partial result of the by-host fold over one partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostTable {
    hosts: BTreeMap<HostKey, Bundler>,
}

impl HostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a host's bundler, joining with any bundler already held for it.
    pub fn insert(&mut self, host: HostKey, bundler: Bundler) -> Result<(), StatsError> {
        match self.hosts.entry(host) {
            Entry::Vacant(slot) => {
                slot.insert(bundler);
            }
            Entry::Occupied(mut slot) => {
                let joined = slot.get().join(&bundler)?;
                slot.insert(joined);
            }
        }
        Ok(())
    }

    /// Combine two partial tables. Fails on bundlers of different shape.
    pub fn merge(mut self, other: HostTable) -> Result<HostTable, StatsError> {
        for (host, bundler) in other.hosts {
            self.insert(host, bundler)?;
        }
        Ok(self)
    }

    pub fn get(&self, host: &str) -> Option<&Bundler> {
        self.hosts.get(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bundler)> {
        self.hosts.iter().map(|(h, b)| (h.as_str(), b))
    }

    /// Host → feature vector, hosts in sorted order.
    pub fn normalize(&self) -> BTreeMap<HostKey, Vec<f64>> {
        self.hosts
            .iter()
            .map(|(h, b)| (h.clone(), b.normalize()))
            .collect()
    }
}

impl IntoIterator for HostTable {
    type Item = (HostKey, Bundler);
    type IntoIter = std::collections::btree_map::IntoIter<HostKey, Bundler>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.into_iter()
    }
}
