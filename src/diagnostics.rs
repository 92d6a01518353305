//! Explicit collector for swallowed per-record failures. Passed by `&mut` into
//! dissection, gauge updates and correlation instead of a process-wide logger.

use crate::error::{DissectError, LookupError};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A chunk was skipped.
    Dissect { error: String },
    /// A gauge skipped one record.
    Lookup { gauge: usize, path: String, error: String },
    /// A transaction had no source address in any exchange.
    DroppedTransaction { id: String },
}

/// Entries retained by [`Diagnostics::new`].
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    /// Cap on retained entries; counts keep growing past it.
    capacity: usize,
    dissect_failures: u64,
    lookup_failures: u64,
    dropped_transactions: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Only retain the first `capacity` entries (batch runs see millions of
    /// bad records).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            dissect_failures: 0,
            lookup_failures: 0,
            dropped_transactions: 0,
        }
    }

    fn push(&mut self, d: Diagnostic) {
        if self.entries.len() < self.capacity {
            self.entries.push(d);
        }
    }

    pub fn dissect_failed(&mut self, error: &DissectError) {
        debug!(error = %error, "chunk dissection failed");
        self.dissect_failures += 1;
        self.push(Diagnostic::Dissect {
            error: error.to_string(),
        });
    }

    pub fn lookup_failed(&mut self, gauge: usize, path: &[String], error: &LookupError) {
        let path = path.join(".");
        debug!(gauge, path = %path, error = %error, "gauge skipped record");
        self.lookup_failures += 1;
        self.push(Diagnostic::Lookup {
            gauge,
            path,
            error: error.to_string(),
        });
    }

    pub fn transaction_dropped(&mut self, id: &str) {
        debug!(id, "transaction has no query_ip; dropped");
        self.dropped_transactions += 1;
        self.push(Diagnostic::DroppedTransaction { id: id.to_string() });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn dissect_failures(&self) -> u64 {
        self.dissect_failures
    }

    pub fn lookup_failures(&self) -> u64 {
        self.lookup_failures
    }

    pub fn dropped_transactions(&self) -> u64 {
        self.dropped_transactions
    }

    pub fn is_empty(&self) -> bool {
        self.dissect_failures == 0 && self.lookup_failures == 0 && self.dropped_transactions == 0
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
