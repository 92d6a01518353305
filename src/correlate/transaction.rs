//! Exchanges grouped by protocol identifier.

use crate::dissect::ExchangeRecord;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// All exchanges sharing an id, ideally one request and its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub exchanges: Vec<ExchangeRecord>,
}

impl Transaction {
    pub fn new(record: ExchangeRecord) -> Self {
        Self {
            id: record.id.clone(),
            exchanges: vec![record],
        }
    }

    /// Concatenate two partial transactions. Callers only join equal ids
    /// (the keyed fold guarantees it); `self.id` is kept.
    pub fn join(mut self, other: Transaction) -> Transaction {
        self.exchanges.extend(other.exchanges);
        self
    }

    /// First non-empty `query_ip` across the exchanges, in order.
    pub fn query_ip(&self) -> Option<&str> {
        self.exchanges.iter().find_map(ExchangeRecord::query_ip)
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

/// Partial result of the by-id fold over one partition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    by_id: BTreeMap<String, Transaction>,
}

impl TransactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tx: Transaction) {
        match self.by_id.entry(tx.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(tx);
            }
            Entry::Occupied(mut slot) => slot.get_mut().exchanges.extend(tx.exchanges),
        }
    }

    pub fn push(&mut self, record: ExchangeRecord) {
        self.insert(Transaction::new(record));
    }

    /// Combine two partial tables; same-id transactions are concatenated.
    pub fn merge(mut self, other: TransactionTable) -> TransactionTable {
        for tx in other.by_id.into_values() {
            self.insert(tx);
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.by_id.values()
    }
}

impl FromIterator<ExchangeRecord> for TransactionTable {
    fn from_iter<I: IntoIterator<Item = ExchangeRecord>>(iter: I) -> Self {
        let mut table = TransactionTable::new();
        for record in iter {
            table.push(record);
        }
        table
    }
}

impl IntoIterator for TransactionTable {
    type Item = Transaction;
    type IntoIter = std::collections::btree_map::IntoValues<String, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_id.into_values()
    }
}
