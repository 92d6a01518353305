//! Two keyed folds: exchanges → transactions (by id), transactions → bundlers
//! (by source host).
//!
//! Both combine steps are associative, so an external scheduler may fold
//! any partition with [`TransactionTable::merge`] and [`HostTable::merge`]
//! in any order. Redelivery of the same raw chunk is not detected here and
//! would be counted twice.

mod hosts;
mod transaction;

pub use hosts::{HostKey, HostTable};
pub use transaction::{Transaction, TransactionTable};

use crate::diagnostics::Diagnostics;
use crate::dissect::ExchangeRecord;
use crate::error::StatsError;
use crate::netstats::{Bundler, BundlerFactory};
use tracing::info;

pub struct Correlator {
    factory: BundlerFactory,
}

impl Correlator {
    pub fn new(factory: BundlerFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &BundlerFactory {
        &self.factory
    }

    pub fn group_by_id<I>(&self, records: I) -> TransactionTable
    where
        I: IntoIterator<Item = ExchangeRecord>,
    {
        records.into_iter().collect()
    }

    /// Key a transaction by its source host and fold all of its exchanges
    /// into a fresh bundler. `None` (and a diagnostic) when no exchange
    /// carries a `query_ip`.
    pub fn span_host(&self, tx: &Transaction, diag: &mut Diagnostics) -> Option<(HostKey, Bundler)> {
        let Some(host) = tx.query_ip() else {
            diag.transaction_dropped(&tx.id);
            return None;
        };
        let mut bundler = self.factory.build();
        bundler.update_all(&tx.exchanges, diag);
        Some((host.to_string(), bundler))
    }

    pub fn group_by_host<'a, I>(&self, transactions: I, diag: &mut Diagnostics) -> Result<HostTable, StatsError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut table = HostTable::new();
        for tx in transactions {
            if let Some((host, bundler)) = self.span_host(tx, diag) {
                table.insert(host, bundler)?;
            }
        }
        Ok(table)
    }

    /// Both stages over a single partition.
    pub fn correlate<I>(&self, records: I, diag: &mut Diagnostics) -> Result<HostTable, StatsError>
    where
        I: IntoIterator<Item = ExchangeRecord>,
    {
        let transactions = self.group_by_id(records);
        info!(count = transactions.len(), "grouped exchanges into transactions");

        let dropped_before = diag.dropped_transactions();
        let hosts = self.group_by_host(transactions.iter(), diag)?;
        info!(
            hosts = hosts.len(),
            dropped = diag.dropped_transactions() - dropped_before,
            "gathered per-host statistics"
        );
        Ok(hosts)
    }
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new(BundlerFactory::default())
    }
}
