//! Fixed-shape set of gauges updated and merged together: one host's state.

use super::Gauge;
use crate::diagnostics::Diagnostics;
use crate::dissect::ExchangeRecord;
use crate::error::StatsError;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundler {
    gauges: Vec<Gauge>,
}

impl Bundler {
    pub fn new(gauges: Vec<Gauge>) -> Self {
        Self { gauges }
    }

    pub fn gauges(&self) -> &[Gauge] {
        &self.gauges
    }

    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// Forward one projected record to every gauge. A gauge that cannot use
    /// the record skips it without affecting the others.
    pub fn update_value(&mut self, record: &Value, diag: &mut Diagnostics) {
        for (i, gauge) in self.gauges.iter_mut().enumerate() {
            gauge.update(i, record, diag);
        }
    }

    pub fn update(&mut self, record: &ExchangeRecord, diag: &mut Diagnostics) {
        self.update_value(&record.to_value(), diag);
    }

    pub fn update_all<'a, I>(&mut self, records: I, diag: &mut Diagnostics)
    where
        I: IntoIterator<Item = &'a ExchangeRecord>,
    {
        for record in records {
            self.update(record, diag);
        }
    }

    /// Positional merge. Both sides must come from the same configuration.
    pub fn join(&self, other: &Bundler) -> Result<Bundler, StatsError> {
        if self.gauges.len() != other.gauges.len() {
            return Err(StatsError::ArityMismatch {
                left: self.gauges.len(),
                right: other.gauges.len(),
            });
        }
        self.gauges
            .iter()
            .zip(&other.gauges)
            .enumerate()
            .map(|(i, (a, b))| {
                a.check_compatible(i, b)?;
                a.join(b)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Bundler::new)
    }

    /// Feature vector in configuration order, without ending the bundler.
    pub fn normalize(&self) -> Vec<f64> {
        self.gauges.iter().map(Gauge::normalize).collect()
    }

    /// Finalize: no further updates or joins once the vector is taken.
    pub fn into_vector(self) -> Vec<f64> {
        self.normalize()
    }
}
