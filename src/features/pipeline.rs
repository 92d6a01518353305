//! Feature extraction pipeline: chunks → exchanges → transactions → per-host
//! bundlers → vectors. Single partition, sequential.

use super::FeatureVector;
use crate::correlate::{Correlator, HostTable};
use crate::diagnostics::Diagnostics;
use crate::dissect::{ExchangeDissector, ExchangeRecord};
use crate::error::StatsError;
use crate::netstats::BundlerFactory;
use chrono::Utc;
use tracing::info;

/// Split a transcript into chunks on lines equal to `delimiter`. Blank chunks
/// are dropped.
pub fn split_chunks(text: &str, delimiter: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim() == delimiter {
            chunks.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    chunks.push(current);
    chunks.retain(|c| !c.trim().is_empty());
    chunks
}

pub struct FeatureExtractor {
    dissector: ExchangeDissector,
    correlator: Correlator,
}

impl FeatureExtractor {
    pub fn new(factory: BundlerFactory) -> Self {
        Self {
            dissector: ExchangeDissector::new(),
            correlator: Correlator::new(factory),
        }
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    /// Dissect every chunk, skipping (and recording) the ones that fail.
    pub fn dissect<I, S>(&self, chunks: I, diag: &mut Diagnostics) -> Vec<ExchangeRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let records: Vec<ExchangeRecord> = chunks
            .into_iter()
            .filter_map(|chunk| match self.dissector.dissect(chunk.as_ref()) {
                Ok(record) => Some(record),
                Err(e) => {
                    diag.dissect_failed(&e);
                    None
                }
            })
            .collect();
        info!(
            count = records.len(),
            failed = diag.dissect_failures(),
            "dissected exchanges"
        );
        records
    }

    pub fn hosts<I, S>(&self, chunks: I, diag: &mut Diagnostics) -> Result<HostTable, StatsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let records = self.dissect(chunks, diag);
        self.correlator.correlate(records, diag)
    }

    /// One vector per host, sorted by host.
    pub fn extract<I, S>(&self, chunks: I, diag: &mut Diagnostics) -> Result<Vec<FeatureVector>, StatsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = self.hosts(chunks, diag)?;
        Ok(Self::vectors(hosts, self.correlator.factory().dim()))
    }

    /// Finalize a (possibly externally merged) host table.
    pub fn vectors(hosts: HostTable, dim: usize) -> Vec<FeatureVector> {
        let ts = Utc::now().timestamp_millis();
        hosts
            .into_iter()
            .map(|(host, bundler)| FeatureVector {
                host,
                dim,
                values: bundler.into_vector(),
                ts,
            })
            .collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(BundlerFactory::default())
    }
}

/// Alias for pipeline that runs: chunks → features
pub type FeaturePipeline = FeatureExtractor;
