//! Incremental, mergeable single-metric accumulators.

use crate::diagnostics::Diagnostics;
use crate::error::{LookupError, StatsError};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeVariant {
    /// Mean Shannon entropy (bits per character) of a string field.
    Entropy,
    /// Mean of a numeric field.
    Mean,
    /// Number of distinct values of a field.
    DistinctCount,
    /// Number of records seen, whatever their content.
    TotalCount,
}

impl GaugeVariant {
    pub fn name(self) -> &'static str {
        match self {
            GaugeVariant::Entropy => "entropy",
            GaugeVariant::Mean => "mean",
            GaugeVariant::DistinctCount => "distinct_count",
            GaugeVariant::TotalCount => "total_count",
        }
    }
}

impl fmt::Display for GaugeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
enum Accumulator {
    Entropy { sum: f64 },
    Mean { sum: f64 },
    DistinctCount { seen: BTreeSet<String> },
    TotalCount { count: f64 },
}

impl Accumulator {
    fn zero(variant: GaugeVariant) -> Self {
        match variant {
            GaugeVariant::Entropy => Accumulator::Entropy { sum: 0.0 },
            GaugeVariant::Mean => Accumulator::Mean { sum: 0.0 },
            GaugeVariant::DistinctCount => Accumulator::DistinctCount {
                seen: BTreeSet::new(),
            },
            GaugeVariant::TotalCount => Accumulator::TotalCount { count: 0.0 },
        }
    }

    fn variant(&self) -> GaugeVariant {
        match self {
            Accumulator::Entropy { .. } => GaugeVariant::Entropy,
            Accumulator::Mean { .. } => GaugeVariant::Mean,
            Accumulator::DistinctCount { .. } => GaugeVariant::DistinctCount,
            Accumulator::TotalCount { .. } => GaugeVariant::TotalCount,
        }
    }
}

/// Shannon entropy, base 2, over the character frequencies of `s`.
/// The empty string has zero entropy. Terms are summed in character order so
/// the result is bit-identical across calls and processes.
pub fn shannon_entropy(s: &str) -> f64 {
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }
    let len = len as f64;
    -counts
        .values()
        .map(|&n| {
            let p = n as f64 / len;
            p * p.log2()
        })
        .sum::<f64>()
}

fn quotient(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// One accumulator over one configured field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    path: Vec<String>,
    processed: f64,
    acc: Accumulator,
}

impl Gauge {
    pub fn new<S: Into<String>>(variant: GaugeVariant, path: impl IntoIterator<Item = S>) -> Self {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            processed: 0.0,
            acc: Accumulator::zero(variant),
        }
    }

    pub fn variant(&self) -> GaugeVariant {
        self.acc.variant()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn processed(&self) -> f64 {
        self.processed
    }

    /// Raw scalar accumulator (sum or counter). `None` for distinct counts.
    pub fn accumulator(&self) -> Option<f64> {
        match &self.acc {
            Accumulator::Entropy { sum } | Accumulator::Mean { sum } => Some(*sum),
            Accumulator::TotalCount { count } => Some(*count),
            Accumulator::DistinctCount { .. } => None,
        }
    }

    /// Values collected by a distinct-count gauge.
    pub fn distinct(&self) -> Option<&BTreeSet<String>> {
        match &self.acc {
            Accumulator::DistinctCount { seen } => Some(seen),
            _ => None,
        }
    }

    /// Build a gauge with given partial state; `value` is the sum or counter.
    /// Ignored for distinct counts.
    pub fn with_state(mut self, value: f64, processed: f64) -> Self {
        match &mut self.acc {
            Accumulator::Entropy { sum } | Accumulator::Mean { sum } => *sum = value,
            Accumulator::TotalCount { count } => *count = value,
            Accumulator::DistinctCount { .. } => {}
        }
        self.processed = processed;
        self
    }

    /// Fold one record in, or report why the record was skipped. State is
    /// untouched on error.
    pub fn try_update(&mut self, record: &Value) -> Result<(), LookupError> {
        match &mut self.acc {
            Accumulator::Entropy { sum } => {
                let s = record.lookup_str(&self.path)?;
                *sum += shannon_entropy(s);
            }
            Accumulator::Mean { sum } => {
                *sum += record.lookup_f64(&self.path)?;
            }
            Accumulator::DistinctCount { seen } => {
                let leaf = record.lookup(&self.path)?;
                let key = match leaf {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    other => {
                        return Err(LookupError::TypeMismatch {
                            expected: "string",
                            found: other.kind(),
                            depth: self.path.len(),
                        })
                    }
                };
                seen.insert(key);
            }
            Accumulator::TotalCount { count } => *count += 1.0,
        }
        self.processed += 1.0;
        Ok(())
    }

    /// Fold one record in; a failed lookup is recorded in `diag` as gauge `index`.
    pub fn update(&mut self, index: usize, record: &Value, diag: &mut Diagnostics) {
        if let Err(e) = self.try_update(record) {
            diag.lookup_failed(index, &self.path, &e);
        }
    }

    pub fn update_all<'a, I>(&mut self, index: usize, records: I, diag: &mut Diagnostics)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        for record in records {
            self.update(index, record, diag);
        }
    }

    /// Combine two partial states of the same gauge into a new one.
    pub fn join(&self, other: &Gauge) -> Result<Gauge, StatsError> {
        self.check_compatible(0, other)?;
        let acc = match (&self.acc, &other.acc) {
            (Accumulator::Entropy { sum: a }, Accumulator::Entropy { sum: b }) => {
                Accumulator::Entropy { sum: a + b }
            }
            (Accumulator::Mean { sum: a }, Accumulator::Mean { sum: b }) => {
                Accumulator::Mean { sum: a + b }
            }
            (Accumulator::DistinctCount { seen: a }, Accumulator::DistinctCount { seen: b }) => {
                Accumulator::DistinctCount {
                    seen: a.union(b).cloned().collect(),
                }
            }
            (Accumulator::TotalCount { count: a }, Accumulator::TotalCount { count: b }) => {
                Accumulator::TotalCount { count: a + b }
            }
            _ => {
                return Err(StatsError::ConfigurationMismatch {
                    position: 0,
                    expected: self.describe(),
                    found: other.describe(),
                })
            }
        };
        Ok(Gauge {
            path: self.path.clone(),
            processed: self.processed + other.processed,
            acc,
        })
    }

    pub(crate) fn check_compatible(&self, position: usize, other: &Gauge) -> Result<(), StatsError> {
        if self.variant() != other.variant() || self.path != other.path {
            return Err(StatsError::ConfigurationMismatch {
                position,
                expected: self.describe(),
                found: other.describe(),
            });
        }
        Ok(())
    }

    /// Final scalar. Zero when nothing was processed.
    pub fn normalize(&self) -> f64 {
        match &self.acc {
            Accumulator::Entropy { sum } | Accumulator::Mean { sum } => quotient(*sum, self.processed),
            Accumulator::DistinctCount { seen } => seen.len() as f64,
            Accumulator::TotalCount { count } => *count,
        }
    }

    pub fn describe(&self) -> String {
        format!("{}({})", self.variant(), self.path.join("."))
    }
}
