//! dns-sift — per-host behavioral features from DNS query/response transcripts.
//!
//! Modular structure:
//! - [`dissect`] — Transcript chunk → exchange record
//! - [`netstats`] — Mergeable gauges, bundlers, and the bundler factory
//! - [`correlate`] — Exchanges → transactions → per-host bundlers
//! - [`features`] — Per-host feature vectors and the local pipeline
//! - [`diagnostics`] — Collector for skipped records
//! - [`logging`] — Structured logging and JSON lines output

pub mod config;
pub mod correlate;
pub mod diagnostics;
pub mod dissect;
pub mod error;
pub mod features;
pub mod logging;
pub mod netstats;
pub mod value;

pub use config::{GaugeSpec, SiftConfig};
pub use correlate::{Correlator, HostKey, HostTable, Transaction, TransactionTable};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use dissect::{ExchangeDissector, ExchangeKind, ExchangeRecord, FieldMap, ResponseBlock};
pub use error::{ConfigError, DissectError, LookupError, Result, SiftError, StatsError};
pub use features::{FeatureExtractor, FeatureVector};
pub use logging::StructuredLogger;
pub use netstats::{Bundler, BundlerFactory, Gauge, GaugeVariant};
pub use value::Value;
