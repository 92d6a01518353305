//! Error taxonomy: dissection failures, gauge lookups, configuration mismatches.

use thiserror::Error;

/// A chunk that could not be turned into an exchange record. Always non-fatal:
/// the chunk is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DissectError {
    #[error("chunk has no ';;' marker")]
    MissingMarker,

    #[error("response block has {found} sections, expected at least {expected}")]
    Structural { found: usize, expected: usize },

    #[error("malformed response header: {0:?}")]
    Header(String),

    #[error("malformed response flags: {0:?}")]
    Flags(String),

    #[error("meta or packet segment failed to dissect")]
    PartialDissection,

    #[error("exchange carries neither a query nor a response size")]
    UnclassifiedExchange,

    #[error("response header has no id")]
    MissingIdentifier,
}

/// A well-formed record that lacks a configured field. Gauge-local, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("missing key {key:?} at depth {depth}")]
    MissingKey { key: String, depth: usize },

    #[error("index {index} out of range at depth {depth}")]
    IndexOutOfRange { index: usize, depth: usize },

    #[error("expected {expected} at depth {depth}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        depth: usize,
    },
}

/// Merge of incompatible gauge or bundler state. Fatal: indicates the parallel
/// units of a run were built from different configurations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("bundler arity mismatch: {left} gauges vs {right}")]
    ArityMismatch { left: usize, right: usize },

    #[error("gauge configuration mismatch at position {position}: {expected} vs {found}")]
    ConfigurationMismatch {
        position: usize,
        expected: String,
        found: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gauge configuration is empty")]
    EmptyGauges,

    #[error("gauge {0} has an empty field path")]
    EmptyPath(usize),
}

/// Top-level error for the surrounding application.
#[derive(Error, Debug)]
pub enum SiftError {
    #[error(transparent)]
    Dissect(#[from] DissectError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = SiftError> = std::result::Result<T, E>;
