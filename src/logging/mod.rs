//! Structured logging and line-oriented output.

mod format;

pub use format::StructuredLogger;
