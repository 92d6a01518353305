//! Subscriber installation and one-JSON-object-per-line (ndjson) output.

use crate::features::FeatureVector;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber writing to stderr (stdout carries feature
    /// vectors), level from RUST_LOG or default.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Emit a single JSON line
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }

    pub fn write_vectors(vectors: &[FeatureVector], w: &mut impl Write) -> std::io::Result<()> {
        for v in vectors {
            Self::emit_json(v, w)?;
        }
        Ok(())
    }

    /// Plain points file: one vector per line, values space-separated.
    pub fn write_points(vectors: &[FeatureVector], w: &mut impl Write) -> std::io::Result<()> {
        for v in vectors {
            writeln!(w, "{}", v.to_point_line())?;
        }
        Ok(())
    }
}
