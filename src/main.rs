//! dns-sift entrypoint: read plain-text transcripts, emit one feature vector
//! per source host as JSON lines, and optionally a points file for clustering.

use dns_sift::{
    config::SiftConfig,
    diagnostics::Diagnostics,
    features::{split_chunks, FeatureExtractor},
    logging::StructuredLogger,
    netstats::BundlerFactory,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Retained diagnostic entries; counters are unbounded.
const DIAGNOSTICS_CAPACITY: usize = 1000;

fn transcript_files(root: &Path, extension: Option<&str>) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| match extension {
            Some(ext) => p.extension().and_then(|e| e.to_str()) == Some(ext),
            None => true,
        })
        .collect();
    files.sort();
    files
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("DNS_SIFT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = SiftConfig::try_load(&config_path)?.unwrap_or_default();

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(
        source = ?config.input.source_path,
        gauges = config.gauges.len(),
        "dns-sift starting"
    );

    let mut chunks = Vec::new();
    for path in transcript_files(&config.input.source_path, config.input.extension.as_deref()) {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let before = chunks.len();
                chunks.extend(split_chunks(&text, &config.input.delimiter));
                info!(path = %path.display(), chunks = chunks.len() - before, "loaded transcript");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable transcript"),
        }
    }

    let extractor = FeatureExtractor::new(BundlerFactory::new(config.gauges.clone()));
    let mut diag = Diagnostics::with_capacity(DIAGNOSTICS_CAPACITY);
    let vectors = extractor.extract(&chunks, &mut diag)?;

    info!(
        hosts = vectors.len(),
        dissect_failures = diag.dissect_failures(),
        lookup_failures = diag.lookup_failures(),
        dropped_transactions = diag.dropped_transactions(),
        "feature extraction complete"
    );

    match &config.output.destination_path {
        Some(path) => {
            let mut w = BufWriter::new(File::create(path)?);
            StructuredLogger::write_vectors(&vectors, &mut w)?;
            w.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            StructuredLogger::write_vectors(&vectors, &mut w)?;
        }
    }

    if let Some(path) = &config.output.points_path {
        let mut w = BufWriter::new(File::create(path)?);
        StructuredLogger::write_points(&vectors, &mut w)?;
        w.flush()?;
        info!(path = %path.display(), "wrote points file");
    }

    Ok(())
}
