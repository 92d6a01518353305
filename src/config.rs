//! Run configuration. The gauge list must be identical across every parallel
//! unit of work in a run.

use crate::error::ConfigError;
use crate::netstats::GaugeVariant;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Ordered gauge configuration; fixes the feature vector shape
    pub gauges: Vec<GaugeSpec>,
    /// Transcript discovery and chunking
    pub input: InputConfig,
    /// Where feature vectors go
    pub output: OutputConfig,
    /// Logging
    pub log: LogConfig,
}

/// One gauge: which statistic, over which nested field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeSpec {
    pub variant: GaugeVariant,
    pub path: Vec<String>,
}

impl GaugeSpec {
    pub fn new<S: Into<String>>(variant: GaugeVariant, path: impl IntoIterator<Item = S>) -> Self {
        Self {
            variant,
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Hostname entropy (tunnels encode payload into names), distinct record
    /// types per host, and mean request size.
    pub fn defaults() -> Vec<GaugeSpec> {
        vec![
            GaugeSpec::new(GaugeVariant::Entropy, ["meta", "qname"]),
            GaugeSpec::new(GaugeVariant::DistinctCount, ["meta", "qtype"]),
            GaugeSpec::new(GaugeVariant::Mean, ["meta", "query"]),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File or directory of plain-text transcripts
    pub source_path: PathBuf,
    /// Line separating chunks
    pub delimiter: String,
    /// Only read files with this extension when walking a directory
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON lines destination; stdout when unset
    pub destination_path: Option<PathBuf>,
    /// Space-separated points file for the clustering step
    pub points_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            gauges: GaugeSpec::defaults(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("dumps"),
            delimiter: "---".to_string(),
            extension: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl SiftConfig {
    /// Load from JSON file if present and valid; otherwise return default
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(c)) => c,
            _ => Self::default(),
        }
    }

    /// `Ok(None)` when the file does not exist.
    pub fn try_load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path)?;
        let config: SiftConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(Some(config))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gauges.is_empty() {
            return Err(ConfigError::EmptyGauges);
        }
        // Total counts ignore the record, so they may omit a path.
        if let Some(i) = self
            .gauges
            .iter()
            .position(|g| g.path.is_empty() && g.variant != GaugeVariant::TotalCount)
        {
            return Err(ConfigError::EmptyPath(i));
        }
        Ok(())
    }
}
