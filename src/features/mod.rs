//! Per-host numeric feature vectors handed to the clustering step.

mod pipeline;

pub use pipeline::{split_chunks, FeatureExtractor, FeaturePipeline};

use serde::{Deserialize, Serialize};

/// Fixed-size feature vector for one host; `dim` equals the gauge count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub host: String,
    pub dim: usize,
    pub values: Vec<f64>,
    pub ts: i64,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.dim.min(self.values.len())]
    }

    /// Values joined by single spaces, one point per line in the points file.
    pub fn to_point_line(&self) -> String {
        self.as_slice()
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
