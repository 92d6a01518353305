//! Builds identically-shaped, zero-state bundlers from one configuration.

use super::{Bundler, Gauge, GaugeVariant};
use crate::config::GaugeSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct BundlerFactory {
    specs: Vec<GaugeSpec>,
}

impl BundlerFactory {
    pub fn new(specs: Vec<GaugeSpec>) -> Self {
        Self { specs }
    }

    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (GaugeVariant, Vec<S>)>,
    ) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(variant, path)| GaugeSpec::new(variant, path))
                .collect(),
        )
    }

    pub fn specs(&self) -> &[GaugeSpec] {
        &self.specs
    }

    /// Length of every feature vector this factory's bundlers produce.
    pub fn dim(&self) -> usize {
        self.specs.len()
    }

    pub fn build(&self) -> Bundler {
        Bundler::new(
            self.specs
                .iter()
                .map(|spec| Gauge::new(spec.variant, spec.path.iter().cloned()))
                .collect(),
        )
    }
}

impl Default for BundlerFactory {
    fn default() -> Self {
        Self::new(GaugeSpec::defaults())
    }
}
