//! Statistical accumulators: gauges, bundlers of gauges, and the factory that
//! shapes them.
//!
//! Every `join` is commutative and associative, so partial states can be
//! merged in any order and grouping.

mod bundler;
mod factory;
mod gauge;

pub use bundler::Bundler;
pub use factory::BundlerFactory;
pub use gauge::{shannon_entropy, Gauge, GaugeVariant};
