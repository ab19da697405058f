mod assembler;
mod collector;
mod exposition;
mod metric;
mod normalizer;

pub use collector::{Collector, CollectorOptions};
pub use exposition::{CONTENT_TYPE, encode};
pub use metric::Metric;
