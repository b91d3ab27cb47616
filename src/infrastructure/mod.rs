pub mod artifacts;
pub mod observability;

pub use observability::Metrics;
