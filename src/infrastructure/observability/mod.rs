//! Pull-free observability for the pricing pipeline.
//!
//! Metrics live in a private Prometheus registry and are rendered as text on demand
//! (the CLI prints them with `--metrics`). Nothing here listens on a socket.

pub mod metrics;

pub use metrics::Metrics;
