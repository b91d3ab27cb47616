//! Prometheus metrics definitions for agriprice
//!
//! All metrics use the `agriprice_` prefix.

use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Prometheus metrics for the prediction pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Predictions by outcome (success, unknown_category, model_error)
    pub predictions_total: CounterVec,
    /// Aggregate lookups by fallback tier
    pub aggregate_lookups_total: CounterVec,
    /// End-to-end prediction latency in seconds
    pub prediction_latency_seconds: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance with all counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("agriprice_predictions_total", "Total predictions by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let aggregate_lookups_total = CounterVec::new(
            Opts::new(
                "agriprice_aggregate_lookups_total",
                "Min/max aggregate lookups by fallback tier",
            ),
            &["tier"],
        )?;
        registry.register(Box::new(aggregate_lookups_total.clone()))?;

        let prediction_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "agriprice_prediction_latency_seconds",
                "Prediction latency in seconds",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(prediction_latency_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            aggregate_lookups_total,
            prediction_latency_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn inc_prediction(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    pub fn inc_lookup(&self, tier: &str) {
        self.aggregate_lookups_total.with_label_values(&[tier]).inc();
    }

    pub fn observe_latency(&self, seconds: f64) {
        self.prediction_latency_seconds.observe(seconds);
    }
}
