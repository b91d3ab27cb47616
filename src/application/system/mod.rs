use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::application::ml::PriceModel;
use crate::application::pricing::{EncoderSet, PredictionPipeline, ReferenceDataset};
use crate::config::Config;
use crate::infrastructure::artifacts;
use crate::infrastructure::observability::Metrics;

/// Read-only state shared by every prediction, built once at start-up.
///
/// Construction is the only initialization barrier: once `build` returns, the
/// pipeline can be handed to any number of threads.
pub struct PricingSystem {
    pub encoders: Arc<EncoderSet>,
    pub dataset: Arc<ReferenceDataset>,
    pub model: Arc<dyn PriceModel>,
    pub metrics: Option<Metrics>,
    pipeline: Arc<PredictionPipeline>,
}

impl PricingSystem {
    /// Load all artifacts named by the configuration. Any failure is fatal.
    pub fn build(config: Config) -> Result<Self> {
        info!("Building pricing system...");

        let encoders = artifacts::load_encoder_set(&config.encoders_path)
            .context("Failed to load encoder set")?;
        let dataset = artifacts::load_reference_dataset(&config.dataset_path)
            .context("Failed to load reference dataset")?;
        let model = artifacts::load_model(&config.model_path).context("Failed to load model")?;

        let metrics = if config.observability_enabled {
            Some(Metrics::new().context("Failed to register metrics")?)
        } else {
            None
        };

        Ok(Self::assemble(
            Arc::new(encoders),
            Arc::new(dataset),
            Arc::new(model),
            metrics,
        ))
    }

    /// Wire already loaded components together, e.g. with a stub model.
    pub fn assemble(
        encoders: Arc<EncoderSet>,
        dataset: Arc<ReferenceDataset>,
        model: Arc<dyn PriceModel>,
        metrics: Option<Metrics>,
    ) -> Self {
        let mut pipeline = PredictionPipeline::new(encoders.clone(), dataset.clone(), model.clone());
        if let Some(m) = &metrics {
            pipeline = pipeline.with_metrics(m.clone());
        }

        info!(
            "Pricing system ready: model={} {}, {} reference records",
            model.name(),
            model.version(),
            dataset.len()
        );

        Self {
            encoders,
            dataset,
            model,
            metrics,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> Arc<PredictionPipeline> {
        self.pipeline.clone()
    }
}
