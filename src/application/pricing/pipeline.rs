use crate::application::ml::PriceModel;
use crate::application::pricing::encoder::EncoderSet;
use crate::application::pricing::reference_dataset::ReferenceDataset;
use crate::domain::errors::{ModelInvocationError, PredictionError};
use crate::domain::pricing::{Aggregates, FeatureVector, PriceQuery};
use crate::infrastructure::observability::Metrics;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn};
use uuid::Uuid;

/// A successful estimate together with the inputs the model actually saw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub price: f64,
    pub features: FeatureVector,
    pub aggregates: Aggregates,
}

/// Turns raw categorical inputs into a modal price estimate.
///
/// Holds only read-only shared state, so one instance can be cloned or shared
/// across threads freely.
#[derive(Clone)]
pub struct PredictionPipeline {
    encoders: Arc<EncoderSet>,
    dataset: Arc<ReferenceDataset>,
    model: Arc<dyn PriceModel>,
    metrics: Option<Metrics>,
}

impl PredictionPipeline {
    pub fn new(
        encoders: Arc<EncoderSet>,
        dataset: Arc<ReferenceDataset>,
        model: Arc<dyn PriceModel>,
    ) -> Self {
        Self {
            encoders,
            dataset,
            model,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn predict_price(
        &self,
        commodity: &str,
        state: &str,
        district: &str,
        market: &str,
    ) -> Result<Prediction, PredictionError> {
        self.predict(&PriceQuery::new(commodity, state, district, market))
    }

    /// Predict for a query; `PriceQuery` is normalized by construction.
    pub fn predict(&self, query: &PriceQuery) -> Result<Prediction, PredictionError> {
        let span = info_span!("predict", request_id = %Uuid::new_v4());
        let _enter = span.enter();
        let started = Instant::now();

        let result = self.run(query);

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(_) => "success",
                Err(PredictionError::UnknownCategory(_)) => "unknown_category",
                Err(PredictionError::ModelInvocation(_)) => "model_error",
            };
            metrics.inc_prediction(outcome);
            metrics.observe_latency(started.elapsed().as_secs_f64());
        }

        result
    }

    /// Independent predictions evaluated in parallel; results keep input order.
    pub fn predict_batch(&self, queries: &[PriceQuery]) -> Vec<Result<Prediction, PredictionError>> {
        queries.par_iter().map(|q| self.predict(q)).collect()
    }

    fn run(&self, query: &PriceQuery) -> Result<Prediction, PredictionError> {
        let codes = self.encoders.encode_query(query).inspect_err(|e| {
            debug!("Rejected query: {}", e);
        })?;

        // The dataset is matched on the normalized strings, not on the codes.
        let aggregates = self.dataset.lookup_aggregates(query);
        if let Some(metrics) = &self.metrics {
            metrics.inc_lookup(aggregates.tier.as_str());
        }

        let features = FeatureVector::assemble(codes, &aggregates);
        if !features.is_finite() {
            return Err(ModelInvocationError::new("feature vector contains non-finite prices").into());
        }

        let price = self.model.predict(&features).inspect_err(|e| {
            warn!("{} failed on {:?}: {}", self.model.name(), features, e);
        })?;
        if !price.is_finite() {
            warn!("{} returned {} for {:?}", self.model.name(), price, features);
            return Err(ModelInvocationError::new(format!(
                "model returned non-finite price {}",
                price
            ))
            .into());
        }

        debug!(
            price,
            tier = aggregates.tier.as_str(),
            "Predicted modal price"
        );

        Ok(Prediction {
            price,
            features,
            aggregates,
        })
    }
}
