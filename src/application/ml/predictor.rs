use crate::domain::errors::ModelInvocationError;
use crate::domain::pricing::FeatureVector;

/// Interface for fitted price regression models.
///
/// Implementations must be deterministic and free of interior mutation so a single
/// instance can serve concurrent requests.
pub trait PriceModel: Send + Sync {
    /// Predict the modal price for one feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelInvocationError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
