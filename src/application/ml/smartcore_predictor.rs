use super::predictor::PriceModel;
use crate::domain::errors::{ConfigurationError, ModelInvocationError};
use crate::domain::pricing::FeatureVector;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

const MODEL_ARTIFACT: &str = "model";

/// Random forest regressor persisted as smartcore's serde JSON representation.
pub struct RandomForestPriceModel {
    model: ForestModel,
    source: Option<PathBuf>,
}

impl RandomForestPriceModel {
    pub fn from_fitted(model: ForestModel) -> Self {
        Self {
            model,
            source: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        if !path.exists() {
            return Err(ConfigurationError::ArtifactMissing {
                kind: MODEL_ARTIFACT,
                path: path.to_path_buf(),
            });
        }

        let unreadable = |reason: String| ConfigurationError::ArtifactUnreadable {
            kind: MODEL_ARTIFACT,
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
        let model: ForestModel =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| unreadable(e.to_string()))?;

        info!("Loaded price model from {:?}", path);
        Ok(Self {
            model,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl PriceModel for RandomForestPriceModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelInvocationError> {
        let row = features.to_vec();
        let input = DenseMatrix::from_2d_vec(&vec![row])
            .map_err(|e| ModelInvocationError::new(format!("Matrix creation failed: {}", e)))?;

        let predictions = self
            .model
            .predict(&input)
            .map_err(|e| ModelInvocationError::new(format!("Prediction failed: {}", e)))?;

        match predictions.first() {
            Some(price) if price.is_finite() => Ok(*price),
            Some(price) => Err(ModelInvocationError::new(format!(
                "Model returned non-finite price {}",
                price
            ))),
            None => Err(ModelInvocationError::new("No prediction returned")),
        }
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    /// Small forest over the six-column layout: price tracks the min/max columns.
    fn fit_small_forest() -> ForestModel {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..24u32 {
            let min = 100.0 + f64::from(i) * 10.0;
            let max = min + 40.0;
            x.push(vec![
                f64::from(i % 3),
                f64::from(i % 2),
                f64::from(i % 4),
                f64::from(i % 5),
                min,
                max,
            ]);
            y.push((min + max) / 2.0);
        }
        let matrix = DenseMatrix::from_2d_vec(&x).unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(8)
            .with_max_depth(6)
            .with_min_samples_split(2);
        RandomForestRegressor::fit(&matrix, &y, params).unwrap()
    }

    fn sample_vector() -> FeatureVector {
        FeatureVector {
            commodity: 1,
            state: 0,
            district: 2,
            market: 3,
            min_price: 150.0,
            max_price: 190.0,
        }
    }

    #[test]
    fn test_forest_prediction_is_finite_and_deterministic() {
        let model = RandomForestPriceModel::from_fitted(fit_small_forest());
        let first = model.predict(&sample_vector()).unwrap();
        let second = model.predict(&sample_vector()).unwrap();
        assert!(first.is_finite());
        assert_eq!(first, second);
        assert!(model.source().is_none());
    }

    #[test]
    fn test_load_round_trip_from_json_artifact() {
        let fitted = fit_small_forest();
        let path = std::env::temp_dir().join(format!(
            "agriprice-model-{}.json",
            uuid::Uuid::new_v4()
        ));
        let file = File::create(&path).unwrap();
        serde_json::to_writer(file, &fitted).unwrap();

        let loaded = RandomForestPriceModel::load(&path).unwrap();
        let in_memory = RandomForestPriceModel::from_fitted(fitted);
        assert_eq!(
            loaded.predict(&sample_vector()).unwrap(),
            in_memory.predict(&sample_vector()).unwrap()
        );
        assert_eq!(loaded.source(), Some(path.as_path()));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_artifact() {
        let path = std::env::temp_dir().join("agriprice-no-such-model.json");
        let err = RandomForestPriceModel::load(&path).err().unwrap();
        assert!(matches!(err, ConfigurationError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_load_corrupt_artifact() {
        let path = std::env::temp_dir().join(format!(
            "agriprice-corrupt-{}.json",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, b"{ not a forest").unwrap();
        let err = RandomForestPriceModel::load(&path).err().unwrap();
        assert!(matches!(err, ConfigurationError::ArtifactUnreadable { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
