//! Loading of the three start-up artifacts: reference dataset (CSV), encoder
//! set (JSON) and regression model (smartcore JSON).

use crate::application::ml::RandomForestPriceModel;
use crate::application::pricing::{EncoderSet, EncoderSetArtifact, ReferenceDataset};
use crate::domain::errors::ConfigurationError;
use crate::domain::pricing::PriceRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

const DATASET_ARTIFACT: &str = "reference dataset";
const ENCODER_ARTIFACT: &str = "encoder set";

/// Raw CSV row. Prices may be blank in the source data.
#[derive(Debug, Deserialize)]
struct DatasetRow {
    commodity_name: String,
    state: String,
    district: String,
    market: String,
    min_price: Option<f64>,
    max_price: Option<f64>,
    modal_price: Option<f64>,
}

impl DatasetRow {
    /// `None` when neither price is usable; a single unusable price becomes blank.
    fn into_record(self) -> Option<PriceRecord> {
        let usable = |p: Option<f64>| p.filter(|v| v.is_finite() && *v >= 0.0);
        let (min_price, max_price) = (usable(self.min_price), usable(self.max_price));
        if min_price.is_none() && max_price.is_none() {
            return None;
        }
        Some(PriceRecord {
            commodity: self.commodity_name,
            state: self.state,
            district: self.district,
            market: self.market,
            min_price,
            max_price,
            modal_price: self.modal_price,
        })
    }
}

fn ensure_exists(kind: &'static str, path: &Path) -> Result<(), ConfigurationError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigurationError::ArtifactMissing {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn unreadable(kind: &'static str, path: &Path, reason: impl ToString) -> ConfigurationError {
    ConfigurationError::ArtifactUnreadable {
        kind,
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Load the historical price table. Rows with neither a usable min nor max price are skipped.
pub fn load_reference_dataset(path: &Path) -> Result<ReferenceDataset, ConfigurationError> {
    ensure_exists(DATASET_ARTIFACT, path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| unreadable(DATASET_ARTIFACT, path, e))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.deserialize() {
        let row: DatasetRow = result.map_err(|e| unreadable(DATASET_ARTIFACT, path, e))?;
        match row.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "Skipped {} rows without any usable price in {:?}",
            skipped, path
        );
    }

    let dataset = ReferenceDataset::new(records, path)?;
    info!("Loaded {} reference price records from {:?}", dataset.len(), path);
    Ok(dataset)
}

/// Load the fitted encoders: a JSON object of column name to classes in code order.
pub fn load_encoder_set(path: &Path) -> Result<EncoderSet, ConfigurationError> {
    ensure_exists(ENCODER_ARTIFACT, path)?;

    let file = File::open(path).map_err(|e| unreadable(ENCODER_ARTIFACT, path, e))?;
    let artifact: EncoderSetArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| unreadable(ENCODER_ARTIFACT, path, e))?;

    let encoders = EncoderSet::from_artifact(artifact)?;
    info!("Loaded encoder set from {:?}", path);
    Ok(encoders)
}

pub fn load_model(path: &Path) -> Result<RandomForestPriceModel, ConfigurationError> {
    RandomForestPriceModel::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::{AggregateTier, CategoricalField, PriceQuery};
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("agriprice-{}-{}", uuid::Uuid::new_v4(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_dataset_normalizes_and_skips_blank_rows() {
        let path = temp_file(
            "agricrop.csv",
            "commodity_name,state,district,market,min_price,max_price,modal_price\n\
             Wheat,Punjab,Ludhiana,Ludhiana_Mandi,10,20,15\n\
             wheat,punjab,ludhiana,ludhiana_mandi,14,26,\n\
             Rice,Kerala,Kochi,Ernakulam,,,40\n",
        );

        let ds = load_reference_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let agg = ds.lookup_aggregates(&PriceQuery::new(
            "wheat",
            "punjab",
            "ludhiana",
            "ludhiana_mandi",
        ));
        assert_eq!(agg.tier, AggregateTier::ExactMatch { matched: 2 });
        assert!((agg.avg_min_price - 12.0).abs() < 1e-9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_blank_min_still_counts_toward_max_mean() {
        let path = temp_file(
            "partial.csv",
            "commodity_name,state,district,market,min_price,max_price,modal_price\n\
             Wheat,Punjab,Ludhiana,Ludhiana_Mandi,10,20,15\n\
             Rice,Kerala,Kochi,Ernakulam,,50,40\n",
        );

        let ds = load_reference_dataset(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let global = ds.global_aggregates();
        assert!((global.avg_min_price - 10.0).abs() < 1e-9);
        assert!((global.avg_max_price - 35.0).abs() < 1e-9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_dataset_with_only_unusable_rows_is_empty() {
        let path = temp_file(
            "blank.csv",
            "commodity_name,state,district,market,min_price,max_price,modal_price\n\
             Rice,Kerala,Kochi,Ernakulam,,,\n",
        );
        let err = load_reference_dataset(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyDataset { .. }));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_reference_dataset(Path::new("/nonexistent/agricrop.csv")).unwrap_err();
        assert!(matches!(err, ConfigurationError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_load_encoder_set() {
        let path = temp_file(
            "encoders.json",
            r#"{
                "commodity_name": ["onion", "rice", "wheat"],
                "state": ["kerala", "punjab"],
                "district": ["kochi", "ludhiana"],
                "market": ["ernakulam", "ludhiana_mandi"]
            }"#,
        );
        let set = load_encoder_set(&path).unwrap();
        assert_eq!(set.encode(CategoricalField::Commodity, "wheat"), Ok(2));
        assert_eq!(set.encode(CategoricalField::Market, "ernakulam"), Ok(0));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_encoder_set_missing_field() {
        let path = temp_file(
            "partial.json",
            r#"{ "commodity_name": ["wheat"], "state": ["punjab"], "district": ["ludhiana"] }"#,
        );
        let err = load_encoder_set(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingEncoder {
                field: CategoricalField::Market
            }
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_encoder_set_malformed() {
        let path = temp_file("bad.json", "[1, 2, 3]");
        let err = load_encoder_set(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::ArtifactUnreadable { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
