#![allow(dead_code)]

use agriprice::application::ml::PriceModel;
use agriprice::application::pricing::{CategoricalEncoder, EncoderSet, ReferenceDataset};
use agriprice::domain::errors::ModelInvocationError;
use agriprice::domain::pricing::{CategoricalField, FeatureVector, PriceRecord};

/// Deterministic stand-in model: weighted sum of every feature.
pub struct LinearStubModel;

impl PriceModel for LinearStubModel {
    fn predict(&self, f: &FeatureVector) -> Result<f64, ModelInvocationError> {
        Ok(0.6 * f.min_price + 0.4 * f.max_price
            + f64::from(f.commodity)
            + f64::from(f.state) * 0.1
            + f64::from(f.district) * 0.01
            + f64::from(f.market) * 0.001)
    }

    fn name(&self) -> &str {
        "linear-stub"
    }

    fn version(&self) -> &str {
        "test"
    }
}

pub fn record(c: &str, s: &str, d: &str, m: &str, min: f64, max: f64, modal: f64) -> PriceRecord {
    PriceRecord {
        commodity: c.to_string(),
        state: s.to_string(),
        district: d.to_string(),
        market: m.to_string(),
        min_price: Some(min),
        max_price: Some(max),
        modal_price: Some(modal),
    }
}

pub fn sample_records() -> Vec<PriceRecord> {
    vec![
        record("Wheat", "Punjab", "Ludhiana", "Ludhiana_Mandi", 10.0, 20.0, 15.0),
        record("Wheat", "Punjab", "Ludhiana", "Ludhiana_Mandi", 14.0, 26.0, 21.0),
        record("Rice", "Kerala", "Kochi", "Ernakulam", 30.0, 50.0, 42.0),
        record("Onion", "Maharashtra", "Nashik", "Lasalgaon", 8.0, 16.0, 12.0),
        record("Rice", "Punjab", "Amritsar", "Amritsar_Mandi", 25.0, 35.0, 31.0),
    ]
}

/// Encoders fitted on the full vocabulary of the records, as the training job does.
pub fn fit_encoders(records: &[PriceRecord]) -> EncoderSet {
    let column = |field: CategoricalField| -> Vec<&str> {
        records
            .iter()
            .map(|r| match field {
                CategoricalField::Commodity => r.commodity.as_str(),
                CategoricalField::State => r.state.as_str(),
                CategoricalField::District => r.district.as_str(),
                CategoricalField::Market => r.market.as_str(),
            })
            .collect()
    };

    EncoderSet::new(
        CategoricalField::ALL
            .into_iter()
            .map(|field| CategoricalEncoder::fit(field, column(field)).unwrap())
            .collect(),
    )
    .unwrap()
}

pub fn sample_dataset() -> ReferenceDataset {
    ReferenceDataset::new(sample_records(), "memory").unwrap()
}
