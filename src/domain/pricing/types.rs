use serde::{Deserialize, Serialize};
use std::fmt;

/// Trim surrounding whitespace and lowercase.
///
/// Applied identically to stored reference records and to request inputs so the
/// two always compare case- and whitespace-insensitively.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The four categorical inputs of a price query, in feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Commodity,
    State,
    District,
    Market,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::Commodity,
        CategoricalField::State,
        CategoricalField::District,
        CategoricalField::Market,
    ];

    /// Column name in the tabular source data and in the encoder artifact.
    pub fn column_name(&self) -> &'static str {
        match self {
            CategoricalField::Commodity => "commodity_name",
            CategoricalField::State => "state",
            CategoricalField::District => "district",
            CategoricalField::Market => "market",
        }
    }

    /// Human-facing name, used in user messages.
    pub fn label(&self) -> &'static str {
        match self {
            CategoricalField::Commodity => "commodity",
            CategoricalField::State => "state",
            CategoricalField::District => "district",
            CategoricalField::Market => "market",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Wire form of a query, normalized on conversion.
#[derive(Debug, Clone, Deserialize)]
struct RawPriceQuery {
    #[serde(alias = "commodity_name")]
    commodity: String,
    state: String,
    district: String,
    market: String,
}

impl From<RawPriceQuery> for PriceQuery {
    fn from(raw: RawPriceQuery) -> Self {
        PriceQuery::new(&raw.commodity, &raw.state, &raw.district, &raw.market)
    }
}

/// A request's categorical inputs, normalized at construction.
///
/// Fields are private so every instance, deserialized ones included, is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPriceQuery")]
pub struct PriceQuery {
    commodity: String,
    state: String,
    district: String,
    market: String,
}

impl PriceQuery {
    pub fn new(commodity: &str, state: &str, district: &str, market: &str) -> Self {
        Self {
            commodity: normalize(commodity),
            state: normalize(state),
            district: normalize(district),
            market: normalize(market),
        }
    }

    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub fn value(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Commodity => &self.commodity,
            CategoricalField::State => &self.state,
            CategoricalField::District => &self.district,
            CategoricalField::Market => &self.market,
        }
    }
}

/// One historical observation of the reference dataset.
///
/// A blank price is `None` and is left out of that column's mean only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "commodity_name")]
    pub commodity: String,
    pub state: String,
    pub district: String,
    pub market: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub modal_price: Option<f64>,
}

impl PriceRecord {
    /// Returns the record with its categorical fields normalized.
    pub fn normalized(self) -> Self {
        Self {
            commodity: normalize(&self.commodity),
            state: normalize(&self.state),
            district: normalize(&self.district),
            market: normalize(&self.market),
            ..self
        }
    }

    pub fn matches(&self, query: &PriceQuery) -> bool {
        self.commodity == query.commodity
            && self.state == query.state
            && self.district == query.district
            && self.market == query.market
    }
}

/// Which tier of the fallback policy produced a pair of aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregateTier {
    /// Means over the records matching all four categories.
    ExactMatch { matched: usize },
    /// Means over the entire reference dataset.
    GlobalFallback,
}

impl AggregateTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateTier::ExactMatch { .. } => "exact_match",
            AggregateTier::GlobalFallback => "global_fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregates {
    pub avg_min_price: f64,
    pub avg_max_price: f64,
    pub tier: AggregateTier,
}

/// Integer codes of the four categorical inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodedCategories {
    pub commodity: u32,
    pub state: u32,
    pub district: u32,
    pub market: u32,
}

/// Model input. Field order is a contract with the trained model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub commodity: u32,
    pub state: u32,
    pub district: u32,
    pub market: u32,
    pub min_price: f64,
    pub max_price: f64,
}

impl FeatureVector {
    pub fn assemble(codes: EncodedCategories, aggregates: &Aggregates) -> Self {
        Self {
            commodity: codes.commodity,
            state: codes.state,
            district: codes.district,
            market: codes.market,
            min_price: aggregates.avg_min_price,
            max_price: aggregates.avg_max_price,
        }
    }

    /// Positional row in `FEATURE_NAMES` order, as the model consumes it.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.commodity as f64,
            self.state as f64,
            self.district as f64,
            self.market as f64,
            self.min_price,
            self.max_price,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.min_price.is_finite() && self.max_price.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Wheat\t"), "wheat");
        assert_eq!(normalize("LUDHIANA_Mandi"), "ludhiana_mandi");
        assert_eq!(normalize("navi mumbai"), "navi mumbai");
    }

    #[test]
    fn test_query_is_normalized() {
        let q = PriceQuery::new(" Wheat", "PUNJAB ", "Ludhiana", " ludhiana_MANDI ");
        assert_eq!(q.value(CategoricalField::Commodity), "wheat");
        assert_eq!(q.value(CategoricalField::State), "punjab");
        assert_eq!(q.value(CategoricalField::District), "ludhiana");
        assert_eq!(q.value(CategoricalField::Market), "ludhiana_mandi");
    }

    #[test]
    fn test_column_names_round_trip() {
        for field in CategoricalField::ALL {
            assert_eq!(
                CategoricalField::from_column_name(field.column_name()),
                Some(field)
            );
        }
        assert_eq!(CategoricalField::from_column_name("modal_price"), None);
    }

    #[test]
    fn test_feature_vector_order() {
        let codes = EncodedCategories {
            commodity: 3,
            state: 1,
            district: 4,
            market: 2,
        };
        let aggregates = Aggregates {
            avg_min_price: 12.0,
            avg_max_price: 23.0,
            tier: AggregateTier::GlobalFallback,
        };
        let fv = FeatureVector::assemble(codes, &aggregates);
        assert_eq!(fv.to_vec(), vec![3.0, 1.0, 4.0, 2.0, 12.0, 23.0]);
        assert!(fv.is_finite());
    }

    #[test]
    fn test_record_matches_after_normalization() {
        let record = PriceRecord {
            commodity: "Wheat ".to_string(),
            state: "Punjab".to_string(),
            district: "LUDHIANA".to_string(),
            market: "Ludhiana_Mandi".to_string(),
            min_price: Some(10.0),
            max_price: Some(20.0),
            modal_price: Some(15.0),
        }
        .normalized();
        let query = PriceQuery::new("wheat", "punjab", "ludhiana", "ludhiana_mandi");
        assert!(record.matches(&query));
    }

    #[test]
    fn test_deserialized_query_is_normalized() {
        let q: PriceQuery = serde_json::from_str(
            r#"{"commodity": " WHEAT ", "state": "Punjab", "district": "LUDHIANA", "market": "Ludhiana_Mandi"}"#,
        )
        .unwrap();
        assert_eq!(q, PriceQuery::new("wheat", "punjab", "ludhiana", "ludhiana_mandi"));
        assert_eq!(q.commodity(), "wheat");
    }
}
