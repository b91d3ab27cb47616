//! Categorical encoders: fitted vocabularies mapping normalized values to
//! stable integer codes, one per categorical field.

use crate::domain::errors::{ConfigurationError, UnknownCategory, UnknownCategoryError};
use crate::domain::pricing::{CategoricalField, EncodedCategories, PriceQuery, normalize};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Label encoder for one categorical field.
///
/// Codes are indices into `classes`, which is kept in ascending order when fitted
/// here. Restored encoders keep whatever order the artifact lists.
#[derive(Debug, Clone)]
pub struct CategoricalEncoder {
    field: CategoricalField,
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl CategoricalEncoder {
    /// Fit on every observed value of the field: distinct normalized values, sorted.
    pub fn fit<I, S>(field: CategoricalField, values: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|v| normalize(v.as_ref()))
            .collect();
        Self::from_classes(field, classes.into_iter().collect())
    }

    /// Restore a fitted encoder from its classes, listed in code order.
    pub fn from_classes(
        field: CategoricalField,
        classes: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        if classes.is_empty() {
            return Err(ConfigurationError::EmptyVocabulary { field });
        }

        let classes: Vec<String> = classes.iter().map(|c| normalize(c)).collect();
        let mut index = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if index.insert(class.clone(), code as u32).is_some() {
                return Err(ConfigurationError::DuplicateCategory {
                    field,
                    value: class.clone(),
                });
            }
        }

        Ok(Self {
            field,
            classes,
            index,
        })
    }

    pub fn field(&self) -> CategoricalField {
        self.field
    }

    /// Code of a normalized value. Values outside the vocabulary are rejected.
    pub fn encode(&self, value: &str) -> Result<u32, UnknownCategory> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| UnknownCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// On-disk form: column name to classes in code order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSetArtifact(pub BTreeMap<String, Vec<String>>);

/// One encoder per categorical field, immutable once built.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    commodity: CategoricalEncoder,
    state: CategoricalEncoder,
    district: CategoricalEncoder,
    market: CategoricalEncoder,
}

impl EncoderSet {
    pub fn new(encoders: Vec<CategoricalEncoder>) -> Result<Self, ConfigurationError> {
        let mut by_field: HashMap<CategoricalField, CategoricalEncoder> =
            encoders.into_iter().map(|e| (e.field(), e)).collect();
        let mut take = |field: CategoricalField| {
            by_field
                .remove(&field)
                .ok_or(ConfigurationError::MissingEncoder { field })
        };

        Ok(Self {
            commodity: take(CategoricalField::Commodity)?,
            state: take(CategoricalField::State)?,
            district: take(CategoricalField::District)?,
            market: take(CategoricalField::Market)?,
        })
    }

    pub fn from_artifact(artifact: EncoderSetArtifact) -> Result<Self, ConfigurationError> {
        let mut columns = artifact.0;
        let encoders = CategoricalField::ALL
            .into_iter()
            .map(|field| {
                let classes = columns
                    .remove(field.column_name())
                    .ok_or(ConfigurationError::MissingEncoder { field })?;
                CategoricalEncoder::from_classes(field, classes)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(encoders)
    }

    pub fn to_artifact(&self) -> EncoderSetArtifact {
        EncoderSetArtifact(
            CategoricalField::ALL
                .into_iter()
                .map(|f| (f.column_name().to_string(), self.get(f).classes().to_vec()))
                .collect(),
        )
    }

    pub fn get(&self, field: CategoricalField) -> &CategoricalEncoder {
        match field {
            CategoricalField::Commodity => &self.commodity,
            CategoricalField::State => &self.state,
            CategoricalField::District => &self.district,
            CategoricalField::Market => &self.market,
        }
    }

    pub fn encode(&self, field: CategoricalField, value: &str) -> Result<u32, UnknownCategory> {
        self.get(field).encode(value)
    }

    /// Encode all four fields of a query. Every unknown field is reported, not just the first.
    pub fn encode_query(&self, query: &PriceQuery) -> Result<EncodedCategories, UnknownCategoryError> {
        let mut codes = [0u32; 4];
        let mut unknown = Vec::new();

        for (slot, field) in codes.iter_mut().zip(CategoricalField::ALL) {
            match self.encode(field, query.value(field)) {
                Ok(code) => *slot = code,
                Err(e) => unknown.push(e),
            }
        }

        if !unknown.is_empty() {
            return Err(UnknownCategoryError { unknown });
        }

        let [commodity, state, district, market] = codes;
        Ok(EncodedCategories {
            commodity,
            state,
            district,
            market,
        })
    }
}
