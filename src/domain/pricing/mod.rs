//! Price estimation domain: categorical fields, query normalization and the
//! values passed between the reference dataset, the encoders and the model.

pub mod types;

pub use types::{
    AggregateTier, Aggregates, CategoricalField, EncodedCategories, FeatureVector, PriceQuery,
    PriceRecord, normalize,
};
