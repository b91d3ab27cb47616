pub mod encoder;
pub mod pipeline;
pub mod reference_dataset;

pub use encoder::{CategoricalEncoder, EncoderSet, EncoderSetArtifact};
pub use pipeline::{Prediction, PredictionPipeline};
pub use reference_dataset::ReferenceDataset;
