pub mod predictor;
pub mod smartcore_predictor;

pub use predictor::PriceModel;
pub use smartcore_predictor::RandomForestPriceModel;
