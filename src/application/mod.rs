// Regression model seam and implementations
pub mod ml;

// Encoding, fallback aggregates and the prediction pipeline
pub mod pricing;

// Start-up wiring
pub mod system;
