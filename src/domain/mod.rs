// Price estimation domain
pub mod pricing;

// Model feature layout
pub mod ml;

// Domain-specific error types
pub mod errors;
