//! Configuration module for agriprice.
//!
//! Configuration is loaded from environment variables (a `.env` file is honoured
//! by the binaries), organized by concern: Artifacts and Observability.

mod artifact_config;
mod observability_config;

pub use artifact_config::{
    ArtifactEnvConfig, DEFAULT_DATASET_PATH, DEFAULT_ENCODERS_PATH, DEFAULT_MODEL_PATH,
};
pub use observability_config::ObservabilityEnvConfig;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Artifacts (from ArtifactEnvConfig)
    pub dataset_path: PathBuf,
    pub encoders_path: PathBuf,
    pub model_path: PathBuf,

    // Observability (from ObservabilityEnvConfig)
    pub observability_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        let artifacts = ArtifactEnvConfig::default();
        Self {
            dataset_path: artifacts.dataset_path,
            encoders_path: artifacts.encoders_path,
            model_path: artifacts.model_path,
            observability_enabled: ObservabilityEnvConfig::default().enabled,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let artifacts = ArtifactEnvConfig::from_env().context("Failed to load artifact config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            dataset_path: artifacts.dataset_path,
            encoders_path: artifacts.encoders_path,
            model_path: artifacts.model_path,
            observability_enabled: observability.enabled,
        })
    }
}
