//! Artifact location configuration parsing from environment variables.
//!
//! This module resolves where the reference dataset, the encoder set and the
//! trained model are read from at start-up.

use anyhow::{Result, bail};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATASET_PATH: &str = "data/agricrop.csv";
pub const DEFAULT_ENCODERS_PATH: &str = "data/label_encoders.json";
pub const DEFAULT_MODEL_PATH: &str = "data/best_model.json";

/// Artifact environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEnvConfig {
    pub dataset_path: PathBuf,
    pub encoders_path: PathBuf,
    pub model_path: PathBuf,
}

impl Default for ArtifactEnvConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            encoders_path: PathBuf::from(DEFAULT_ENCODERS_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ArtifactEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            dataset_path: path_var("DATASET_PATH", DEFAULT_DATASET_PATH)?,
            encoders_path: path_var("ENCODERS_PATH", DEFAULT_ENCODERS_PATH)?,
            model_path: path_var("MODEL_PATH", DEFAULT_MODEL_PATH)?,
        })
    }
}

fn path_var(key: &str, default: &str) -> Result<PathBuf> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    if value.trim().is_empty() {
        bail!("{} must not be empty", key);
    }
    Ok(PathBuf::from(value.trim()))
}
