use crate::domain::pricing::CategoricalField;
use std::path::PathBuf;
use thiserror::Error;

/// A single categorical value that is absent from its field's fitted vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} '{value}'")]
pub struct UnknownCategory {
    pub field: CategoricalField,
    pub value: String,
}

/// One or more request inputs fell outside the fitted vocabularies.
///
/// Carries every failing field of the request so the caller can point the user
/// at all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category: {}", describe(.unknown))]
pub struct UnknownCategoryError {
    pub unknown: Vec<UnknownCategory>,
}

fn describe(unknown: &[UnknownCategory]) -> String {
    unknown
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl UnknownCategoryError {
    pub fn fields(&self) -> Vec<CategoricalField> {
        self.unknown.iter().map(|u| u.field).collect()
    }

    pub fn contains(&self, field: CategoricalField) -> bool {
        self.unknown.iter().any(|u| u.field == field)
    }
}

impl From<UnknownCategory> for UnknownCategoryError {
    fn from(unknown: UnknownCategory) -> Self {
        Self {
            unknown: vec![unknown],
        }
    }
}

/// Fatal start-up errors: artifacts missing, unreadable or unusable.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{kind} artifact not found at {path:?}")]
    ArtifactMissing { kind: &'static str, path: PathBuf },

    #[error("Failed to read {kind} artifact at {path:?}: {reason}")]
    ArtifactUnreadable {
        kind: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Reference dataset {path:?} contains no usable price records")]
    EmptyDataset { path: PathBuf },

    #[error("Encoder for {field} has an empty vocabulary")]
    EmptyVocabulary { field: CategoricalField },

    #[error("Encoder set has no encoder for {field}")]
    MissingEncoder { field: CategoricalField },

    #[error("Encoder for {field} lists '{value}' more than once")]
    DuplicateCategory {
        field: CategoricalField,
        value: String,
    },
}

/// The regression model failed to produce a finite price.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Model invocation failed: {reason}")]
pub struct ModelInvocationError {
    pub reason: String,
}

impl ModelInvocationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Per-request rejection reasons of the prediction pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),

    #[error(transparent)]
    ModelInvocation(#[from] ModelInvocationError),
}

impl PredictionError {
    /// True when resubmitting with corrected inputs can succeed.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, PredictionError::UnknownCategory(_))
    }

    /// Message suitable for showing to the person who entered the query.
    pub fn user_message(&self) -> String {
        match self {
            PredictionError::UnknownCategory(e) => {
                let fields = e
                    .unknown
                    .iter()
                    .map(|u| format!("{} '{}'", u.field.label(), u.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "Invalid input: {} not recognised. Please check your entries.",
                    fields
                )
            }
            PredictionError::ModelInvocation(_) => {
                "Sorry, the price could not be estimated right now. Please try again later."
                    .to_string()
            }
        }
    }
}
