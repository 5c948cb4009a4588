//! Error types for artifact loading and inference

use std::path::PathBuf;
use thiserror::Error;

/// Input feature vector does not match the schema the scaler was fitted on
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScalingError {
    /// A feature the scaler expects has no value
    #[error("missing value for feature '{0}'")]
    MissingFeature(String),

    /// The vector carries a value the scaler was not fitted on
    #[error("feature '{0}' was not seen when the scaler was fitted")]
    UnexpectedFeature(String),

    /// The scaler names a feature that customer records do not have
    #[error("scaler expects unknown feature '{0}'")]
    UnknownFeature(String),

    /// NaN or infinite input
    #[error("feature '{feature}' is not a finite number: {value}")]
    NonNumeric { feature: String, value: f64 },
}

/// Scaled vector cannot be assigned by the selected model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("scaled vector has {found} features but the model was fitted on {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("model has no centroids")]
    NoCentroids,
}

/// Failure of a single predict call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("error while scaling input: {0}")]
    Scaling(#[from] ScalingError),

    #[error("error while predicting segment: {0}")]
    Prediction(#[from] PredictionError),
}

/// Why an artifact could not be turned into a usable object
#[derive(Error, Debug)]
pub enum ArtifactErrorKind {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// A scaler or model artifact failed to load
#[derive(Error, Debug)]
#[error("failed to load {name} from {}: {kind}", path.display())]
pub struct ArtifactLoadError {
    /// Display name of the artifact ("scaler" or a model name)
    pub name: String,
    pub path: PathBuf,
    #[source]
    pub kind: ArtifactErrorKind,
}

impl ArtifactLoadError {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: ArtifactErrorKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }
}

/// Errors surfaced across the presentation boundary
#[derive(Error, Debug)]
pub enum SegmentError {
    /// No usable scaler; the application must not accept input
    #[error("scaler is unavailable, predictions cannot be served: {0}")]
    ScalerUnavailable(String),

    /// Every model artifact failed to load
    #[error("no clustering model could be loaded: {0}")]
    NoModels(String),

    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}
