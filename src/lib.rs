//! segmentlens: credit card customer segmentation lookup
//!
//! Loads a fitted standard scaler and pre-fitted K-Means models (K = 2, 3, 4)
//! from JSON artifacts, assigns a customer to a segment and describes it.

pub mod artifact;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod repository;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{FeatureVector, StandardScaler, FEATURE_NAMES};
pub use error::{ArtifactLoadError, InferenceError, PredictionError, ScalingError, SegmentError};
pub use model::{ClusterAssignment, ClusterModel};
pub use pipeline::{predict, ModelContext, Prediction};
pub use repository::{LoadedArtifacts, ModelRepository, ModelSpec, RepositoryConfig};

use tracing_subscriber::EnvFilter;

/// Common result type used by the application layer
pub type Result<T> = anyhow::Result<T>;

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` sets the filter (default `info`); `LOG_FORMAT=json` selects
/// JSON lines instead of human-readable output.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_default();

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))
}
