//! Loads the scaler and the offered models once and hands out the cached set

use crate::catalog::{MODEL_OPTIONS, SCALER_FILE};
use crate::data::StandardScaler;
use crate::error::{ArtifactErrorKind, ArtifactLoadError};
use crate::model::ClusterModel;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info};

/// Artifact expected for one selectable model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub file: String,
    pub n_clusters: usize,
}

/// Where the artifacts live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub artifact_dir: PathBuf,
    pub scaler_file: String,
    pub models: Vec<ModelSpec>,
}

impl RepositoryConfig {
    /// Standard artifact names inside `artifact_dir`
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            scaler_file: SCALER_FILE.to_string(),
            models: MODEL_OPTIONS
                .iter()
                .map(|option| ModelSpec {
                    name: option.name.to_string(),
                    file: option.file.to_string(),
                    n_clusters: option.n_clusters,
                })
                .collect(),
        }
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.scaler_file)
    }

    pub fn model_path(&self, spec: &ModelSpec) -> PathBuf {
        self.artifact_dir.join(&spec.file)
    }
}

/// Everything one load produced, including what failed
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub models: BTreeMap<String, ClusterModel>,
    pub scaler: Option<StandardScaler>,
    pub failures: Vec<ArtifactLoadError>,
}

impl LoadedArtifacts {
    /// Messages of the recorded failures for `name`, or of every model failure
    /// when `name` is `None`
    pub fn failure_messages(&self, name: Option<&str>) -> String {
        self.failures
            .iter()
            .filter(|failure| match name {
                Some(name) => failure.name == name,
                None => failure.name != "scaler",
            })
            .map(|failure| failure.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Cache of deserialized artifacts
///
/// The first [`ModelRepository::load`] reads storage; every later call, from
/// any thread, returns the same `Arc` without touching the files again.
#[derive(Debug)]
pub struct ModelRepository {
    config: RepositoryConfig,
    loaded: OnceLock<Arc<LoadedArtifacts>>,
}

impl ModelRepository {
    pub fn new(config: RepositoryConfig) -> Self {
        Self {
            config,
            loaded: OnceLock::new(),
        }
    }

    /// Load the scaler and models, or return the cached result
    pub fn load(&self) -> Arc<LoadedArtifacts> {
        self.loaded
            .get_or_init(|| Arc::new(load_artifacts(&self.config)))
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

fn load_artifacts(config: &RepositoryConfig) -> LoadedArtifacts {
    info!(dir = %config.artifact_dir.display(), "loading artifacts");

    let mut models = BTreeMap::new();
    let mut failures = Vec::new();

    for spec in &config.models {
        let path = config.model_path(spec);
        match load_model(spec, &path) {
            Ok(model) => {
                debug!(model = %spec.name, path = %path.display(), "model loaded");
                models.insert(spec.name.clone(), model);
            }
            Err(kind) => {
                let err = ArtifactLoadError::new(spec.name.as_str(), path, kind);
                error!(error = %err, "model unavailable");
                failures.push(err);
            }
        }
    }

    let path = config.scaler_path();
    let scaler = match StandardScaler::load(&path) {
        Ok(scaler) => {
            debug!(path = %path.display(), features = scaler.n_features(), "scaler loaded");
            Some(scaler)
        }
        Err(kind) => {
            let err = ArtifactLoadError::new("scaler", path, kind);
            error!(error = %err, "scaler unavailable");
            failures.push(err);
            None
        }
    };

    info!(
        models = models.len(),
        scaler = scaler.is_some(),
        failures = failures.len(),
        "artifacts loaded"
    );

    LoadedArtifacts {
        models,
        scaler,
        failures,
    }
}

fn load_model(spec: &ModelSpec, path: &Path) -> Result<ClusterModel, ArtifactErrorKind> {
    let model = ClusterModel::load(path)?;
    if model.n_clusters() != spec.n_clusters {
        return Err(ArtifactErrorKind::Invalid(format!(
            "expected {} clusters, artifact has {}",
            spec.n_clusters,
            model.n_clusters()
        )));
    }
    Ok(model)
}
