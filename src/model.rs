//! Pre-fitted K-Means models used for segment assignment

use crate::artifact::{ensure_finite, read_artifact, write_artifact};
use crate::error::{ArtifactErrorKind, PredictionError};
use linfa_clustering::KMeans;
use linfa_nn::distance::{Distance, L2Dist};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cluster id assigned to one customer, in `[0, K)`
pub type ClusterAssignment = usize;

/// On-disk form of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelArtifact {
    n_clusters: usize,
    centroids: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inertia: Option<f64>,
}

/// Fitted K-Means partition: one centroid per cluster in scaled feature space
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterModel {
    n_clusters: usize,
    /// One row per cluster
    centroids: Array2<f64>,
    /// Within-cluster sum of squares on the training data, when known
    inertia: Option<f64>,
}

impl ClusterModel {
    /// Build a model from centroid rows
    pub fn new(centroids: Vec<Vec<f64>>, inertia: Option<f64>) -> Result<Self, ArtifactErrorKind> {
        let n_clusters = centroids.len();
        let n_features = centroids.first().map_or(0, Vec::len);
        if n_clusters == 0 || n_features == 0 {
            return Err(ArtifactErrorKind::Invalid(
                "model has no centroids".to_string(),
            ));
        }
        if let Some(idx) = centroids.iter().position(|row| row.len() != n_features) {
            return Err(ArtifactErrorKind::Invalid(format!(
                "centroid {idx} has {} values, expected {n_features}",
                centroids[idx].len()
            )));
        }

        let flat: Vec<f64> = centroids.into_iter().flatten().collect();
        ensure_finite("centroids", &flat)?;
        let centroids = Array2::from_shape_vec((n_clusters, n_features), flat)
            .map_err(|e| ArtifactErrorKind::Invalid(e.to_string()))?;

        Ok(Self {
            n_clusters,
            centroids,
            inertia,
        })
    }

    /// Take the centroids of a model fitted with linfa
    pub fn from_fitted(model: &KMeans<f64, L2Dist>) -> Self {
        let centroids = model.centroids().clone();
        Self {
            n_clusters: centroids.nrows(),
            centroids,
            inertia: None,
        }
    }

    /// Load a fitted model from a JSON artifact
    pub fn load(path: &Path) -> Result<Self, ArtifactErrorKind> {
        let artifact: ModelArtifact = read_artifact(path)?;
        if artifact.n_clusters != artifact.centroids.len() {
            return Err(ArtifactErrorKind::Invalid(format!(
                "n_clusters is {} but {} centroids are stored",
                artifact.n_clusters,
                artifact.centroids.len()
            )));
        }
        Self::new(artifact.centroids, artifact.inertia)
    }

    /// Write the model as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<(), ArtifactErrorKind> {
        let artifact = ModelArtifact {
            n_clusters: self.n_clusters,
            centroids: self.centroids.outer_iter().map(|row| row.to_vec()).collect(),
            inertia: self.inertia,
        };
        write_artifact(path, &artifact)
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    pub fn inertia(&self) -> Option<f64> {
        self.inertia
    }

    /// Width of the vectors this model was fitted on
    pub fn n_features(&self) -> usize {
        self.centroids.ncols()
    }

    /// Assign a scaled vector to its nearest centroid
    ///
    /// Ties go to the lowest cluster id.
    pub fn predict(&self, features: &Array1<f64>) -> Result<ClusterAssignment, PredictionError> {
        if self.centroids.nrows() == 0 {
            return Err(PredictionError::NoCentroids);
        }
        if features.len() != self.n_features() {
            return Err(PredictionError::DimensionMismatch {
                expected: self.n_features(),
                found: features.len(),
            });
        }

        let mut min_distance = f64::INFINITY;
        let mut closest_cluster = 0;

        for (cluster_idx, centroid) in self.centroids.outer_iter().enumerate() {
            let distance = L2Dist.rdistance(features.view(), centroid);
            if distance < min_distance {
                min_distance = distance;
                closest_cluster = cluster_idx;
            }
        }

        Ok(closest_cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    fn create_test_model() -> ClusterModel {
        ClusterModel::new(
            vec![
                vec![-1.0, -1.0, -1.0],
                vec![1.0, 1.0, 1.0],
                vec![-1.0, 1.0, -1.0],
            ],
            Some(12.5),
        )
        .unwrap()
    }

    #[test]
    fn test_predict_nearest_centroid() {
        let model = create_test_model();

        assert_eq!(model.predict(&array![-0.9, -1.2, -0.8]).unwrap(), 0);
        assert_eq!(model.predict(&array![0.7, 1.1, 0.9]).unwrap(), 1);
        assert_eq!(model.predict(&array![-1.0, 0.8, -1.1]).unwrap(), 2);
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let model = create_test_model();
        // equidistant from centroids 0 and 2
        assert_eq!(model.predict(&array![-1.0, 0.0, -1.0]).unwrap(), 0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = create_test_model();
        let result = model.predict(&array![0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            result,
            Err(PredictionError::DimensionMismatch {
                expected: 3,
                found: 5
            })
        );
    }

    #[test]
    fn test_empty_model_assigns_nothing() {
        let model = ClusterModel {
            n_clusters: 0,
            centroids: Array2::zeros((0, 5)),
            inertia: None,
        };
        let result = model.predict(&array![0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(result, Err(PredictionError::NoCentroids));
    }

    #[test]
    fn test_invalid_centroids() {
        assert!(ClusterModel::new(vec![], None).is_err());
        assert!(ClusterModel::new(vec![vec![]], None).is_err());
        assert!(ClusterModel::new(vec![vec![0.0, 1.0], vec![0.0]], None).is_err());
        assert!(ClusterModel::new(vec![vec![0.0, f64::INFINITY]], None).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kmeans_k3.json");
        let model = create_test_model();

        model.save(&path).unwrap();
        let loaded = ClusterModel::load(&path).unwrap();
        assert_eq!(loaded, model);
        assert_eq!(loaded.n_clusters(), 3);
        assert_eq!(loaded.inertia(), Some(12.5));
    }

    #[test]
    fn test_load_rejects_inconsistent_cluster_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kmeans_k4.json");
        std::fs::write(&path, r#"{"n_clusters": 4, "centroids": [[0.0], [1.0]]}"#).unwrap();

        let err = ClusterModel::load(&path).unwrap_err();
        assert!(matches!(err, ArtifactErrorKind::Invalid(_)));
    }
}
