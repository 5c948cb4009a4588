//! Scaling and segment assignment for one customer

use crate::catalog::{self, ProfileEntry};
use crate::data::{FeatureVector, StandardScaler};
use crate::error::{InferenceError, SegmentError};
use crate::model::{ClusterAssignment, ClusterModel};
use crate::repository::LoadedArtifacts;
use std::collections::BTreeMap;
use tracing::debug;

/// Scale a customer and assign it to a cluster of `model`
///
/// The scaled vector is computed fresh on every call.
pub fn predict(
    features: &FeatureVector,
    scaler: &StandardScaler,
    model: &ClusterModel,
) -> Result<ClusterAssignment, InferenceError> {
    let scaled = scaler.transform(features)?;
    let cluster = model.predict(&scaled)?;
    Ok(cluster)
}

/// Outcome of a prediction with its segment description
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub model: String,
    pub cluster: ClusterAssignment,
    /// `None` if the catalog has no entry for this segment
    pub profile: Option<&'static ProfileEntry>,
}

/// Immutable scaler and model set that predictions run against
///
/// Building one requires a scaler and at least one model, so a context that
/// exists can always serve predictions.
#[derive(Debug, Clone)]
pub struct ModelContext {
    scaler: StandardScaler,
    models: BTreeMap<String, ClusterModel>,
}

impl ModelContext {
    pub fn new(
        scaler: StandardScaler,
        models: BTreeMap<String, ClusterModel>,
    ) -> Result<Self, SegmentError> {
        if models.is_empty() {
            return Err(SegmentError::NoModels("no models were supplied".to_string()));
        }
        Ok(Self { scaler, models })
    }

    /// Build from a repository load, refusing when the scaler or every model is missing
    pub fn from_loaded(loaded: &LoadedArtifacts) -> Result<Self, SegmentError> {
        let scaler = loaded.scaler.clone().ok_or_else(|| {
            SegmentError::ScalerUnavailable(loaded.failure_messages(Some("scaler")))
        })?;
        if loaded.models.is_empty() {
            return Err(SegmentError::NoModels(loaded.failure_messages(None)));
        }
        Self::new(scaler, loaded.models.clone())
    }

    pub fn model(&self, name: &str) -> Result<&ClusterModel, SegmentError> {
        self.models
            .get(name)
            .ok_or_else(|| SegmentError::UnknownModel(name.to_string()))
    }

    /// Run the pipeline with the named model and attach the segment profile
    pub fn predict(&self, model_name: &str, features: &FeatureVector) -> Result<Prediction, SegmentError> {
        let model = self.model(model_name)?;
        let cluster = predict(features, &self.scaler, model)?;
        debug!(model = model_name, cluster, "segment predicted");

        Ok(Prediction {
            model: model_name.to_string(),
            cluster,
            profile: catalog::profile(model_name, cluster),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FEATURE_NAMES;
    use crate::error::{PredictionError, ScalingError};

    fn create_test_scaler() -> StandardScaler {
        StandardScaler::new(
            FEATURE_NAMES.map(String::from).to_vec(),
            vec![45.0, 75_000.0, 25_000.0, 650.0, 5_000.0],
            vec![15.0, 25_000.0, 12_000.0, 90.0, 3_000.0],
        )
        .unwrap()
    }

    fn create_test_context() -> ModelContext {
        let mut models = BTreeMap::new();
        models.insert(
            "K-Means (2 clusters)".to_string(),
            ClusterModel::new(vec![vec![1.0; 5], vec![-1.0; 5]], None).unwrap(),
        );
        models.insert(
            "K-Means (4 clusters)".to_string(),
            ClusterModel::new(
                vec![vec![-2.0; 5], vec![2.0; 5], vec![0.5; 5], vec![-0.5; 5]],
                None,
            )
            .unwrap(),
        );
        ModelContext::new(create_test_scaler(), models).unwrap()
    }

    fn sample_customer() -> FeatureVector {
        FeatureVector::new(30.0, 50_000.0, 10_000.0, 700.0, 2_500.0)
    }

    #[test]
    fn test_predict_is_deterministic() {
        let context = create_test_context();
        let first = context.predict("K-Means (4 clusters)", &sample_customer()).unwrap();
        for _ in 0..10 {
            let again = context.predict("K-Means (4 clusters)", &sample_customer()).unwrap();
            assert_eq!(again, first);
        }
        assert!(first.cluster < 4);
        assert!(first.profile.is_some());
    }

    #[test]
    fn test_models_are_independent() {
        let context = create_test_context();
        let customer = sample_customer();

        let k2 = context.predict("K-Means (2 clusters)", &customer).unwrap();
        let k4 = context.predict("K-Means (4 clusters)", &customer).unwrap();
        assert_eq!(k2.cluster, 1);
        assert_eq!(k4.cluster, 3);

        // order of calls does not matter
        assert_eq!(context.predict("K-Means (2 clusters)", &customer).unwrap(), k2);
    }

    #[test]
    fn test_missing_clv_raises_scaling_error() {
        let context = create_test_context();
        let customer = FeatureVector {
            clv: None,
            ..sample_customer()
        };

        let err = context.predict("K-Means (2 clusters)", &customer).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::Inference(InferenceError::Scaling(ScalingError::MissingFeature(ref f))) if f == "CLV"
        ));
    }

    #[test]
    fn test_width_mismatch_raises_prediction_error() {
        let model = ClusterModel::new(vec![vec![0.0; 3], vec![1.0; 3]], None).unwrap();
        let err = predict(&sample_customer(), &create_test_scaler(), &model).unwrap_err();
        assert_eq!(
            err,
            InferenceError::Prediction(PredictionError::DimensionMismatch {
                expected: 3,
                found: 5
            })
        );
    }

    #[test]
    fn test_unknown_model() {
        let context = create_test_context();
        let err = context.predict("K-Means (3 clusters)", &sample_customer()).unwrap_err();
        assert!(matches!(err, SegmentError::UnknownModel(_)));
    }

    #[test]
    fn test_context_requires_scaler_and_models() {
        let loaded = LoadedArtifacts {
            models: BTreeMap::new(),
            scaler: Some(create_test_scaler()),
            failures: Vec::new(),
        };
        assert!(matches!(
            ModelContext::from_loaded(&loaded),
            Err(SegmentError::NoModels(_))
        ));

        let mut models = BTreeMap::new();
        models.insert(
            "K-Means (2 clusters)".to_string(),
            ClusterModel::new(vec![vec![0.0; 5], vec![1.0; 5]], None).unwrap(),
        );
        let loaded = LoadedArtifacts {
            models,
            scaler: None,
            failures: Vec::new(),
        };
        assert!(matches!(
            ModelContext::from_loaded(&loaded),
            Err(SegmentError::ScalerUnavailable(_))
        ));
    }
}
