//! Customer feature vectors and the fitted standard scaler

use crate::artifact::{ensure_finite, read_artifact, write_artifact};
use crate::error::{ArtifactErrorKind, ScalingError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column names used by the training data, in training order
pub const FEATURE_NAMES: [&str; 5] = [
    "Age",
    "Annual_Income",
    "Total_Spend_Last_Year",
    "Credit_Score",
    "CLV",
];

/// Attributes of one customer
///
/// Fields are optional so that records decoded from outside input keep
/// track of what was actually supplied. The scaler refuses to fill gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureVector {
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
    #[serde(rename = "Annual_Income", default)]
    pub annual_income: Option<f64>,
    #[serde(rename = "Total_Spend_Last_Year", default)]
    pub total_spend_last_year: Option<f64>,
    #[serde(rename = "Credit_Score", default)]
    pub credit_score: Option<f64>,
    #[serde(rename = "CLV", default)]
    pub clv: Option<f64>,
}

impl FeatureVector {
    /// Build a complete vector
    pub fn new(
        age: f64,
        annual_income: f64,
        total_spend_last_year: f64,
        credit_score: f64,
        clv: f64,
    ) -> Self {
        Self {
            age: Some(age),
            annual_income: Some(annual_income),
            total_spend_last_year: Some(total_spend_last_year),
            credit_score: Some(credit_score),
            clv: Some(clv),
        }
    }

    /// Look up a field by its column name
    pub fn get(&self, name: &str) -> Result<Option<f64>, ScalingError> {
        match name {
            "Age" => Ok(self.age),
            "Annual_Income" => Ok(self.annual_income),
            "Total_Spend_Last_Year" => Ok(self.total_spend_last_year),
            "Credit_Score" => Ok(self.credit_score),
            "CLV" => Ok(self.clv),
            other => Err(ScalingError::UnknownFeature(other.to_string())),
        }
    }

    /// Column names that carry a value
    pub fn present(&self) -> impl Iterator<Item = &'static str> + '_ {
        FEATURE_NAMES
            .into_iter()
            .filter(move |name| matches!(self.get(name), Ok(Some(_))))
    }
}

/// On-disk form of a fitted standard scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerArtifact {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Fitted standardization: `(x - mean) / scale` per feature
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    feature_names: Vec<String>,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Build a scaler from fitted parameters, checking they are usable
    pub fn new(
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, ArtifactErrorKind> {
        if feature_names.is_empty() {
            return Err(ArtifactErrorKind::Invalid(
                "scaler has no features".to_string(),
            ));
        }
        if mean.len() != feature_names.len() || scale.len() != feature_names.len() {
            return Err(ArtifactErrorKind::Invalid(format!(
                "scaler has {} feature names, {} means and {} scales",
                feature_names.len(),
                mean.len(),
                scale.len()
            )));
        }
        ensure_finite("mean", &mean)?;
        ensure_finite("scale", &scale)?;
        if let Some(idx) = scale.iter().position(|&s| s == 0.0) {
            return Err(ArtifactErrorKind::Invalid(format!("scale[{idx}] is zero")));
        }

        Ok(Self {
            feature_names,
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    /// Load a fitted scaler from a JSON artifact
    pub fn load(path: &Path) -> Result<Self, ArtifactErrorKind> {
        let artifact: ScalerArtifact = read_artifact(path)?;
        Self::new(artifact.feature_names, artifact.mean, artifact.scale)
    }

    /// Write the scaler as a JSON artifact
    pub fn save(&self, path: &Path) -> Result<(), ArtifactErrorKind> {
        let artifact = ScalerArtifact {
            feature_names: self.feature_names.clone(),
            mean: self.mean.to_vec(),
            scale: self.scale.to_vec(),
        };
        write_artifact(path, &artifact)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Scale one customer into the space the models were fitted in
    pub fn transform(&self, features: &FeatureVector) -> Result<Array1<f64>, ScalingError> {
        if let Some(extra) = features
            .present()
            .find(|name| !self.feature_names.iter().any(|n| n == name))
        {
            return Err(ScalingError::UnexpectedFeature(extra.to_string()));
        }

        let mut raw = Vec::with_capacity(self.n_features());
        for name in &self.feature_names {
            let value = features
                .get(name)?
                .ok_or_else(|| ScalingError::MissingFeature(name.clone()))?;
            if !value.is_finite() {
                return Err(ScalingError::NonNumeric {
                    feature: name.clone(),
                    value,
                });
            }
            raw.push(value);
        }

        let raw = Array1::from(raw);
        Ok((&raw - &self.mean) / &self.scale)
    }
}
