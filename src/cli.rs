//! Command-line interface definitions and argument parsing

use crate::catalog::{self, ModelOption};
use crate::data::FeatureVector;
use anyhow::Context;
use clap::Parser;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Credit card customer segmentation using pre-fitted K-Means models
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding scaler.json and the kmeans_k*.json models
    #[arg(short, long, env = "SEGMENTLENS_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Number of clusters of the model to use
    #[arg(short = 'k', long, default_value = "3", value_parser = clap::value_parser!(u8).range(2..=4))]
    pub clusters: u8,

    /// Customer age in years
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(18..=100))]
    pub age: u32,

    /// Annual income
    #[arg(long, default_value = "50000", value_parser = non_negative)]
    pub annual_income: f64,

    /// Total spend over the last year
    #[arg(long, default_value = "10000", value_parser = non_negative)]
    pub total_spend: f64,

    /// Credit score
    #[arg(long, default_value = "700", value_parser = clap::value_parser!(u32).range(300..=850))]
    pub credit_score: u32,

    /// Customer lifetime value
    #[arg(long, default_value = "2500", value_parser = non_negative)]
    pub clv: f64,

    /// Read the customer from a JSON object instead of the attribute flags
    /// Example: {"Age": 30, "Annual_Income": 50000, "Total_Spend_Last_Year": 10000, "Credit_Score": 700, "CLV": 2500}
    #[arg(long, value_name = "FILE")]
    pub input_json: Option<PathBuf>,

    /// List the offered models and exit
    #[arg(long)]
    pub list_models: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The offered model matching `--clusters`
    pub fn selected_model(&self) -> crate::Result<&'static ModelOption> {
        catalog::model_option_for_k(usize::from(self.clusters))
            .with_context(|| format!("no model is offered for {} clusters", self.clusters))
    }

    /// Customer attributes from the JSON file if given, otherwise from the flags
    pub fn feature_vector(&self) -> crate::Result<FeatureVector> {
        let features = self.read_features()?;
        check_ranges(&features)?;
        Ok(features)
    }

    fn read_features(&self) -> crate::Result<FeatureVector> {
        match &self.input_json {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                serde_json::from_str(&json)
                    .with_context(|| format!("{} is not a valid customer record", path.display()))
            }
            None => Ok(FeatureVector::new(
                f64::from(self.age),
                self.annual_income,
                self.total_spend,
                f64::from(self.credit_score),
                self.clv,
            )),
        }
    }
}

const AGE_RANGE: RangeInclusive<f64> = 18.0..=100.0;
const CREDIT_SCORE_RANGE: RangeInclusive<f64> = 300.0..=850.0;

/// Reject supplied attributes outside the accepted input ranges
///
/// Absent attributes pass; the scaler reports them.
pub fn check_ranges(features: &FeatureVector) -> crate::Result<()> {
    let bounded = [
        ("Age", features.age, AGE_RANGE),
        ("Credit_Score", features.credit_score, CREDIT_SCORE_RANGE),
    ];
    for (name, value, range) in bounded {
        if let Some(value) = value {
            if !range.contains(&value) {
                anyhow::bail!(
                    "{name} must be between {} and {}, got {value}",
                    range.start(),
                    range.end()
                );
            }
        }
    }

    let non_negative = [
        ("Annual_Income", features.annual_income),
        ("Total_Spend_Last_Year", features.total_spend_last_year),
        ("CLV", features.clv),
    ];
    for (name, value) in non_negative {
        if let Some(value) = value {
            if value.is_nan() || value < 0.0 {
                anyhow::bail!("{name} must be a non-negative number, got {value}");
            }
        }
    }
    Ok(())
}

fn non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("'{s}' must be a non-negative number"));
    }
    Ok(value)
}
