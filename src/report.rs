//! Plain-text rendering of model choices and prediction results

use crate::catalog::{self, ModelOption, CAPTION};
use crate::pipeline::Prediction;

const RULE: &str = "────────────────────────────────────────";

/// Selected model with its summary blurb
pub fn render_model_summary(option: &ModelOption) -> String {
    format!("Model: {}\n  {}\n", option.name, option.summary)
}

/// All offered models, marking the ones that failed to load
pub fn render_model_list<'a>(loaded: impl IntoIterator<Item = &'a str>) -> String {
    let loaded: Vec<&str> = loaded.into_iter().collect();
    let mut out = String::from("Available models:\n");
    for (idx, option) in catalog::MODEL_OPTIONS.iter().enumerate() {
        let default = if idx == catalog::DEFAULT_MODEL {
            " (default)"
        } else {
            ""
        };
        let status = if loaded.contains(&option.name) {
            ""
        } else {
            " [unavailable]"
        };
        out.push_str(&format!(
            "  -k {}  {}{}{}\n",
            option.n_clusters, option.name, default, status
        ));
    }
    out
}

/// Result block shown after a successful prediction
pub fn render_prediction(prediction: &Prediction) -> String {
    let description = match prediction.profile {
        Some(profile) => profile.to_string(),
        None => "No description is available for this segment.".to_string(),
    };
    format!(
        "✓ Prediction result: {}\nSegment Cluster {}\n  {}\n{RULE}\n{CAPTION}\n",
        prediction.model, prediction.cluster, description
    )
}
