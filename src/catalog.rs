//! Static descriptions of the offered models and their segments
//!
//! Default-rate figures come from offline analysis of the training data and
//! are shown as-is.

/// One of the models offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    /// Name shown to the user and used to select the model
    pub name: &'static str,
    /// Artifact file name inside the artifact directory
    pub file: &'static str,
    pub n_clusters: usize,
    /// What choosing this K gives you
    pub summary: &'static str,
}

/// Description of one segment of one model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileEntry {
    pub model: &'static str,
    pub cluster: usize,
    pub description: &'static str,
    /// Share of customers in this segment that defaulted, in percent
    pub default_rate: f64,
}

pub static MODEL_OPTIONS: [ModelOption; 3] = [
    ModelOption {
        name: "K-Means (2 clusters)",
        file: "kmeans_k2.json",
        n_clusters: 2,
        summary: "K = 2: a broad split into two large groups. Scores highest of the \
                  offered models; suited to simple distinctions such as high-value \
                  versus low-value customers.",
    },
    ModelOption {
        name: "K-Means (3 clusters)",
        file: "kmeans_k3.json",
        n_clusters: 3,
        summary: "K = 3: a more nuanced split that usually separates a middle group \
                  out of one of the two large ones.",
    },
    ModelOption {
        name: "K-Means (4 clusters)",
        file: "kmeans_k4.json",
        n_clusters: 4,
        summary: "K = 4: finer, more specific segments that can reveal detailed \
                  behavioural sub-groups, at a lower score.",
    },
];

/// Index into [`MODEL_OPTIONS`] selected when the user makes no choice
pub const DEFAULT_MODEL: usize = 1;

pub const SCALER_FILE: &str = "scaler.json";

pub const CAPTION: &str =
    "Descriptions are based on the relative characteristics of each cluster in the training data.";

static PROFILES: [ProfileEntry; 9] = [
    ProfileEntry {
        model: "K-Means (2 clusters)",
        cluster: 0,
        description: "Customers with high income, high spending, high CLV and a healthy credit score",
        default_rate: 34.96,
    },
    ProfileEntry {
        model: "K-Means (2 clusters)",
        cluster: 1,
        description: "Customers with low income, low spending, low CLV and a healthy credit score",
        default_rate: 34.22,
    },
    ProfileEntry {
        model: "K-Means (3 clusters)",
        cluster: 0,
        description: "Younger customers with moderate income, low spending, low CLV and a healthy credit score",
        default_rate: 33.66,
    },
    ProfileEntry {
        model: "K-Means (3 clusters)",
        cluster: 1,
        description: "Customers with high income, high spending, high CLV and a healthy credit score",
        default_rate: 34.75,
    },
    ProfileEntry {
        model: "K-Means (3 clusters)",
        cluster: 2,
        description: "Older customers with moderate income, low spending, low CLV and a healthy credit score",
        default_rate: 35.15,
    },
    ProfileEntry {
        model: "K-Means (4 clusters)",
        cluster: 0,
        description: "Customers with very low income, very low spending, very low CLV and a somewhat low credit score",
        default_rate: 34.79,
    },
    ProfileEntry {
        model: "K-Means (4 clusters)",
        cluster: 1,
        description: "Customers with very high income, very high spending, very high CLV and a healthy credit score",
        default_rate: 35.63,
    },
    ProfileEntry {
        model: "K-Means (4 clusters)",
        cluster: 2,
        description: "Older customers with high income, medium spending, medium CLV and the highest credit scores",
        default_rate: 34.30,
    },
    ProfileEntry {
        model: "K-Means (4 clusters)",
        cluster: 3,
        description: "Younger customers with moderate income, medium spending, low CLV and a healthy credit score",
        default_rate: 33.76,
    },
];

/// Find an offered model by display name
pub fn model_option(name: &str) -> Option<&'static ModelOption> {
    MODEL_OPTIONS.iter().find(|option| option.name == name)
}

/// Find an offered model by cluster count
pub fn model_option_for_k(n_clusters: usize) -> Option<&'static ModelOption> {
    MODEL_OPTIONS
        .iter()
        .find(|option| option.n_clusters == n_clusters)
}

/// Look up the description of one segment
pub fn profile(model: &str, cluster: usize) -> Option<&'static ProfileEntry> {
    PROFILES
        .iter()
        .find(|entry| entry.model == model && entry.cluster == cluster)
}

impl ProfileEntry {
    /// Whether this segment has the lowest or highest default rate of its model
    pub fn rank_note(&self) -> Option<&'static str> {
        // two-segment models have no meaningful ranking
        if model_option(self.model).map_or(true, |option| option.n_clusters < 3) {
            return None;
        }

        let (min, max) = PROFILES
            .iter()
            .filter(|entry| entry.model == self.model)
            .map(|entry| entry.default_rate)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r), hi.max(r))
            });
        if self.default_rate == min {
            Some("lowest")
        } else if self.default_rate == max {
            Some("highest")
        } else {
            None
        }
    }
}

impl std::fmt::Display for ProfileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cluster {} → {}, default probability ~{:.2}%",
            self.cluster, self.description, self.default_rate
        )?;
        if let Some(note) = self.rank_note() {
            write!(f, " ({note})")?;
        }
        write!(f, ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_segment_has_a_profile() {
        for option in MODEL_OPTIONS.iter() {
            for cluster in 0..option.n_clusters {
                assert!(
                    profile(option.name, cluster).is_some(),
                    "no profile for {} cluster {}",
                    option.name,
                    cluster
                );
            }
            assert!(profile(option.name, option.n_clusters).is_none());
        }
    }

    #[test]
    fn test_default_model_is_three_clusters() {
        assert_eq!(MODEL_OPTIONS[DEFAULT_MODEL].n_clusters, 3);
        assert_eq!(model_option_for_k(4).unwrap().file, "kmeans_k4.json");
        assert!(model_option("K-Means (5 clusters)").is_none());
    }

    #[test]
    fn test_rank_notes() {
        let lowest = profile("K-Means (3 clusters)", 0).unwrap();
        let highest = profile("K-Means (3 clusters)", 2).unwrap();
        let middle = profile("K-Means (3 clusters)", 1).unwrap();
        assert_eq!(lowest.rank_note(), Some("lowest"));
        assert_eq!(highest.rank_note(), Some("highest"));
        assert_eq!(middle.rank_note(), None);

        assert_eq!(profile("K-Means (4 clusters)", 1).unwrap().rank_note(), Some("highest"));
        assert_eq!(profile("K-Means (2 clusters)", 0).unwrap().rank_note(), None);
    }

    #[test]
    fn test_display() {
        let entry = profile("K-Means (3 clusters)", 0).unwrap();
        let text = entry.to_string();
        assert!(text.starts_with("Cluster 0 → Younger customers"));
        assert!(text.ends_with("~33.66% (lowest)."));
    }
}
