use serde::{Deserialize, Serialize};

use crate::error::{check_threshold, RecommendError, Result};
use crate::recommender::evaluate::relevance::RelevanceMode;

/// Tuning knobs for the recommenders and the evaluation harness.
///
/// Every field has a default, so a TOML document only needs the keys it
/// wants to override.
///
/// ```toml
/// min_similarity = 0.2
/// availability = "For Rent"
///
/// [evaluation]
/// k = 10
/// relevance = "genre_or_language"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Minimum item-item similarity a neighbour needs to be recommended.
    /// Neighbours at exactly 0.0 are never similarity candidates.
    pub min_similarity: f64,
    /// Size of the top pool hybrid mode samples from
    pub hybrid_pool_size: usize,
    /// Largest share of a similarity response that fallback may fill
    pub fallback_share: f64,
    /// Substring the usage tag must contain. `None` disables the filter.
    pub availability: Option<String>,
    /// Count used when the caller does not ask for one
    pub default_count: usize,
    pub evaluation: EvaluationConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.1,
            hybrid_pool_size: 15,
            fallback_share: 0.5,
            availability: Some("For Rent".to_string()),
            default_count: 5,
            evaluation: EvaluationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub k: usize,
    pub relevance: RelevanceMode,
    pub thresholds: Vec<f64>,
    pub k_values: Vec<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            k: 5,
            relevance: RelevanceMode::Genre,
            thresholds: vec![0.1, 0.2, 0.3, 0.4, 0.5],
            k_values: vec![3, 5, 10],
        }
    }
}

impl RecommenderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RecommenderConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold("min_similarity", self.min_similarity)?;
        if self.hybrid_pool_size == 0 {
            return Err(RecommendError::invalid("hybrid_pool_size", "must be at least 1"));
        }
        if !self.fallback_share.is_finite() || !(0.0..=1.0).contains(&self.fallback_share) {
            return Err(RecommendError::invalid(
                "fallback_share",
                format!("{} is not within [0, 1]", self.fallback_share),
            ));
        }
        if self.evaluation.k == 0 || self.evaluation.k_values.contains(&0) {
            return Err(RecommendError::invalid("evaluation.k", "must be at least 1"));
        }
        for &t in &self.evaluation.thresholds {
            check_threshold("evaluation.thresholds", t)?;
        }
        Ok(())
    }

    /// Number of fallback entries a response of `n` may contain
    pub fn fallback_cap(&self, n: usize) -> usize {
        (n as f64 * self.fallback_share).floor() as usize
    }
}
