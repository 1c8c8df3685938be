//! Error types for recommender operations.
//!
//! Missing anchors, unknown users and short candidate pools are regular
//! outcomes and never surface here. Only invalid caller input does.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A parameter is outside its accepted range.
    #[error("invalid parameter `{param}`: {reason}")]
    InvalidParameter {
        param: &'static str,
        reason: String,
    },
}

impl RecommendError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        RecommendError::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Similarity thresholds must be finite and within the cosine range.
pub(crate) fn check_threshold(param: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(RecommendError::invalid(param, format!("{value} is not within [-1, 1]")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_check_rejects_nan_and_out_of_range() {
        assert!(check_threshold("t", 0.3).is_ok());
        assert!(check_threshold("t", -1.0).is_ok());
        assert!(check_threshold("t", f64::NAN).is_err());
        assert!(check_threshold("t", 1.5).is_err());
    }

    #[test]
    fn invalid_parameter_message_names_the_parameter() {
        let err = RecommendError::invalid("k", "must be positive");
        assert_eq!(err.to_string(), "invalid parameter `k`: must be positive");
    }
}
