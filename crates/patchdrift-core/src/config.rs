//! Analysis tunables.
//!
//! Defaults reproduce the documented behavior exactly; callers only override
//! them deliberately (the CLI exposes `--pairing-threshold`).

use serde::{Deserialize, Serialize};

use crate::error::PatchdriftError;

/// Similarity a deleted/inserted line pair must strictly exceed to be paired.
pub const DEFAULT_PAIRING_THRESHOLD: f64 = 0.5;

/// Below this line similarity the token diff renders the whole line unchanged.
pub const DEFAULT_TOKEN_DIFF_MIN_SIMILARITY: f64 = 0.3;

/// Lines shorter than this (in chars) skip the token diff.
pub const DEFAULT_TOKEN_DIFF_MIN_LEN: usize = 3;

/// Tunables for line pairing and token diffing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Strict lower bound on similarity for a Modified Pair.
    pub pairing_threshold: f64,
    /// Minimum line similarity for token-level highlighting.
    pub token_diff_min_similarity: f64,
    /// Minimum line length (chars) for token-level highlighting.
    pub token_diff_min_len: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            pairing_threshold: DEFAULT_PAIRING_THRESHOLD,
            token_diff_min_similarity: DEFAULT_TOKEN_DIFF_MIN_SIMILARITY,
            token_diff_min_len: DEFAULT_TOKEN_DIFF_MIN_LEN,
        }
    }
}

impl AnalysisConfig {
    /// Replace the pairing threshold.
    pub fn with_pairing_threshold(mut self, threshold: f64) -> Self {
        self.pairing_threshold = threshold;
        self
    }

    /// Check that both similarity bounds lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), PatchdriftError> {
        for (name, value) in [
            ("pairing threshold", self.pairing_threshold),
            ("token diff minimum similarity", self.token_diff_min_similarity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PatchdriftError::invalid_args(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
