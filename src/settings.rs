//! Configuration for a consensus run.

use std::time::Duration;

use crate::error::ConsensusError;
use crate::threshold::Threshold;

/// Main configuration object for the consensus engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RansacSettings {
    /// Residual cutoff for the consensus set.
    pub threshold: Threshold,
    /// Desired probability in (0, 1) of drawing at least one all-inlier sample.
    pub confidence: f64,
    /// Upper bound on iterations; the adaptive bound only ever lowers it.
    pub max_iterations: usize,
    /// Consecutive degenerate draws tolerated before the run fails.
    pub max_degenerate_samples: usize,
    /// Wall-clock budget; reaching it is a soft stop.
    pub time_budget: Option<Duration>,
    /// Caller-imposed iteration cap; reaching it is a soft stop.
    pub iteration_cap: Option<usize>,
    /// Pass the best model once through `Problem::refine` before returning.
    pub refine_result: bool,
    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RansacSettings {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            confidence: 0.99,
            max_iterations: 1000,
            max_degenerate_samples: 50,
            time_budget: None,
            iteration_cap: None,
            refine_result: true,
            seed: None,
        }
    }
}

impl RansacSettings {
    /// Default settings with the given residual threshold.
    pub fn with_threshold(threshold: Threshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConsensusError> {
        let t = self.threshold.value();
        // `r < 0` never holds for a non-negative residual.
        if !t.is_finite() || t <= 0.0 {
            return Err(ConsensusError::InvalidSettings(format!(
                "threshold must be finite and positive, got {t}"
            )));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ConsensusError::InvalidSettings(format!(
                "confidence must lie in (0, 1), got {}",
                self.confidence
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConsensusError::InvalidSettings(
                "max_iterations must be positive".to_string(),
            ));
        }
        if self.max_degenerate_samples == 0 {
            return Err(ConsensusError::InvalidSettings(
                "max_degenerate_samples must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
