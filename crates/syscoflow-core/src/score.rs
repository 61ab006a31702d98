//! Compliance scoring
//!
//! A linear penalty over finding counts, floored at 0. The weights are
//! deliberately coarse and live in configuration so they can be tuned per
//! jurisdiction.

use syscoflow_config::ScoreWeights;

/// Weighted score in [0, 100] for the given finding counts.
pub fn compliance_score(errors: usize, warnings: usize, weights: &ScoreWeights) -> u8 {
    let penalty = (errors as u64) * u64::from(weights.error_weight)
        + (warnings as u64) * u64::from(weights.warning_weight);
    100 - penalty.min(100) as u8
}
