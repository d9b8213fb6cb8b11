//! Run results and the per-step audit trail.

use cartera_traits::Ticker;
use serde::{Deserialize, Serialize};

/// One committed greedy iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Cumulative selection after this step, in selection order
    pub selected_assets: Vec<Ticker>,
    /// Weights achieved for `selected_assets`
    pub weights: Vec<f64>,
    /// Negated utility achieved
    pub objective_value: f64,
}

/// Outcome of a portfolio-construction run.
///
/// `success` reports whether the final refinement converged. A run with
/// `success == false` still carries usable weights from the last greedy step,
/// so callers should check the flag rather than treat it as "no output".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Selected assets, in selection order
    pub selected_assets: Vec<Ticker>,
    /// Final weights, aligned with `selected_assets`
    pub weights: Vec<f64>,
    /// Final negated utility
    pub objective_value: f64,
    /// Audit trail, one record per selected asset
    pub steps: Vec<StepRecord>,
    /// Whether the final refinement converged
    pub success: bool,
    /// Solver status message of the final refinement
    pub message: String,
}

impl RunResult {
    /// Number of selected assets. May be below the target size when a greedy
    /// step failed to converge.
    pub fn size(&self) -> usize {
        self.selected_assets.len()
    }

    /// Sum of the final weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> RunResult {
        RunResult {
            selected_assets: vec!["AAA".to_string(), "BBB".to_string()],
            weights: vec![0.6, 0.4],
            objective_value: -0.05,
            steps: vec![
                StepRecord {
                    selected_assets: vec!["AAA".to_string()],
                    weights: vec![1.0],
                    objective_value: -0.04,
                },
                StepRecord {
                    selected_assets: vec!["AAA".to_string(), "BBB".to_string()],
                    weights: vec![0.6, 0.4],
                    objective_value: -0.05,
                },
            ],
            success: true,
            message: "Optimization terminated successfully".to_string(),
        }
    }

    #[test]
    fn test_result_accessors() {
        let result = sample();
        assert_eq!(result.size(), 2);
        assert_relative_eq!(result.total_weight(), 1.0);
    }

    #[test]
    fn test_result_serializes_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["selected_assets"][1], "BBB");
        assert_eq!(value["steps"][0]["weights"][0], 1.0);
        assert_eq!(value["success"], true);
    }
}
