//! Optimize command implementation.

use crate::data;
use anyhow::{Result, anyhow};
use cartera::{
    BoundPolicy, CandidateOrder, GreedySelector, Horizon, RunParams, SelectorConfig,
    SolverConfig, to_rounded_json,
};
use std::path::PathBuf;
use tracing::warn;

/// Arguments of `cartera optimize`.
#[derive(Debug, Clone)]
pub(crate) struct OptimizeArgs {
    pub(crate) lambda: f64,
    pub(crate) horizon: u32,
    pub(crate) portfolio_size: usize,
    pub(crate) predictions: PathBuf,
    pub(crate) covariance: PathBuf,
    pub(crate) workers: Option<usize>,
    pub(crate) ftol: f64,
    pub(crate) max_iter: u32,
    pub(crate) order: CandidateOrder,
    pub(crate) full: bool,
}

/// Runs the selector and returns the rounded JSON report.
pub(crate) fn optimize(args: &OptimizeArgs) -> Result<String> {
    let predictions = data::load_predictions(&args.predictions)?;
    let covariance = data::load_covariance(&args.covariance)?;

    let config = SelectorConfig {
        n_workers: args.workers,
        solver: SolverConfig {
            ftol: args.ftol,
            max_iter: args.max_iter,
        },
        bounds: BoundPolicy::default(),
        candidate_order: args.order,
    };
    let params = RunParams {
        lambda: args.lambda,
        horizon: Horizon::months(args.horizon),
        portfolio_size: args.portfolio_size,
    };

    let result = GreedySelector::new(config)
        .run(&predictions, &covariance, params)?
        .ok_or_else(|| anyhow!("no asset could be selected: no candidate converged"))?;

    if !result.success {
        warn!(
            message = %result.message,
            selected = result.size(),
            "final refinement did not converge, reporting unrefined weights"
        );
    }

    let json = if args.full {
        to_rounded_json(&result.diagnostics())?
    } else {
        to_rounded_json(&result.report())?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::Value;
    use std::fs;
    use std::path::Path;

    fn write_inputs(dir: &Path, n: usize) -> (PathBuf, PathBuf) {
        let predictions = dir.join("predictions.csv");
        let mut csv = String::from("ticker,return_6m,return_12m\n");
        for i in 0..n {
            csv.push_str(&format!(
                "S{i:02},{},{}\n",
                0.01 + 0.002 * i as f64,
                0.02 + 0.004 * i as f64
            ));
        }
        fs::write(&predictions, csv).unwrap();

        let covariance = dir.join("covariance.csv");
        let mut rows = String::new();
        for i in 0..n {
            let row: Vec<String> = (0..n)
                .map(|j| if i == j { "0.04" } else { "0.005" }.to_string())
                .collect();
            rows.push_str(&row.join(","));
            rows.push('\n');
        }
        fs::write(&covariance, rows).unwrap();

        (predictions, covariance)
    }

    fn args(predictions: PathBuf, covariance: PathBuf, lambda: f64) -> OptimizeArgs {
        OptimizeArgs {
            lambda,
            horizon: 12,
            portfolio_size: 8,
            predictions,
            covariance,
            workers: Some(2),
            ftol: 1e-8,
            max_iter: 100,
            order: CandidateOrder::Universe,
            full: false,
        }
    }

    #[test]
    fn test_optimize_public_report() {
        let dir = tempfile::tempdir().unwrap();
        let (predictions, covariance) = write_inputs(dir.path(), 12);

        let json = optimize(&args(predictions, covariance, 2.0)).unwrap();
        let report: Value = serde_json::from_str(&json).unwrap();

        let assets = report["selected_assets"].as_array().unwrap();
        let weights = report["weights"].as_array().unwrap();
        assert_eq!(assets.len(), 8);
        assert_eq!(weights.len(), 8);
        let total: f64 = weights.iter().filter_map(Value::as_f64).sum();
        assert_relative_eq!(total, 1.0, epsilon = 5e-3);
        assert!(report.get("optimal_value").is_none());
    }

    #[test]
    fn test_optimize_full_report() {
        let dir = tempfile::tempdir().unwrap();
        let (predictions, covariance) = write_inputs(dir.path(), 12);
        let mut args = args(predictions, covariance, 2.0);
        args.full = true;

        let report: Value = serde_json::from_str(&optimize(&args).unwrap()).unwrap();
        assert_eq!(report["success"], Value::Bool(true));
        assert_eq!(report["all_selected_assets"].as_array().unwrap().len(), 8);
        assert_eq!(report["all_objective_values"].as_array().unwrap().len(), 8);
        assert!(report["optimal_value"].is_number());
    }

    #[test]
    fn test_optimize_rejects_bad_lambda() {
        let dir = tempfile::tempdir().unwrap();
        let (predictions, covariance) = write_inputs(dir.path(), 12);

        let err = optimize(&args(predictions, covariance, -1.0)).unwrap_err();
        assert!(err.to_string().contains("lambda must be positive"));
    }

    #[test]
    fn test_optimize_rejects_unknown_horizon() {
        let dir = tempfile::tempdir().unwrap();
        let (predictions, covariance) = write_inputs(dir.path(), 12);
        let mut args = args(predictions, covariance, 1.0);
        args.horizon = 24;

        let err = optimize(&args).unwrap_err();
        assert!(err.to_string().contains("6, 12"));
    }
}
