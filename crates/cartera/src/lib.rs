#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cartera/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Quick Start
//!
//! ```rust
//! use cartera::{GreedySelector, Horizon, RunParams, SelectorConfig};
//! use cartera::types::{AssetUniverse, CovarianceMatrix, Predictions};
//! use ndarray::{Array1, Array2};
//! use std::collections::BTreeMap;
//!
//! # fn main() -> cartera::Result<()> {
//! let universe = AssetUniverse::new((0..10).map(|i| format!("A{i}")))?;
//! let mut returns = BTreeMap::new();
//! returns.insert(Horizon::months(6), Array1::linspace(0.01, 0.10, 10));
//! let predictions = Predictions::new(universe, returns)?;
//! let covariance = CovarianceMatrix::new(Array2::eye(10) * 0.05);
//!
//! let params = RunParams {
//!     lambda: 1.0,
//!     horizon: Horizon::months(6),
//!     portfolio_size: 8,
//! };
//! if let Some(result) = GreedySelector::new(SelectorConfig::default())
//!     .run(&predictions, &covariance, params)?
//! {
//!     println!("{}", cartera::to_rounded_json(&result.report())?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - Universe, predictions table, covariance matrix and horizons
//! - [`optim`] - Mean-variance utility, bound policy and weight solver
//! - [`select`] - Greedy selection, final refinement and JSON reports

/// The version of the cartera crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core types and the [`Objective`] trait.
pub mod types {
    pub use cartera_traits::*;
}

pub use cartera_traits::{
    AssetUniverse, CarteraError, CovarianceMatrix, Horizon, Objective, Predictions, Result,
    Ticker, ValidationError,
};

// ============================================================================
// Weight Optimization
// ============================================================================

/// Weight optimization for a fixed set of assets.
///
/// Solves `max w·mu − (λ/2)·wᵗΣw` subject to `Σw = 1` and per-weight bounds
/// with an interior-point quadratic program solver.
pub mod optim {
    pub use cartera_optim::*;
}

pub use cartera_optim::{BoundPolicy, SolverConfig, SolverStatus, WeightSolver};

// ============================================================================
// Selection
// ============================================================================

/// Greedy selection, refinement and reporting.
pub mod select {
    pub use cartera_select::*;
}

pub use cartera_select::{
    CandidateOrder, GreedySelector, RunParams, RunResult, SelectorConfig, StepRecord,
    to_rounded_json,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2};
    use std::collections::BTreeMap;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_end_to_end_report() {
        let n = 9;
        let universe = AssetUniverse::new((0..n).map(|i| format!("S{i}"))).unwrap();
        let mut returns = BTreeMap::new();
        returns.insert(Horizon::months(12), Array1::linspace(0.02, 0.10, n));
        let predictions = Predictions::new(universe, returns).unwrap();
        let covariance = CovarianceMatrix::new(Array2::eye(n) * 0.04);
        let params = RunParams {
            lambda: 3.0,
            horizon: Horizon::months(12),
            portfolio_size: 7,
        };

        let result = GreedySelector::default()
            .run(&predictions, &covariance, params)
            .unwrap()
            .unwrap();
        assert!(result.success);
        assert_eq!(result.selected_assets.len(), 7);
        assert_relative_eq!(result.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-6);

        let json = to_rounded_json(&result.report()).unwrap();
        assert!(json.contains("\"selected_assets\""));
        assert!(json.contains("\"weights\""));
        assert!(!json.contains("optimal_value"));
    }
}
