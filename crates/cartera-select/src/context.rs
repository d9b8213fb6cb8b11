//! Call-scoped, read-only inputs of one optimization run.

use cartera_optim::{BoundPolicy, NegativeUtility, WeightSolver};
use cartera_traits::{
    AssetUniverse, CovarianceMatrix, Horizon, Predictions, Result, ValidationError,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    /// Risk aversion, must be positive
    pub lambda: f64,
    /// Forecast horizon whose predictions are optimized
    pub horizon: Horizon,
    /// Target number of assets
    pub portfolio_size: usize,
}

/// Everything a candidate solve reads, validated once per run.
///
/// Holds shared references to the caller's universe, the selected horizon's
/// expected returns and the covariance matrix. Nothing in here is mutated
/// during a run, so it is shared freely across worker threads.
#[derive(Debug, Clone, Copy)]
pub struct OptimizationContext<'a> {
    universe: &'a AssetUniverse,
    returns: &'a Array1<f64>,
    covariance: &'a CovarianceMatrix,
    lambda: f64,
    portfolio_size: usize,
    bounds: BoundPolicy,
    solver: WeightSolver,
}

impl<'a> OptimizationContext<'a> {
    /// Validates the inputs and builds the context.
    ///
    /// Checks run in a fixed order: risk aversion, covariance shape, portfolio
    /// size, then horizon. The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for rejected inputs.
    pub fn new(
        predictions: &'a Predictions,
        covariance: &'a CovarianceMatrix,
        params: RunParams,
        bounds: BoundPolicy,
        solver: WeightSolver,
    ) -> Result<Self> {
        if params.lambda.is_nan() || params.lambda <= 0.0 {
            return Err(ValidationError::NonPositiveRiskAversion(params.lambda).into());
        }

        let n = predictions.len();
        let (rows, cols) = covariance.dim();
        if (rows, cols) != (n, n) {
            return Err(ValidationError::CovarianceShape {
                rows,
                cols,
                expected: n,
            }
            .into());
        }

        if params.portfolio_size == 0 || params.portfolio_size > n {
            return Err(ValidationError::PortfolioSize {
                size: params.portfolio_size,
                universe: n,
            }
            .into());
        }

        let returns = predictions.returns(params.horizon)?;

        Ok(Self {
            universe: predictions.universe(),
            returns,
            covariance,
            lambda: params.lambda,
            portfolio_size: params.portfolio_size,
            bounds,
            solver,
        })
    }

    /// The asset universe.
    pub const fn universe(&self) -> &'a AssetUniverse {
        self.universe
    }

    /// Expected returns for the run's horizon, in universe order.
    pub const fn returns(&self) -> &'a Array1<f64> {
        self.returns
    }

    /// Target portfolio size.
    pub const fn portfolio_size(&self) -> usize {
        self.portfolio_size
    }

    /// Bound policy.
    pub const fn bounds(&self) -> &BoundPolicy {
        &self.bounds
    }

    /// Weight solver.
    pub const fn solver(&self) -> &WeightSolver {
        &self.solver
    }

    /// Negated utility over the assets at `indices`, in that order.
    pub fn objective(&self, indices: &[usize]) -> NegativeUtility {
        let mu = indices.iter().map(|&i| self.returns[i]).collect();
        let cov = self.covariance.submatrix(indices);
        NegativeUtility::new(mu, cov, self.lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cartera_traits::CarteraError;
    use ndarray::{Array2, array};
    use std::collections::BTreeMap;

    fn inputs(n: usize) -> (Predictions, CovarianceMatrix) {
        let universe = AssetUniverse::new((0..n).map(|i| format!("T{i:02}"))).unwrap();
        let mut returns = BTreeMap::new();
        returns.insert(
            Horizon::months(12),
            Array1::from_iter((0..n).map(|i| 0.01 * (i + 1) as f64)),
        );
        let predictions = Predictions::new(universe, returns).unwrap();
        (predictions, CovarianceMatrix::new(Array2::eye(n) * 0.04))
    }

    fn params(lambda: f64, portfolio_size: usize) -> RunParams {
        RunParams {
            lambda,
            horizon: Horizon::months(12),
            portfolio_size,
        }
    }

    fn build<'a>(
        predictions: &'a Predictions,
        covariance: &'a CovarianceMatrix,
        params: RunParams,
    ) -> Result<OptimizationContext<'a>> {
        OptimizationContext::new(
            predictions,
            covariance,
            params,
            BoundPolicy::default(),
            WeightSolver::default(),
        )
    }

    #[test]
    fn test_valid_context() {
        let (predictions, covariance) = inputs(5);
        let ctx = build(&predictions, &covariance, params(1.0, 3)).unwrap();
        assert_eq!(ctx.portfolio_size(), 3);
        assert_eq!(ctx.universe().len(), 5);
        assert_relative_eq!(ctx.returns()[4], 0.05);
    }

    #[test]
    fn test_rejects_zero_lambda() {
        let (predictions, covariance) = inputs(5);
        let err = build(&predictions, &covariance, params(0.0, 3)).unwrap_err();
        assert!(matches!(
            err,
            CarteraError::Validation(ValidationError::NonPositiveRiskAversion(_))
        ));
    }

    #[test]
    fn test_rejects_nan_lambda() {
        let (predictions, covariance) = inputs(5);
        let err = build(&predictions, &covariance, params(f64::NAN, 3)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_oversized_portfolio() {
        let (predictions, covariance) = inputs(5);
        let err = build(&predictions, &covariance, params(1.0, 6)).unwrap_err();
        assert!(matches!(
            err,
            CarteraError::Validation(ValidationError::PortfolioSize {
                size: 6,
                universe: 5
            })
        ));
    }

    #[test]
    fn test_rejects_empty_portfolio() {
        let (predictions, covariance) = inputs(5);
        let err = build(&predictions, &covariance, params(1.0, 0)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_covariance_shape() {
        let (predictions, _) = inputs(5);
        let covariance = CovarianceMatrix::new(Array2::eye(4));
        let err = build(&predictions, &covariance, params(1.0, 3)).unwrap_err();
        assert!(matches!(
            err,
            CarteraError::Validation(ValidationError::CovarianceShape {
                rows: 4,
                cols: 4,
                expected: 5
            })
        ));
    }

    #[test]
    fn test_lambda_checked_before_shape() {
        let (predictions, _) = inputs(5);
        let covariance = CovarianceMatrix::new(Array2::eye(4));
        let err = build(&predictions, &covariance, params(-1.0, 9)).unwrap_err();
        assert!(matches!(
            err,
            CarteraError::Validation(ValidationError::NonPositiveRiskAversion(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_horizon() {
        let (predictions, covariance) = inputs(5);
        let mut p = params(1.0, 3);
        p.horizon = Horizon::months(24);
        let err = build(&predictions, &covariance, p).unwrap_err();
        assert!(matches!(
            err,
            CarteraError::Validation(ValidationError::UnsupportedHorizon { horizon: 24, .. })
        ));
    }

    #[test]
    fn test_objective_follows_index_order() {
        let (predictions, covariance) = inputs(5);
        let ctx = build(&predictions, &covariance, params(2.0, 3)).unwrap();
        let objective = ctx.objective(&[4, 0]);
        // All weight on T04: 0.05 - (2 / 2) * 0.04
        assert_relative_eq!(objective.utility(&array![1.0, 0.0]), 0.01, epsilon = 1e-15);
    }
}
