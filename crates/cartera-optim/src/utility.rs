//! Mean-variance utility.

use cartera_traits::Objective;
use ndarray::{Array1, Array2};

/// Risk-adjusted expected return, `w·mu − (λ/2)·wᵗΣw`.
///
/// Callers guarantee `weights`, `mu` and `cov` share one asset ordering and
/// hold at least one asset.
pub fn utility(weights: &Array1<f64>, mu: &Array1<f64>, cov: &Array2<f64>, lambda: f64) -> f64 {
    let expected_return = weights.dot(mu);
    let variance = weights.dot(&cov.dot(weights));
    expected_return - 0.5 * lambda * variance
}

/// Negated mean-variance utility over one candidate portfolio.
///
/// This is the function every weight solve minimizes. The covariance block is
/// symmetrized once on construction so the gradient and Hessian stay exact
/// even when the input carries rounding asymmetries.
#[derive(Debug, Clone)]
pub struct NegativeUtility {
    mu: Array1<f64>,
    cov: Array2<f64>,
    hessian: Array2<f64>,
    lambda: f64,
}

impl NegativeUtility {
    /// Creates the objective for expected returns `mu`, covariance block `cov`
    /// and risk aversion `lambda`.
    ///
    /// # Panics
    ///
    /// Panics if `cov` is not `mu.len()` square.
    pub fn new(mu: Array1<f64>, cov: Array2<f64>, lambda: f64) -> Self {
        assert_eq!(
            cov.dim(),
            (mu.len(), mu.len()),
            "covariance block does not match expected returns"
        );
        let symmetric = (&cov + &cov.t()) * 0.5;
        let hessian = &symmetric * lambda;
        Self {
            mu,
            cov: symmetric,
            hessian,
            lambda,
        }
    }

    /// Utility (not negated) of `weights`.
    pub fn utility(&self, weights: &Array1<f64>) -> f64 {
        utility(weights, &self.mu, &self.cov, self.lambda)
    }
}

impl Objective for NegativeUtility {
    fn dim(&self) -> usize {
        self.mu.len()
    }

    fn value(&self, weights: &Array1<f64>) -> f64 {
        -self.utility(weights)
    }

    fn gradient(&self, weights: &Array1<f64>) -> Array1<f64> {
        self.hessian.dot(weights) - &self.mu
    }

    fn hessian(&self, _weights: &Array1<f64>) -> Array2<f64> {
        self.hessian.clone()
    }
}
