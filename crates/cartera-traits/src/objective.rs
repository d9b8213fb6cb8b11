//! Objective functions minimized by the weight solvers.

use ndarray::{Array1, Array2};

/// A twice-differentiable scalar objective over a weight vector.
///
/// Solvers only ever minimize; maximization problems implement the negated
/// function. Implementations must be thread-safe (Send + Sync) because
/// candidate portfolios are solved concurrently.
///
/// # Examples
///
/// ```rust
/// use cartera_traits::Objective;
/// use ndarray::{Array1, Array2};
///
/// /// `f(w) = ||w||² / 2`
/// struct HalfSquaredNorm;
///
/// impl Objective for HalfSquaredNorm {
///     fn dim(&self) -> usize {
///         2
///     }
///
///     fn value(&self, weights: &Array1<f64>) -> f64 {
///         0.5 * weights.dot(weights)
///     }
///
///     fn gradient(&self, weights: &Array1<f64>) -> Array1<f64> {
///         weights.clone()
///     }
///
///     fn hessian(&self, _weights: &Array1<f64>) -> Array2<f64> {
///         Array2::eye(2)
///     }
/// }
/// ```
pub trait Objective: Send + Sync {
    /// Number of decision variables.
    fn dim(&self) -> usize;

    /// Objective value at `weights`.
    fn value(&self, weights: &Array1<f64>) -> f64;

    /// Gradient at `weights`.
    fn gradient(&self, weights: &Array1<f64>) -> Array1<f64>;

    /// Hessian at `weights`.
    fn hessian(&self, weights: &Array1<f64>) -> Array2<f64>;
}
