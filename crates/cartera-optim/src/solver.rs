//! Budget- and box-constrained weight solver.
//!
//! Every solve is the convex quadratic program
//!
//! ```text
//! minimize    ½ wᵗPw + qᵗw
//! subject to  Σw = 1,  lower ≤ w ≤ upper
//! ```
//!
//! with `P` the objective's Hessian and `q` its gradient at the origin, handed
//! to the Clarabel interior-point solver. `P` only needs to be positive
//! semidefinite, so rank-deficient covariance blocks solve like any other.

use std::fmt;

use cartera_traits::{CarteraError, Objective, Result};
use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus as IpmStatus, SupportedConeT,
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bounds::WeightBound;

/// Sum-of-bounds slack tolerated when checking feasibility.
const FEASIBILITY_TOL: f64 = 1e-10;

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Duality-gap and feasibility tolerance
    pub ftol: f64,
    /// Maximum number of interior-point iterations
    pub max_iter: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            ftol: 1e-8,
            max_iter: 100,
        }
    }
}

/// Termination status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolverStatus {
    /// An optimum satisfying every constraint was found
    Converged,
    /// `max_iter` iterations ran out
    IterationLimit,
    /// The bounds admit no weights summing to one
    Infeasible,
    /// The solver stopped short of the requested accuracy
    Inaccurate,
    /// The solver hit numerical trouble
    NumericalError,
    /// The objective or its derivatives are NaN or infinite
    NonFinite,
}

impl SolverStatus {
    /// Whether the solve converged.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Converged)
    }

    /// Human-readable status message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Converged => "Optimization terminated successfully",
            Self::IterationLimit => "Iteration limit reached",
            Self::Infeasible => "Inequality constraints incompatible",
            Self::Inaccurate => "Solution only reached reduced accuracy",
            Self::NumericalError => "Numerical difficulties encountered",
            Self::NonFinite => "Objective function is not finite",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<IpmStatus> for SolverStatus {
    fn from(status: IpmStatus) -> Self {
        match status {
            IpmStatus::Solved => Self::Converged,
            IpmStatus::PrimalInfeasible | IpmStatus::AlmostPrimalInfeasible => Self::Infeasible,
            IpmStatus::MaxIterations | IpmStatus::MaxTime => Self::IterationLimit,
            IpmStatus::AlmostSolved => Self::Inaccurate,
            _ => Self::NumericalError,
        }
    }
}

/// Outcome of one solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Optimal weights, `None` when the solve failed
    pub weights: Option<Array1<f64>>,
    /// Objective value at `weights`, `+∞` when the solve failed
    pub objective_value: f64,
    /// Termination status
    pub status: SolverStatus,
    /// Interior-point iterations performed
    pub iterations: u32,
}

impl Solution {
    /// Whether the solve converged.
    pub const fn success(&self) -> bool {
        self.status.is_success()
    }

    const fn failed(status: SolverStatus, iterations: u32) -> Self {
        Self {
            weights: None,
            objective_value: f64::INFINITY,
            status,
            iterations,
        }
    }
}

/// Minimizer for quadratic objectives subject to `Σw = 1` and per-weight
/// bounds.
///
/// # Examples
///
/// ```rust
/// use cartera_optim::{NegativeUtility, WeightBound, WeightSolver};
/// use ndarray::array;
///
/// let objective = NegativeUtility::new(
///     array![0.10, 0.05],
///     array![[0.04, 0.0], [0.0, 0.04]],
///     1.0,
/// );
/// let bounds = vec![WeightBound::new(0.0, 1.0); 2];
/// let solution = WeightSolver::default().minimize(&objective, &bounds).unwrap();
/// assert!(solution.success());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightSolver {
    config: SolverConfig,
}

impl WeightSolver {
    /// Creates a solver with the given configuration.
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Minimizes `objective` under `bounds` and `Σw = 1`.
    ///
    /// The objective must be quadratic: its Hessian and gradient are read once
    /// at the origin. Non-convergence is reported through
    /// [`Solution::status`].
    ///
    /// # Errors
    ///
    /// Returns an error if `bounds` does not match the objective's dimension,
    /// or if the solver rejects the assembled problem data.
    pub fn minimize<O: Objective + ?Sized>(
        &self,
        objective: &O,
        bounds: &[WeightBound],
    ) -> Result<Solution> {
        let n = objective.dim();
        if n == 0 || bounds.len() != n {
            return Err(CarteraError::InvalidData(format!(
                "solver dimension mismatch: objective {n}, bounds {}",
                bounds.len()
            )));
        }

        let origin = Array1::zeros(n);
        let hessian = objective.hessian(&origin);
        let linear = objective.gradient(&origin);
        if hessian.iter().chain(linear.iter()).any(|v| !v.is_finite()) {
            return Ok(Solution::failed(SolverStatus::NonFinite, 0));
        }

        let lower_sum: f64 = bounds.iter().map(|b| b.lower).sum();
        let upper_sum: f64 = bounds.iter().map(|b| b.upper).sum();
        if bounds.iter().any(|b| b.lower > b.upper)
            || lower_sum > 1.0 + FEASIBILITY_TOL
            || upper_sum < 1.0 - FEASIBILITY_TOL
        {
            return Ok(Solution::failed(SolverStatus::Infeasible, 0));
        }

        if bounds.iter().all(WeightBound::is_fixed) {
            // Nothing left to optimize; the budget check above already passed.
            let weights: Array1<f64> = bounds.iter().map(|b| b.lower).collect();
            return Ok(finish(objective, weights, 0));
        }

        let p = upper_triangle(&hessian);
        let (a, b, zero_rows) = constraint_rows(bounds);
        let cones = [
            SupportedConeT::ZeroConeT(zero_rows),
            SupportedConeT::NonnegativeConeT(b.len() - zero_rows),
        ];
        let settings = DefaultSettingsBuilder::default()
            .max_iter(self.config.max_iter)
            .tol_gap_abs(self.config.ftol)
            .tol_gap_rel(self.config.ftol)
            .tol_feas(self.config.ftol)
            .verbose(false)
            .build()
            .map_err(|e| CarteraError::InvalidData(format!("solver settings: {e}")))?;

        let q = linear.to_vec();
        let mut solver = DefaultSolver::new(&p, &q, &a, &b, &cones, settings)
            .map_err(|e| CarteraError::InvalidData(format!("solver rejected problem: {e:?}")))?;
        solver.solve();

        let status = SolverStatus::from(solver.solution.status);
        let iterations = solver.solution.iterations;
        trace!(assets = n, iterations, status = %status, "quadratic solve");
        if !status.is_success() {
            return Ok(Solution::failed(status, iterations));
        }

        let weights: Array1<f64> = solver
            .solution
            .x
            .iter()
            .zip(bounds)
            .map(|(w, b)| b.clamp(*w))
            .collect();
        Ok(finish(objective, weights, iterations))
    }
}

fn finish<O: Objective + ?Sized>(objective: &O, weights: Array1<f64>, iterations: u32) -> Solution {
    let objective_value = objective.value(&weights);
    if !objective_value.is_finite() {
        return Solution::failed(SolverStatus::NonFinite, iterations);
    }
    Solution {
        weights: Some(weights),
        objective_value,
        status: SolverStatus::Converged,
        iterations,
    }
}

/// Upper triangle of a symmetric matrix in compressed-column form.
fn upper_triangle(matrix: &Array2<f64>) -> CscMatrix<f64> {
    let n = matrix.nrows();
    let mut colptr = Vec::with_capacity(n + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    colptr.push(0);
    for j in 0..n {
        for i in 0..=j {
            let v = matrix[[i, j]];
            if v != 0.0 {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr.push(rowval.len());
    }
    CscMatrix::new(n, n, colptr, rowval, nzval)
}

/// Constraint matrix, right-hand side and zero-cone row count for `Ax + s = b`.
///
/// Zero-cone rows come first: the budget row, then one equality per fixed
/// weight. Each free weight then gets `w ≤ upper` and `−w ≤ −lower` in the
/// nonnegative cone.
fn constraint_rows(bounds: &[WeightBound]) -> (CscMatrix<f64>, Vec<f64>, usize) {
    let fixed = bounds.iter().filter(|b| b.is_fixed()).count();
    let zero_rows = 1 + fixed;
    let rows = zero_rows + 2 * (bounds.len() - fixed);

    let mut b = vec![0.0; rows];
    b[0] = 1.0;
    let mut colptr = Vec::with_capacity(bounds.len() + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    colptr.push(0);

    let (mut next_fixed, mut next_free) = (1, zero_rows);
    for bound in bounds {
        rowval.push(0);
        nzval.push(1.0);
        if bound.is_fixed() {
            rowval.push(next_fixed);
            nzval.push(1.0);
            b[next_fixed] = bound.lower;
            next_fixed += 1;
        } else {
            rowval.extend([next_free, next_free + 1]);
            nzval.extend([1.0, -1.0]);
            b[next_free] = bound.upper;
            b[next_free + 1] = -bound.lower;
            next_free += 2;
        }
        colptr.push(rowval.len());
    }

    (CscMatrix::new(rows, bounds.len(), colptr, rowval, nzval), b, zero_rows)
}
