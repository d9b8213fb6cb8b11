//! Weight optimization for a fixed set of assets.
//!
//! This crate provides the pieces every candidate-portfolio solve is built
//! from: the mean-variance utility, the staged bound policy and a quadratic
//! program solver for a budget constraint (`Σw = 1`) plus per-weight bounds.
//!
//! # Examples
//!
//! ```rust
//! use cartera_optim::{BoundPolicy, NegativeUtility, WeightSolver};
//! use ndarray::{Array1, Array2};
//!
//! let n = 8;
//! let mu = Array1::from_iter((0..n).map(|i| 0.01 * i as f64));
//! let objective = NegativeUtility::new(mu, Array2::eye(n) * 0.04, 2.0);
//!
//! let bounds = BoundPolicy::default().bounds(n, n);
//! let solution = WeightSolver::default().minimize(&objective, &bounds).unwrap();
//! assert!(solution.success());
//! ```

mod bounds;
mod solver;
mod utility;

// Re-export main types
pub use bounds::{BoundPolicy, BoundStage, WeightBound};
pub use solver::{Solution, SolverConfig, SolverStatus, WeightSolver};
pub use utility::{NegativeUtility, utility};
