//! Single-candidate optimization.

use cartera_optim::{Solution, SolverStatus};
use cartera_traits::{Result, Ticker};
use ndarray::Array1;
use tracing::debug;

use crate::context::OptimizationContext;

/// One unit of work: the current selection plus one proposed asset.
///
/// Tasks only hold shared references, so a whole iteration's worth can be
/// handed to the worker pool without copying the selection per candidate.
#[derive(Debug, Clone, Copy)]
pub struct CandidateTask<'a> {
    /// Proposed new asset
    pub asset: &'a str,
    /// Assets already selected, in selection order
    pub selected: &'a [Ticker],
}

/// Result of solving one candidate portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOutcome {
    /// The proposed asset
    pub asset: Ticker,
    /// Negated utility at the optimum, `+∞` when the solve failed
    pub objective_value: f64,
    /// Optimal weights for `selected + [asset]`, `None` when the solve failed
    pub weights: Option<Array1<f64>>,
    /// Whether the solve converged
    pub success: bool,
    /// Solver termination status
    pub status: SolverStatus,
}

impl CandidateOutcome {
    fn from_solution(asset: &str, solution: Solution) -> Self {
        Self {
            asset: asset.to_string(),
            objective_value: solution.objective_value,
            success: solution.success(),
            weights: solution.weights,
            status: solution.status,
        }
    }
}

impl<'a> CandidateTask<'a> {
    /// Creates a task.
    pub const fn new(asset: &'a str, selected: &'a [Ticker]) -> Self {
        Self { asset, selected }
    }

    /// Solves the weights of `selected + [asset]` under the bounds of the
    /// portfolio's stage.
    ///
    /// # Errors
    ///
    /// Fails only on malformed input, such as a ticker outside the universe.
    /// Non-convergence is reported in the outcome.
    pub fn evaluate(&self, ctx: &OptimizationContext<'_>) -> Result<CandidateOutcome> {
        let mut indices = ctx.universe().indices_of(self.selected)?;
        indices.push(ctx.universe().index_of(self.asset)?);

        let size = indices.len();
        let objective = ctx.objective(&indices);
        let bounds = ctx.bounds().bounds(size, ctx.portfolio_size());

        let solution = ctx.solver().minimize(&objective, &bounds)?;
        debug!(
            asset = self.asset,
            size,
            status = %solution.status,
            objective = solution.objective_value,
            "evaluated candidate"
        );
        Ok(CandidateOutcome::from_solution(self.asset, solution))
    }
}

/// Picks the outcome with the smallest objective value.
///
/// Ties keep the earliest outcome, so the result depends on the order the
/// outcomes are listed in. Failed outcomes carry `+∞` and only win when
/// nothing converged.
pub fn best_candidate(outcomes: Vec<CandidateOutcome>) -> Option<CandidateOutcome> {
    outcomes.into_iter().reduce(|best, next| {
        if next.objective_value < best.objective_value {
            next
        } else {
            best
        }
    })
}
