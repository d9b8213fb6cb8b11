//! Greedy forward selection.

use cartera_optim::{BoundPolicy, SolverConfig, WeightSolver};
use cartera_traits::{AssetUniverse, CovarianceMatrix, Predictions, Result, Ticker};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::candidate::{CandidateTask, best_candidate};
use crate::context::{OptimizationContext, RunParams};
use crate::pool::WorkerPool;
use crate::refine::refine;
use crate::result::{RunResult, StepRecord};

/// Order in which remaining candidates are enumerated each iteration.
///
/// Ties on the objective go to the candidate enumerated first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateOrder {
    /// Row order of the predictions table
    #[default]
    Universe,
    /// Lexicographic ticker order
    Ticker,
}

/// Configuration for greedy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Worker threads, `None` for one less than the available parallelism
    pub n_workers: Option<usize>,

    /// Per-candidate solver settings
    pub solver: SolverConfig,

    /// Staged weight bounds
    pub bounds: BoundPolicy,

    /// Candidate enumeration order, which decides ties
    pub candidate_order: CandidateOrder,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            n_workers: None,
            solver: SolverConfig::default(),
            bounds: BoundPolicy::default(),
            candidate_order: CandidateOrder::Universe,
        }
    }
}

/// Builds a portfolio one asset at a time.
///
/// Each iteration solves the weights of `selected + [candidate]` for every
/// remaining candidate over a worker pool, keeps the candidate with the lowest
/// negated utility and records the step. Growth stops at the target size or at
/// the first iteration where no candidate converges. The final selection is
/// then re-solved under the final-stage bounds.
///
/// # Examples
///
/// ```rust
/// use cartera_select::{GreedySelector, RunParams, SelectorConfig};
/// use cartera_traits::{AssetUniverse, CovarianceMatrix, Horizon, Predictions};
/// use ndarray::{Array1, Array2};
/// use std::collections::BTreeMap;
///
/// let n = 12;
/// let universe = AssetUniverse::new((0..n).map(|i| format!("A{i}"))).unwrap();
/// let mut returns = BTreeMap::new();
/// returns.insert(
///     Horizon::months(12),
///     Array1::from_iter((0..n).map(|i| 0.02 + 0.01 * i as f64)),
/// );
/// let predictions = Predictions::new(universe, returns).unwrap();
/// let covariance = CovarianceMatrix::new(Array2::eye(n) * 0.04);
///
/// let selector = GreedySelector::new(SelectorConfig::default());
/// let params = RunParams {
///     lambda: 2.0,
///     horizon: Horizon::months(12),
///     portfolio_size: 8,
/// };
/// let result = selector.run(&predictions, &covariance, params).unwrap().unwrap();
/// assert!(result.success);
/// assert_eq!(result.selected_assets.len(), 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedySelector {
    config: SelectorConfig,
}

impl GreedySelector {
    /// Creates a selector.
    pub const fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// The selector configuration.
    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Runs greedy selection followed by final refinement.
    ///
    /// Returns `Ok(None)` when not even the first asset could be placed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected inputs before any solve runs,
    /// [`CarteraError::WorkerPool`](cartera_traits::CarteraError::WorkerPool)
    /// if the pool cannot start, or any error raised inside a worker.
    pub fn run(
        &self,
        predictions: &Predictions,
        covariance: &CovarianceMatrix,
        params: RunParams,
    ) -> Result<Option<RunResult>> {
        let ctx = OptimizationContext::new(
            predictions,
            covariance,
            params,
            self.config.bounds,
            WeightSolver::new(self.config.solver),
        )?;
        let pool = WorkerPool::new(self.config.n_workers)?;
        let target = ctx.portfolio_size();

        info!(
            universe = ctx.universe().len(),
            horizon = %params.horizon,
            lambda = params.lambda,
            target,
            workers = pool.workers(),
            "starting greedy selection"
        );

        let mut remaining = self.enumeration(ctx.universe());
        let mut selected: Vec<Ticker> = Vec::with_capacity(target);
        let mut steps: Vec<StepRecord> = Vec::with_capacity(target);

        while selected.len() < target {
            let tasks: Vec<CandidateTask<'_>> = remaining
                .iter()
                .map(|asset| CandidateTask::new(asset, &selected))
                .collect();
            let outcomes = pool.map(&tasks, |task| task.evaluate(&ctx))?;

            let Some(best) = best_candidate(outcomes) else {
                break;
            };
            let Some(weights) = best.weights else {
                warn!(
                    step = selected.len() + 1,
                    status = %best.status,
                    "no candidate converged, stopping early"
                );
                break;
            };

            remaining.retain(|asset| *asset != best.asset);
            selected.push(best.asset);
            info!(
                step = selected.len(),
                asset = selected.last().map(String::as_str),
                objective = best.objective_value,
                "selected asset"
            );
            steps.push(StepRecord {
                selected_assets: selected.clone(),
                weights: weights.to_vec(),
                objective_value: best.objective_value,
            });
        }

        if steps.is_empty() {
            warn!("no asset could be selected");
        } else if selected.len() < target {
            warn!(selected = selected.len(), target, "portfolio is smaller than requested");
        }

        refine(&ctx, steps)
    }

    fn enumeration<'a>(&self, universe: &'a AssetUniverse) -> Vec<&'a str> {
        let mut tickers: Vec<&str> = universe.tickers().iter().map(String::as_str).collect();
        if self.config.candidate_order == CandidateOrder::Ticker {
            tickers.sort_unstable();
        }
        tickers
    }
}
