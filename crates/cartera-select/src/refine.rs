//! Final refinement of the selected portfolio.

use cartera_traits::Result;
use tracing::{info, warn};

use crate::context::OptimizationContext;
use crate::result::{RunResult, StepRecord};

/// Re-solves the last step's selection under the final-stage bounds.
///
/// If the refinement does not converge, the last step's weights and objective
/// are kept and the result is flagged unsuccessful with the solver message
/// attached.
///
/// Returns `None` when `steps` is empty: nothing was selected, so there is no
/// portfolio to refine.
pub fn refine(ctx: &OptimizationContext<'_>, steps: Vec<StepRecord>) -> Result<Option<RunResult>> {
    let Some(last) = steps.last() else {
        return Ok(None);
    };

    let selected_assets = last.selected_assets.clone();
    let indices = ctx.universe().indices_of(&selected_assets)?;
    let objective = ctx.objective(&indices);
    let bounds = ctx.bounds().final_bounds(indices.len());

    let solution = ctx.solver().minimize(&objective, &bounds)?;
    let success = solution.success();
    let (weights, objective_value) = solution.weights.map_or_else(
        || {
            warn!(
                assets = indices.len(),
                status = %solution.status,
                "refinement failed, keeping last greedy weights"
            );
            (last.weights.clone(), last.objective_value)
        },
        |weights| {
            info!(
                assets = indices.len(),
                objective = solution.objective_value,
                iterations = solution.iterations,
                "refined final weights"
            );
            (weights.to_vec(), solution.objective_value)
        },
    );

    Ok(Some(RunResult {
        selected_assets,
        weights,
        objective_value,
        steps,
        success,
        message: solution.status.message().to_string(),
    }))
}
