//! JSON reports with rounded floats.
//!
//! Rounding happens on the serialized value, so a [`RunResult`] is never
//! modified by producing a report from it.

use cartera_traits::{CarteraError, Result, Ticker};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::result::RunResult;

/// Decimal places kept in reports.
pub const OUTPUT_DECIMALS: u32 = 3;

/// Public output: the selection and its weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport<'a> {
    /// Selected assets, in selection order
    pub selected_assets: &'a [Ticker],
    /// Final weights
    pub weights: &'a [f64],
}

/// Full output including the audit trail and solver status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport<'a> {
    /// Selected assets, in selection order
    pub selected_assets: &'a [Ticker],
    /// Final weights
    pub weights: &'a [f64],
    /// Final negated utility
    pub optimal_value: f64,
    /// Cumulative selection after each step
    pub all_selected_assets: Vec<&'a [Ticker]>,
    /// Weights after each step
    pub all_weights: Vec<&'a [f64]>,
    /// Objective value after each step
    pub all_objective_values: Vec<f64>,
    /// Whether the final refinement converged
    pub success: bool,
    /// Solver status message
    pub message: &'a str,
}

impl RunResult {
    /// Public report view.
    pub fn report(&self) -> PortfolioReport<'_> {
        PortfolioReport {
            selected_assets: &self.selected_assets,
            weights: &self.weights,
        }
    }

    /// Diagnostic report view.
    pub fn diagnostics(&self) -> DiagnosticReport<'_> {
        DiagnosticReport {
            selected_assets: &self.selected_assets,
            weights: &self.weights,
            optimal_value: self.objective_value,
            all_selected_assets: self.steps.iter().map(|s| s.selected_assets.as_slice()).collect(),
            all_weights: self.steps.iter().map(|s| s.weights.as_slice()).collect(),
            all_objective_values: self.steps.iter().map(|s| s.objective_value).collect(),
            success: self.success,
            message: &self.message,
        }
    }
}

/// Rounds every float in `value` to `decimals` places, descending into arrays
/// and objects. Integers, strings and booleans pass through.
pub fn round_value(value: Value, decimals: u32) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .and_then(|x| Number::from_f64(round(x, decimals)))
            .map_or(Value::Null, Value::Number),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| round_value(v, decimals))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, round_value(v, decimals)))
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

fn round(x: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (x * factor).round() / factor;
    // -0.0 prints as "-0.0"
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Serializes `value` to pretty JSON with floats rounded to [`OUTPUT_DECIMALS`].
///
/// # Errors
///
/// Returns [`CarteraError::Other`] if `value` cannot be represented as JSON.
pub fn to_rounded_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let raw = serde_json::to_value(value).map_err(|e| CarteraError::Other(e.to_string()))?;
    serde_json::to_string_pretty(&round_value(raw, OUTPUT_DECIMALS))
        .map_err(|e| CarteraError::Other(e.to_string()))
}
