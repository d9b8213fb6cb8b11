//! Error types for the cartera framework.
//!
//! Input-validation failures are grouped under [`ValidationError`] so callers
//! can tell a rejected request apart from a programming or I/O error. Solver
//! non-convergence is never an error: it is reported through solver status
//! values and the run result's success flag.

use thiserror::Error;

/// Rejected optimization inputs, raised before any optimization work begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Risk aversion must be strictly positive.
    #[error("lambda must be positive, got {0}")]
    NonPositiveRiskAversion(f64),

    /// The covariance matrix does not match the predictions table.
    #[error("covariance matrix has shape ({rows}, {cols}), expected ({expected}, {expected})")]
    CovarianceShape {
        /// Number of rows in the supplied matrix
        rows: usize,
        /// Number of columns in the supplied matrix
        cols: usize,
        /// Number of assets in the predictions table
        expected: usize,
    },

    /// Requested portfolio size falls outside `1..=N`.
    #[error("portfolio size {size} is outside 1..={universe}")]
    PortfolioSize {
        /// Requested size
        size: usize,
        /// Number of assets in the universe
        universe: usize,
    },

    /// No predictions column exists for the requested horizon.
    #[error("no predictions for a {horizon}-month horizon (available: {available})")]
    UnsupportedHorizon {
        /// Requested horizon in months
        horizon: u32,
        /// Comma-separated list of available horizons
        available: String,
    },

    /// The same ticker appears twice in the predictions table.
    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// The main error type for cartera operations.
#[derive(Debug, Error)]
pub enum CarteraError {
    /// The request was rejected during input validation.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A ticker is not part of the asset universe.
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// The worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl CarteraError {
    /// Returns `true` if the error is an input-validation failure.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A specialized Result type for cartera operations.
pub type Result<T> = std::result::Result<T, CarteraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CarteraError::TickerNotFound("ZZZ".to_string());
        assert_eq!(err.to_string(), "Ticker not found: ZZZ");

        let err = CarteraError::MissingColumn("ticker".to_string());
        assert_eq!(err.to_string(), "Missing required column: ticker");
    }

    #[test]
    fn test_validation_display() {
        let err: CarteraError = ValidationError::CovarianceShape {
            rows: 4,
            cols: 4,
            expected: 5,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid input: covariance matrix has shape (4, 4), expected (5, 5)"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation_variants_are_distinct() {
        let lambda = ValidationError::NonPositiveRiskAversion(0.0);
        let size = ValidationError::PortfolioSize {
            size: 6,
            universe: 5,
        };
        assert_ne!(lambda, size);
        assert_eq!(size.to_string(), "portfolio size 6 is outside 1..=5");
    }

    #[test]
    fn test_other_is_not_validation() {
        let err = CarteraError::Other("boom".to_string());
        assert_eq!(err.to_string(), "Error: boom");
        assert!(!err.is_validation());
    }
}
