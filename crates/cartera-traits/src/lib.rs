#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cartera/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the cartera portfolio builder.
//!
//! This crate provides the read-only inputs of an optimization run and the
//! error taxonomy shared by every other cartera crate.

/// The version of the cartera-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod objective;
pub mod types;

// Re-exports
pub use error::{CarteraError, Result, ValidationError};
pub use objective::Objective;
pub use types::{AssetUniverse, CovarianceMatrix, Horizon, Predictions, Ticker};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
