#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cartera/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod candidate;
pub mod context;
pub mod greedy;
pub mod pool;
pub mod refine;
pub mod result;
pub mod serialize;

// Re-export main types
pub use candidate::{CandidateOutcome, CandidateTask, best_candidate};
pub use context::{OptimizationContext, RunParams};
pub use greedy::{CandidateOrder, GreedySelector, SelectorConfig};
pub use pool::{WorkerPool, default_workers};
pub use refine::refine;
pub use result::{RunResult, StepRecord};
pub use serialize::{
    DiagnosticReport, OUTPUT_DECIMALS, PortfolioReport, round_value, to_rounded_json,
};
