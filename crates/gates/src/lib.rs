//! xUnit Pipeline Gates
//!
//! Result aggregation and threshold evaluation.
//!
//! ## Module Organization
//!
//! - `models` - `TestResultAggregate` with identity-keyed merge and recount
//! - `threshold` - `ResultThreshold` trait, `Threshold` rules, `ThresholdEvaluator`

pub mod models;
pub mod threshold;

pub use models::{CaseResult, CaseStatus, SuiteResult, TestResultAggregate};
pub use threshold::{ResultThreshold, Threshold, ThresholdEvaluator, ThresholdKind, ThresholdMode};
