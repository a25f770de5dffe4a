#![deny(missing_docs)]
#![doc = "Deviation measurement and falsification judgement for the generation hierarchy predictions."]

/// End-to-end assessment pipeline.
pub mod assess;
/// Deviation calculator.
pub mod deviation;
/// Canonical hashing helpers.
pub mod hash;
/// Falsification judge.
pub mod judge;
/// Thresholds and experiment windows.
pub mod policies;
/// Report types and tabular export.
pub mod report;
/// Canonical JSON helpers.
pub mod serde;

pub use assess::{assess, compare_extended, compare_table};
pub use deviation::{compare_parameter, deviation, percentage_deviation, ComparisonResult, Deviation};
pub use judge::{judge, BiasCheck, BiasDirection, GlobalRule, HypothesisVerdict, ParameterCheck, ParameterRule, Status};
pub use policies::{ExperimentWindow, Policy, PolicyRange, FAIL_COUNT_LIMIT};
pub use report::{comparisons_to_csv, ExtendedComparison, FlavorReport};
