#![allow(dead_code)]

use flavor_core::FlavorError;
use flavor_rules::{pdg_2024, Observation, ParameterTable};
use flavor_thy::{compare_table, ComparisonResult, ExperimentWindow, Policy};

pub fn pdg_table() -> &'static ParameterTable {
    pdg_2024().expect("embedded table parses")
}

pub fn pdg_comparisons() -> Result<Vec<ComparisonResult>, FlavorError> {
    compare_table(pdg_table(), &Policy::default())
}

/// Policy with JUNO active and reporting `central ± uncertainty`.
pub fn juno_policy(central: f64, uncertainty: f64) -> Policy {
    Policy::default().with_window(ExperimentWindow::juno().activate(Some(Observation {
        central,
        uncertainty,
    })))
}

pub fn approx(actual: f64, expected: f64, tol: f64) -> bool {
    (actual - expected).abs() <= tol
}
