use std::collections::BTreeMap;

use flavor_core::errors::FlavorError;
use flavor_core::{RunProvenance, SchemaVersion};
use flavor_rules::{GenerationHierarchy, ParameterTable};

use crate::deviation::{compare_parameter, percentage_deviation, ComparisonResult};
use crate::hash::stable_hash_string;
use crate::judge::judge;
use crate::policies::Policy;
use crate::report::{ExtendedComparison, FlavorReport};

/// Schema of [`FlavorReport`] payloads.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Compares every table parameter, substituting active experiment measurements.
pub fn compare_table(table: &ParameterTable, policy: &Policy) -> Result<Vec<ComparisonResult>, FlavorError> {
    table
        .parameters
        .iter()
        .map(|parameter| {
            let measurement = policy.active_window(parameter.id).and_then(|window| {
                window
                    .measurement
                    .map(|observation| (window.experiment.as_str(), observation))
            });
            compare_parameter(parameter, measurement, &table.version, policy.sigma_threshold)
        })
        .collect()
}

/// Compares the exploratory predictions that have an observation in the table.
pub fn compare_extended(table: &ParameterTable) -> Result<Vec<ExtendedComparison>, FlavorError> {
    let hierarchy = GenerationHierarchy::standard();
    let mut out = Vec::with_capacity(table.extended.len());
    for (id, quantity) in &table.extended {
        let prediction = hierarchy.evaluate_extended(*id)?;
        let predicted = prediction.value();
        let observed = quantity.value();
        let percent_deviation = percentage_deviation(predicted, observed)?;
        out.push(ExtendedComparison {
            id: *id,
            label: id.label().to_string(),
            formula: prediction.formula,
            predicted_exact: prediction.exact,
            predicted,
            observed,
            percent_deviation,
        });
    }
    Ok(out)
}

/// Runs the full pipeline: evaluate, compare, judge, report.
///
/// Either a complete report is returned or the first error; nothing partial.
pub fn assess(table: &ParameterTable, policy: &Policy) -> Result<FlavorReport, FlavorError> {
    policy.validate()?;
    let comparisons = compare_table(table, policy)?;
    let verdict = judge(&comparisons, policy)?;
    let extended = compare_extended(table)?;
    let cross_relation = GenerationHierarchy::standard().cross_relation_theta13();

    let mut input_hashes = BTreeMap::new();
    input_hashes.insert("table".to_string(), stable_hash_string(table)?);
    input_hashes.insert("policy".to_string(), stable_hash_string(policy)?);
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert("flavor-thy".to_string(), env!("CARGO_PKG_VERSION").to_string());
    let provenance = RunProvenance {
        schema_version: REPORT_SCHEMA,
        table_version: table.version.clone(),
        table_source: table.source.clone(),
        input_hashes,
        tool_versions,
    };

    FlavorReport::new(
        comparisons,
        verdict,
        extended,
        cross_relation,
        policy.clone(),
        provenance,
    )
}
