use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_core::RunProvenance;
use flavor_rules::{CrossRelation, Exact, ExtendedId};
use serde::{Deserialize, Serialize};

use crate::deviation::ComparisonResult;
use crate::hash::stable_hash_string;
use crate::judge::HypothesisVerdict;
use crate::policies::Policy;
use crate::serde::to_canonical_json_bytes;

/// Exploratory prediction next to its observation. Never judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedComparison {
    /// Quantity compared.
    pub id: ExtendedId,
    /// Display label.
    pub label: String,
    /// Derivation of the prediction.
    pub formula: String,
    /// Exact prediction.
    pub predicted_exact: Exact,
    /// Floating point view of the prediction.
    pub predicted: f64,
    /// Observed value.
    pub observed: f64,
    /// Percentage deviation.
    pub percent_deviation: f64,
}

/// Complete result of one run: comparisons, verdict and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorReport {
    /// Content-addressed hash of the report payload.
    pub analysis_hash: String,
    /// Per-parameter comparisons in table order.
    pub comparisons: Vec<ComparisonResult>,
    /// Aggregate verdict.
    pub verdict: HypothesisVerdict,
    /// Exploratory predictions.
    pub extended: Vec<ExtendedComparison>,
    /// sin²(θ₁₃)_PMNS / sin(θ₁₃)_CKM relation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_relation: Option<CrossRelation>,
    /// Policy applied during the run.
    pub policy: Policy,
    /// Table version, input hashes and tool versions.
    pub provenance: RunProvenance,
}

impl FlavorReport {
    /// Assembles a report and computes its stable hash.
    pub fn new(
        comparisons: Vec<ComparisonResult>,
        verdict: HypothesisVerdict,
        extended: Vec<ExtendedComparison>,
        cross_relation: Option<CrossRelation>,
        policy: Policy,
        provenance: RunProvenance,
    ) -> Result<Self, FlavorError> {
        let analysis_hash = stable_hash_string(&(
            &comparisons,
            &verdict,
            &extended,
            &cross_relation,
            &policy,
            &provenance,
        ))?;
        Ok(Self {
            analysis_hash,
            comparisons,
            verdict,
            extended,
            cross_relation,
            policy,
            provenance,
        })
    }

    /// Persists the report as canonical JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FlavorError> {
        to_canonical_json_bytes(self)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    parameter: &'a str,
    sector: &'a str,
    label: &'a str,
    predicted_exact: String,
    predicted: f64,
    observed: f64,
    uncertainty: f64,
    absolute_deviation: f64,
    percent_deviation: f64,
    sigma_deviation: f64,
    sigma_threshold: f64,
    within_sigma_threshold: bool,
    source: &'a str,
}

fn wrap_csv(err: csv::Error) -> FlavorError {
    FlavorError::Serde(ErrorInfo::new("csv-write", "failed to write comparison table").with_hint(err.to_string()))
}

/// Renders the comparisons as a CSV table for plotting tools.
pub fn comparisons_to_csv(comparisons: &[ComparisonResult]) -> Result<Vec<u8>, FlavorError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for result in comparisons {
        writer
            .serialize(CsvRow {
                parameter: result.parameter.as_str(),
                sector: result.sector.as_str(),
                label: &result.label,
                predicted_exact: result.predicted_exact.to_string(),
                predicted: result.predicted,
                observed: result.observed,
                uncertainty: result.uncertainty,
                absolute_deviation: result.deviation.absolute,
                percent_deviation: result.deviation.percent,
                sigma_deviation: result.deviation.sigma,
                sigma_threshold: result.sigma_threshold,
                within_sigma_threshold: result.within_sigma_threshold,
                source: &result.observation_source,
            })
            .map_err(wrap_csv)?;
    }
    writer
        .into_inner()
        .map_err(|err| FlavorError::Serde(ErrorInfo::new("csv-write", err.to_string())))
}
