mod common;

use flavor_core::FlavorError;
use flavor_rules::ExtendedId;
use flavor_thy::serde::{from_json_slice, to_canonical_json_bytes};
use flavor_thy::{assess, comparisons_to_csv, FlavorReport, Policy, Status};

use common::{approx, juno_policy, pdg_table};

#[test]
fn repeated_runs_are_byte_identical() -> Result<(), FlavorError> {
    let report_a = assess(pdg_table(), &Policy::default())?;
    let report_b = assess(pdg_table(), &Policy::default())?;
    assert_eq!(report_a, report_b);
    assert_eq!(report_a.to_bytes()?, report_b.to_bytes()?);
    assert_eq!(report_a.analysis_hash.len(), 64);
    Ok(())
}

#[test]
fn report_roundtrip() -> Result<(), FlavorError> {
    let report = assess(pdg_table(), &Policy::default())?;
    let bytes = to_canonical_json_bytes(&report)?;
    let decoded: FlavorReport = from_json_slice(&bytes)?;
    assert_eq!(decoded.analysis_hash, report.analysis_hash);
    assert_eq!(decoded.verdict.status, Status::Supported);
    assert_eq!(decoded.comparisons.len(), 9);
    Ok(())
}

#[test]
fn policy_changes_the_hash() -> Result<(), FlavorError> {
    let baseline = assess(pdg_table(), &Policy::default())?;
    let juno = assess(pdg_table(), &juno_policy(0.295, 0.013))?;
    assert_ne!(baseline.analysis_hash, juno.analysis_hash);
    assert_ne!(
        baseline.provenance.input_hashes.get("policy"),
        juno.provenance.input_hashes.get("policy")
    );
    assert_eq!(
        baseline.provenance.input_hashes.get("table"),
        juno.provenance.input_hashes.get("table")
    );
    Ok(())
}

#[test]
fn report_carries_provenance_and_relations() -> Result<(), FlavorError> {
    let report = assess(pdg_table(), &Policy::default())?;
    assert_eq!(report.provenance.table_version, "pdg-2024");
    let relation = report.cross_relation.as_ref().expect("relation computed");
    assert!(relation.holds());
    let delta = report
        .comparisons
        .iter()
        .find(|c| c.parameter.as_str() == "PMNS_delta")
        .expect("delta present");
    assert!(approx(delta.predicted_deg.unwrap_or_default(), -129.715, 1e-3));
    assert_eq!(delta.observed_deg, Some(-130.0));
    Ok(())
}

#[test]
fn extended_predictions_are_reported() -> Result<(), FlavorError> {
    let report = assess(pdg_table(), &Policy::default())?;
    assert_eq!(report.extended.len(), ExtendedId::ALL.len());
    let alpha = report
        .extended
        .iter()
        .find(|e| e.id == ExtendedId::AlphaEmInverse)
        .expect("alpha present");
    assert_eq!(alpha.predicted_exact.to_string(), "137");
    assert!(approx(alpha.percent_deviation, 0.0263, 1e-3));
    let higgs = report
        .extended
        .iter()
        .find(|e| e.id == ExtendedId::HiggsVevRatio)
        .expect("higgs present");
    assert!(higgs.percent_deviation < 0.05);
    Ok(())
}

#[test]
fn csv_has_one_row_per_parameter() -> Result<(), FlavorError> {
    let report = assess(pdg_table(), &Policy::default())?;
    let bytes = comparisons_to_csv(&report.comparisons)?;
    let text = String::from_utf8(bytes).expect("utf8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with("parameter,sector,label,predicted_exact"));
    assert!(lines.iter().any(|line| line.starts_with("Weinberg,Weinberg,") && line.contains(",false,")));
    Ok(())
}
