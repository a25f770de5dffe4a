mod common;

use flavor_core::FlavorError;
use flavor_rules::{Observation, ParameterId};
use flavor_thy::{
    compare_table, judge, ExperimentWindow, GlobalRule, ParameterRule, Policy, Status,
};

use common::{juno_policy, pdg_comparisons, pdg_table};

#[test]
fn juno_window_falsifies_theta12_that_passes_three_sigma() -> Result<(), FlavorError> {
    let policy = juno_policy(0.295, 0.013);
    let comparisons = compare_table(pdg_table(), &policy)?;
    let theta12 = comparisons
        .iter()
        .find(|r| r.parameter == ParameterId::PmnsTheta12)
        .expect("theta12 present");
    assert_eq!(theta12.observation_source, "JUNO");
    assert_eq!(theta12.observed, 0.295);
    assert!(theta12.within_sigma_threshold, "sigma {}", theta12.deviation.sigma);

    let verdict = judge(&comparisons, &policy)?;
    let check = verdict
        .checks
        .iter()
        .find(|c| c.parameter == ParameterId::PmnsTheta12)
        .expect("theta12 check");
    assert!(!check.pass);
    assert_eq!(check.failed_rules, vec![ParameterRule::ExperimentWindow]);
    let window = check.window.as_ref().expect("window evaluated");
    assert!(window.predicted_inside);
    assert!(!window.observed_inside);

    // Weinberg plus JUNO reaches the two-parameter limit.
    assert_eq!(verdict.fail_count, 2);
    assert_eq!(verdict.status, Status::Falsified);
    assert_eq!(verdict.falsified_by, vec![GlobalRule::FailCount]);
    Ok(())
}

#[test]
fn juno_measurement_inside_window_passes() -> Result<(), FlavorError> {
    let policy = juno_policy(0.3075, 0.003);
    let comparisons = compare_table(pdg_table(), &policy)?;
    let verdict = judge(&comparisons, &policy)?;
    assert_eq!(verdict.fail_count, 1);
    assert_eq!(verdict.status, Status::Supported);
    Ok(())
}

#[test]
fn inactive_window_is_ignored() -> Result<(), FlavorError> {
    let mut window = ExperimentWindow::juno();
    window.interval.min = 0.31;
    let policy = Policy::default().with_window(window);
    let verdict = judge(&pdg_comparisons()?, &policy)?;
    assert!(verdict.checks.iter().all(|c| c.window.is_none()));
    assert_eq!(verdict.fail_count, 1);
    Ok(())
}

#[test]
fn dune_window_checks_predicted_phase() -> Result<(), FlavorError> {
    let mut window = ExperimentWindow::dune().activate(None);
    window.interval.max = -0.78;
    let policy = Policy::default().with_window(window);
    let comparisons = compare_table(pdg_table(), &policy)?;
    let verdict = judge(&comparisons, &policy)?;
    let check = verdict
        .checks
        .iter()
        .find(|c| c.parameter == ParameterId::PmnsDelta)
        .expect("delta check");
    let window = check.window.as_ref().expect("window evaluated");
    assert!(!window.predicted_inside);
    assert!(!check.pass);
    Ok(())
}

#[test]
fn default_dune_window_accepts_the_prediction() -> Result<(), FlavorError> {
    let policy = Policy::default().with_window(ExperimentWindow::dune().activate(None));
    let verdict = judge(&compare_table(pdg_table(), &policy)?, &policy)?;
    let check = verdict
        .checks
        .iter()
        .find(|c| c.parameter == ParameterId::PmnsDelta)
        .expect("delta check");
    assert!(check.pass);
    Ok(())
}

#[test]
fn large_average_deviation_falsifies_with_bias_as_contributor() -> Result<(), FlavorError> {
    let mut comparisons = pdg_comparisons()?;
    for result in &mut comparisons {
        result.deviation.percent = 2.5;
        result.deviation.signed = -result.deviation.absolute.max(1e-9);
    }
    let verdict = judge(&comparisons, &Policy::default())?;
    assert_eq!(verdict.status, Status::Falsified);
    assert_eq!(verdict.falsified_by, vec![GlobalRule::AveragePercent]);
    assert!(verdict.systematic_bias.flagged);
    assert_eq!(verdict.contributing, vec![GlobalRule::SystematicBias]);
    Ok(())
}

#[test]
fn average_at_limit_falsifies() -> Result<(), FlavorError> {
    let mut comparisons = pdg_comparisons()?;
    for result in &mut comparisons {
        result.deviation.percent = 2.0;
    }
    let verdict = judge(&comparisons, &Policy::default())?;
    assert!(verdict.falsified_by.contains(&GlobalRule::AveragePercent));
    Ok(())
}

#[test]
fn fewer_than_nine_results_is_missing_parameter() -> Result<(), FlavorError> {
    let mut comparisons = pdg_comparisons()?;
    comparisons.retain(|r| r.parameter != ParameterId::CkmDelta);
    let err = judge(&comparisons, &Policy::default()).unwrap_err();
    assert!(matches!(err, FlavorError::MissingParameter(_)));
    assert_eq!(err.info().context.get("missing").map(String::as_str), Some("CKM_delta"));
    Ok(())
}

#[test]
fn empty_input_is_missing_parameter() {
    let err = judge(&[], &Policy::default()).unwrap_err();
    assert!(matches!(err, FlavorError::MissingParameter(_)));
}

#[test]
fn duplicated_result_is_rejected() -> Result<(), FlavorError> {
    let mut comparisons = pdg_comparisons()?;
    let extra = comparisons[0].clone();
    comparisons.push(extra);
    let err = judge(&comparisons, &Policy::default()).unwrap_err();
    assert!(matches!(err, FlavorError::MalformedConfiguration(_)));
    Ok(())
}

#[test]
fn measurement_with_zero_uncertainty_aborts_the_comparison() {
    let policy = juno_policy(0.307, 0.0);
    let err = compare_table(pdg_table(), &policy).unwrap_err();
    assert!(matches!(err, FlavorError::InvalidUncertainty(_)));
    assert_eq!(err.info().context.get("parameter").map(String::as_str), Some("PMNS_theta12"));
}

#[test]
fn inconsistent_policy_is_rejected() {
    let mut policy = Policy::default();
    policy.bias_majority = 4;
    assert!(matches!(policy.validate(), Err(FlavorError::MalformedConfiguration(_))));

    let mut policy = Policy::default();
    policy.windows.push(ExperimentWindow::juno());
    assert!(policy.validate().is_err());

    let mut window = ExperimentWindow::juno();
    window.measurement = Some(Observation { central: 0.3, uncertainty: 0.003 });
    let policy = Policy::default().with_window(window);
    assert!(policy.validate().is_err());
}

#[test]
fn comparison_flag_follows_policy_threshold() -> Result<(), FlavorError> {
    let policy = Policy {
        sigma_threshold: 1.0,
        ..Policy::default()
    };
    let comparisons = compare_table(pdg_table(), &policy)?;
    let verdict = judge(&comparisons, &policy)?;
    for (result, check) in comparisons.iter().zip(&verdict.checks) {
        assert_eq!(result.sigma_threshold, 1.0);
        assert_eq!(result.within_sigma_threshold, check.pass, "{}", result.parameter);
    }
    // CKM_theta12 sits at 1.10σ.
    assert!(verdict.failing.contains(&ParameterId::CkmTheta12));
    assert!(verdict.failing.contains(&ParameterId::Weinberg));
    Ok(())
}
