use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_rules::ParameterId;
use serde::{Deserialize, Serialize};

use crate::deviation::ComparisonResult;
use crate::policies::{Policy, FAIL_COUNT_LIMIT};

/// Overall judgement of the hypothesis.
///
/// There is no "proven" state: surviving every check only means the data
/// does not currently reject the predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// No falsification rule triggered.
    Supported,
    /// At least one decisive falsification rule triggered.
    Falsified,
}

impl Status {
    /// Short label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Supported => "supported",
            Status::Falsified => "falsified",
        }
    }

    /// Label with the qualification printed next to it.
    pub fn describe(&self) -> &'static str {
        match self {
            Status::Supported => "SUPPORTED (not rejected by current data; not proven)",
            Status::Falsified => "FALSIFIED",
        }
    }
}

/// Per-parameter rule that can reject a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRule {
    /// Sigma deviation above the policy threshold.
    Sigma,
    /// Value outside an active experiment window.
    ExperimentWindow,
}

/// Hypothesis-level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRule {
    /// Two or more parameters failed.
    FailCount,
    /// Average percentage deviation reached the policy limit.
    AveragePercent,
    /// Deviations share a sign more often than the policy majority.
    SystematicBias,
}

/// Outcome of an active experiment window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowCheck {
    /// Experiment name.
    pub experiment: String,
    /// Accepted interval `[min, max]`.
    pub interval: [f64; 2],
    /// Whether the predicted value lies inside.
    pub predicted_inside: bool,
    /// Whether the observed central value lies inside.
    pub observed_inside: bool,
}

impl WindowCheck {
    /// Whether both values lie inside the window.
    pub fn pass(&self) -> bool {
        self.predicted_inside && self.observed_inside
    }
}

/// Per-parameter verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCheck {
    /// Parameter identifier.
    pub parameter: ParameterId,
    /// Whether the parameter survived every applicable rule.
    pub pass: bool,
    /// Sigma deviation of the comparison.
    pub sigma: f64,
    /// Sigma threshold applied.
    pub sigma_threshold: f64,
    /// Window outcome, when an experiment window is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowCheck>,
    /// Rules the parameter failed, in evaluation order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_rules: Vec<ParameterRule>,
}

/// Direction shared by most deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasDirection {
    /// Predictions above the observations.
    Overshoot,
    /// Predictions below the observations.
    Undershoot,
}

/// Sign census of `predicted - observed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasCheck {
    /// Count of positive deviations.
    pub positive: usize,
    /// Count of negative deviations.
    pub negative: usize,
    /// Count required to flag a bias.
    pub majority: usize,
    /// Whether a bias was flagged.
    pub flagged: bool,
    /// Dominant direction when flagged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<BiasDirection>,
}

/// Aggregate verdict over every comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisVerdict {
    /// Overall status.
    pub status: Status,
    /// Number of failing parameters.
    pub fail_count: usize,
    /// Failing parameters in input order.
    pub failing: Vec<ParameterId>,
    /// Mean percentage deviation over all parameters.
    pub average_percent_deviation: f64,
    /// Sign census.
    pub systematic_bias: BiasCheck,
    /// Rules that decided a falsification.
    pub falsified_by: Vec<GlobalRule>,
    /// Signals reported alongside a falsification without deciding it.
    pub contributing: Vec<GlobalRule>,
    /// Per-parameter verdicts in input order.
    pub checks: Vec<ParameterCheck>,
    /// Human readable remarks.
    pub notes: Vec<String>,
}

fn ensure_complete(results: &[ComparisonResult]) -> Result<(), FlavorError> {
    let missing: Vec<&str> = ParameterId::ALL
        .iter()
        .filter(|id| !results.iter().any(|result| result.parameter == **id))
        .map(|id| id.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(FlavorError::MissingParameter(
            ErrorInfo::new(
                "missing-parameter",
                format!(
                    "judge requires {} comparisons, missing {}",
                    ParameterId::ALL.len(),
                    missing.join(", ")
                ),
            )
            .with_context("supplied", results.len().to_string())
            .with_context("missing", missing.join(",")),
        ));
    }
    if results.len() != ParameterId::ALL.len() {
        return Err(FlavorError::malformed(
            "duplicate-result",
            format!("judge received {} comparisons for {} parameters", results.len(), ParameterId::ALL.len()),
        ));
    }
    Ok(())
}

fn check_parameter(result: &ComparisonResult, policy: &Policy) -> ParameterCheck {
    let mut failed_rules = Vec::new();
    if result.deviation.sigma > policy.sigma_threshold {
        failed_rules.push(ParameterRule::Sigma);
    }
    let window = policy.active_window(result.parameter).map(|window| WindowCheck {
        experiment: window.experiment.clone(),
        interval: [window.interval.min, window.interval.max],
        predicted_inside: window.interval.contains(result.predicted),
        observed_inside: window.interval.contains(result.observed),
    });
    if let Some(check) = &window {
        if !check.pass() {
            failed_rules.push(ParameterRule::ExperimentWindow);
        }
    }
    let pass = failed_rules.is_empty();
    if pass {
        tracing::debug!(parameter = %result.parameter, sigma = result.deviation.sigma, "parameter passes");
    } else {
        tracing::warn!(
            parameter = %result.parameter,
            sigma = result.deviation.sigma,
            rules = ?failed_rules,
            "parameter fails"
        );
    }
    ParameterCheck {
        parameter: result.parameter,
        pass,
        sigma: result.deviation.sigma,
        sigma_threshold: policy.sigma_threshold,
        window,
        failed_rules,
    }
}

fn bias_census(results: &[ComparisonResult], majority: usize) -> BiasCheck {
    let positive = results.iter().filter(|r| r.deviation.signed > 0.0).count();
    let negative = results.iter().filter(|r| r.deviation.signed < 0.0).count();
    let direction = if positive >= majority {
        Some(BiasDirection::Overshoot)
    } else if negative >= majority {
        Some(BiasDirection::Undershoot)
    } else {
        None
    };
    BiasCheck {
        positive,
        negative,
        majority,
        flagged: direction.is_some(),
        direction,
    }
}

/// Judges the complete set of comparisons against `policy`.
///
/// The hypothesis is falsified when at least [`FAIL_COUNT_LIMIT`] parameters
/// fail or the average percentage deviation reaches the policy limit. A
/// systematic bias is reported but never falsifies on its own.
pub fn judge(results: &[ComparisonResult], policy: &Policy) -> Result<HypothesisVerdict, FlavorError> {
    policy.validate()?;
    ensure_complete(results)?;

    let checks: Vec<ParameterCheck> = results
        .iter()
        .map(|result| check_parameter(result, policy))
        .collect();
    let failing: Vec<ParameterId> = checks
        .iter()
        .filter(|check| !check.pass)
        .map(|check| check.parameter)
        .collect();
    let fail_count = failing.len();
    let average_percent_deviation =
        results.iter().map(|r| r.deviation.percent).sum::<f64>() / results.len() as f64;
    let systematic_bias = bias_census(results, policy.bias_majority);

    let mut falsified_by = Vec::new();
    if fail_count >= FAIL_COUNT_LIMIT {
        falsified_by.push(GlobalRule::FailCount);
    }
    if average_percent_deviation >= policy.average_percent_max {
        falsified_by.push(GlobalRule::AveragePercent);
    }
    let status = if falsified_by.is_empty() {
        Status::Supported
    } else {
        Status::Falsified
    };
    let mut contributing = Vec::new();
    if systematic_bias.flagged && status == Status::Falsified {
        contributing.push(GlobalRule::SystematicBias);
    }

    let mut notes = Vec::new();
    for check in checks.iter().filter(|check| !check.pass) {
        notes.push(format!(
            "{} fails ({:.2}σ against a {:.1}σ threshold{})",
            check.parameter,
            check.sigma,
            check.sigma_threshold,
            match &check.window {
                Some(window) if !window.pass() => format!(", outside the {} window", window.experiment),
                _ => String::new(),
            }
        ));
    }
    if systematic_bias.flagged && status == Status::Supported {
        notes.push(format!(
            "systematic bias flagged ({} positive, {} negative); reported only, not decisive",
            systematic_bias.positive, systematic_bias.negative
        ));
    }
    if status == Status::Supported {
        notes.push("supported means not rejected by current data; it is not a proof".to_string());
    }

    tracing::info!(
        status = status.as_str(),
        fail_count,
        average_percent_deviation,
        bias = systematic_bias.flagged,
        "hypothesis judged"
    );

    Ok(HypothesisVerdict {
        status,
        fail_count,
        failing,
        average_percent_deviation,
        systematic_bias,
        falsified_by,
        contributing,
        checks,
        notes,
    })
}
