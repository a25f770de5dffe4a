use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_rules::{Observation, ParameterId};
use serde::{Deserialize, Serialize};

/// Number of failing parameters that falsifies the hypothesis. Not configurable.
pub const FAIL_COUNT_LIMIT: usize = 2;

/// Inclusive range used for acceptance checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyRange {
    /// Minimum accepted value.
    pub min: f64,
    /// Maximum accepted value.
    pub max: f64,
}

impl PolicyRange {
    /// Creates a range from its bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns whether the provided value lies within the inclusive range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Precision window declared for an upcoming experiment.
///
/// While inactive the window is informational. Once active, the parameter
/// fails if either the predicted value or the observed central value leaves
/// the interval. An active window may carry the experiment's own measurement,
/// which replaces the table observation for that parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExperimentWindow {
    /// Experiment name, e.g. `JUNO`.
    pub experiment: String,
    /// Parameter the window applies to.
    pub parameter: ParameterId,
    /// Accepted interval.
    pub interval: PolicyRange,
    /// Expected one sigma precision of the experiment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,
    /// Whether the experiment has reported (post-measurement mode).
    #[serde(default)]
    pub active: bool,
    /// Measurement reported by the experiment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Observation>,
}

impl ExperimentWindow {
    /// JUNO window on sin²(θ₁₂)_PMNS.
    pub fn juno() -> Self {
        Self {
            experiment: "JUNO".to_string(),
            parameter: ParameterId::PmnsTheta12,
            interval: PolicyRange::new(0.304, 0.311),
            precision: Some(0.003),
            active: false,
            measurement: None,
        }
    }

    /// DUNE window on sin(δ)_PMNS.
    pub fn dune() -> Self {
        Self {
            experiment: "DUNE".to_string(),
            parameter: ParameterId::PmnsDelta,
            interval: PolicyRange::new(-0.83, -0.71),
            precision: None,
            active: false,
            measurement: None,
        }
    }

    /// Activates the window with a reported measurement.
    pub fn activate(mut self, measurement: Option<Observation>) -> Self {
        self.active = true;
        self.measurement = measurement;
        self
    }
}

/// Thresholds controlling the falsification judgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    /// Sigma multiple beyond which a single parameter fails.
    #[serde(default = "Policy::default_sigma_threshold")]
    pub sigma_threshold: f64,
    /// Average percentage deviation at or above which the hypothesis is falsified.
    #[serde(default = "Policy::default_average_percent_max")]
    pub average_percent_max: f64,
    /// Count of same-sign deviations that flags a systematic bias.
    #[serde(default = "Policy::default_bias_majority")]
    pub bias_majority: usize,
    /// Experiment precision windows.
    #[serde(default = "Policy::default_windows")]
    pub windows: Vec<ExperimentWindow>,
}

impl Policy {
    const fn default_sigma_threshold() -> f64 {
        3.0
    }

    const fn default_average_percent_max() -> f64 {
        2.0
    }

    const fn default_bias_majority() -> usize {
        7
    }

    fn default_windows() -> Vec<ExperimentWindow> {
        vec![ExperimentWindow::juno(), ExperimentWindow::dune()]
    }

    /// Active window for `parameter`, if any.
    pub fn active_window(&self, parameter: ParameterId) -> Option<&ExperimentWindow> {
        self.windows
            .iter()
            .find(|window| window.active && window.parameter == parameter)
    }

    /// Replaces the window for the same parameter, or appends it.
    pub fn with_window(mut self, window: ExperimentWindow) -> Self {
        self.windows.retain(|existing| existing.parameter != window.parameter);
        self.windows.push(window);
        self
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), FlavorError> {
        if !self.sigma_threshold.is_finite() || self.sigma_threshold <= 0.0 {
            return Err(policy_error("sigma_threshold", "must be positive and finite"));
        }
        if !self.average_percent_max.is_finite() || self.average_percent_max <= 0.0 {
            return Err(policy_error("average_percent_max", "must be positive and finite"));
        }
        let total = ParameterId::ALL.len();
        if self.bias_majority * 2 <= total || self.bias_majority > total {
            return Err(policy_error(
                "bias_majority",
                &format!("must be a strict majority of {total}, at most {total}"),
            ));
        }
        for (idx, window) in self.windows.iter().enumerate() {
            let PolicyRange { min, max } = window.interval;
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(window_error(window, "interval", "must satisfy min <= max"));
            }
            if self.windows[..idx]
                .iter()
                .any(|other| other.parameter == window.parameter)
            {
                return Err(window_error(window, "parameter", "already has a window"));
            }
            if window.measurement.is_some() && !window.active {
                return Err(window_error(window, "measurement", "requires active: true"));
            }
        }
        Ok(())
    }
}

fn policy_error(field: &str, message: &str) -> FlavorError {
    FlavorError::MalformedConfiguration(
        ErrorInfo::new("invalid-policy", format!("policy field '{field}' {message}"))
            .with_context("field", field),
    )
}

fn window_error(window: &ExperimentWindow, field: &str, message: &str) -> FlavorError {
    FlavorError::MalformedConfiguration(
        ErrorInfo::new(
            "invalid-window",
            format!("{} window field '{field}' {message}", window.experiment),
        )
        .with_context("experiment", window.experiment.clone())
        .with_context("field", field),
    )
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            sigma_threshold: Self::default_sigma_threshold(),
            average_percent_max: Self::default_average_percent_max(),
            bias_majority: Self::default_bias_majority(),
            windows: Self::default_windows(),
        }
    }
}
