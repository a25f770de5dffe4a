use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_core::Sector;
use flavor_rules::{Exact, Observation, Parameter, ParameterId};
use serde::{Deserialize, Serialize};

/// Distances between a prediction and an observation. No rounding applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// `predicted - observed`.
    pub signed: f64,
    /// `|predicted - observed|`.
    pub absolute: f64,
    /// `absolute / |observed| * 100`.
    pub percent: f64,
    /// `absolute / uncertainty`.
    pub sigma: f64,
}

/// Percentage deviation of `predicted` from `observed`.
pub fn percentage_deviation(predicted: f64, observed: f64) -> Result<f64, FlavorError> {
    if observed == 0.0 {
        return Err(FlavorError::DivisionByZero(
            ErrorInfo::new(
                "division-by-zero",
                "percentage deviation is undefined for an observed value of zero",
            )
            .with_context("predicted", predicted.to_string()),
        ));
    }
    Ok((predicted - observed).abs() / observed.abs() * 100.0)
}

/// Computes absolute, percentage and sigma deviation.
///
/// Fails with `InvalidUncertainty` when `uncertainty` is not a positive finite
/// number and with `DivisionByZero` when `observed` is zero.
pub fn deviation(predicted: f64, observed: f64, uncertainty: f64) -> Result<Deviation, FlavorError> {
    if !uncertainty.is_finite() || uncertainty <= 0.0 {
        return Err(FlavorError::InvalidUncertainty(
            ErrorInfo::new(
                "invalid-uncertainty",
                format!("uncertainty must be positive and finite, got {uncertainty}"),
            )
            .with_context("uncertainty", uncertainty.to_string()),
        ));
    }
    let signed = predicted - observed;
    let absolute = signed.abs();
    let percent = percentage_deviation(predicted, observed)?;
    Ok(Deviation {
        signed,
        absolute,
        percent,
        sigma: absolute / uncertainty,
    })
}

fn tag(err: FlavorError, id: ParameterId) -> FlavorError {
    match err {
        FlavorError::InvalidUncertainty(info) => {
            FlavorError::InvalidUncertainty(info.with_context("parameter", id.as_str()))
        }
        FlavorError::DivisionByZero(info) => {
            FlavorError::DivisionByZero(info.with_context("parameter", id.as_str()))
        }
        other => other,
    }
}

/// Comparison of one prediction against one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Parameter identifier.
    pub parameter: ParameterId,
    /// Mixing sector.
    pub sector: Sector,
    /// Display label.
    pub label: String,
    /// Derivation of the prediction.
    pub formula: String,
    /// Exact predicted value.
    pub predicted_exact: Exact,
    /// Floating point view of the prediction.
    pub predicted: f64,
    /// Observed central value used for the comparison.
    pub observed: f64,
    /// Observed one sigma uncertainty.
    pub uncertainty: f64,
    /// Where the observation came from (table version or experiment name).
    pub observation_source: String,
    /// Computed distances.
    pub deviation: Deviation,
    /// Sigma threshold the comparison was flagged against.
    pub sigma_threshold: f64,
    /// Whether the sigma deviation is at most `sigma_threshold`.
    pub within_sigma_threshold: bool,
    /// Predicted phase in degrees (CP phases only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_deg: Option<f64>,
    /// Observed phase in degrees (CP phases only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_deg: Option<f64>,
}

/// Compares `parameter` against its table observation, or `measurement` when given.
///
/// `within_sigma_threshold` is taken at the judge's `sigma_threshold`.
pub fn compare_parameter(
    parameter: &Parameter,
    measurement: Option<(&str, Observation)>,
    table_version: &str,
    sigma_threshold: f64,
) -> Result<ComparisonResult, FlavorError> {
    let (source, observation) = match measurement {
        Some((experiment, observation)) => (experiment.to_string(), observation),
        None => (table_version.to_string(), parameter.observation),
    };
    let predicted = parameter.prediction.value();
    let deviation = deviation(predicted, observation.central, observation.uncertainty)
        .map_err(|err| tag(err, parameter.id))?;
    let within_sigma_threshold = deviation.sigma <= sigma_threshold;
    Ok(ComparisonResult {
        parameter: parameter.id,
        sector: parameter.sector,
        label: parameter.label.clone(),
        formula: parameter.prediction.formula.clone(),
        predicted_exact: parameter.prediction.exact.clone(),
        predicted,
        observed: observation.central,
        uncertainty: observation.uncertainty,
        observation_source: source,
        deviation,
        sigma_threshold,
        within_sigma_threshold,
        predicted_deg: parameter.prediction.phase_degrees(),
        // A substituted measurement is a sine, so the table phase no longer applies.
        observed_deg: match measurement {
            Some(_) => None,
            None => parameter.phase.map(|phase| phase.degrees),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_uncertainty_is_rejected() {
        let err = deviation(0.3, 0.3, -1.0).unwrap_err();
        assert!(matches!(err, FlavorError::InvalidUncertainty(_)));
    }

    #[test]
    fn nan_uncertainty_is_rejected() {
        let err = deviation(0.3, 0.3, f64::NAN).unwrap_err();
        assert!(matches!(err, FlavorError::InvalidUncertainty(_)));
    }

    #[test]
    fn signed_keeps_direction() {
        let over = deviation(0.31, 0.30, 0.01).unwrap();
        let under = deviation(0.29, 0.30, 0.01).unwrap();
        assert!(over.signed > 0.0);
        assert!(under.signed < 0.0);
        assert!((over.absolute - under.absolute).abs() < 1e-15);
    }
}
