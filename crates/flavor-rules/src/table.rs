//! Versioned comparison table pairing each prediction with its observation.
//!
//! The embedded PDG 2024 table is parsed once per process and never mutated.
//! Updating the observed values is a data change to `data/pdg2024.yaml`.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_core::Sector;
use serde::{Deserialize, Serialize};

use crate::exact::Exact;
use crate::extended::ExtendedId;
use crate::formulas::{ParameterId, Prediction, QuantityKind};
use crate::hierarchy::GenerationHierarchy;

const PDG_2024_YAML: &str = include_str!("../data/pdg2024.yaml");

/// Observed central value and one standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Observation {
    /// Central value.
    pub central: f64,
    /// Symmetric one sigma uncertainty.
    pub uncertainty: f64,
}

/// Observed CP phase in degrees, kept for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseObservation {
    /// Central phase in degrees.
    pub degrees: f64,
    /// Uncertainty in degrees.
    pub uncertainty: f64,
}

/// One pre-registered parameter: exact prediction plus observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter identifier.
    pub id: ParameterId,
    /// Mixing sector.
    pub sector: Sector,
    /// Display label.
    pub label: String,
    /// Quantity being compared.
    pub kind: QuantityKind,
    /// Exact prediction from the hierarchy.
    pub prediction: Prediction,
    /// Published observation.
    pub observation: Observation,
    /// Published phase in degrees, for CP phases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<PhaseObservation>,
}

/// Observation backing an exploratory prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservedQuantity {
    /// Quotient of two measured quantities.
    Ratio {
        /// `[numerator, denominator]`.
        ratio_of: [f64; 2],
    },
    /// Directly measured value.
    Direct {
        /// Central value.
        observed: f64,
        /// Optional uncertainty.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        uncertainty: Option<f64>,
    },
}

impl ObservedQuantity {
    /// Central value of the observation.
    pub fn value(&self) -> f64 {
        match self {
            ObservedQuantity::Ratio { ratio_of } => ratio_of[0] / ratio_of[1],
            ObservedQuantity::Direct { observed, .. } => *observed,
        }
    }
}

/// Immutable comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    /// Version label, e.g. `pdg-2024`.
    pub version: String,
    /// Citation for the observed values.
    pub source: String,
    /// Parameters in report order.
    pub parameters: Vec<Parameter>,
    /// Observations for the exploratory predictions.
    pub extended: BTreeMap<ExtendedId, ObservedQuantity>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    version: Option<String>,
    source: Option<String>,
    parameters: Option<BTreeMap<String, RawParameter>>,
    #[serde(default)]
    extended: BTreeMap<String, ObservedQuantity>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParameter {
    sector: Option<Sector>,
    label: Option<String>,
    kind: Option<QuantityKind>,
    numerator: Option<i64>,
    denominator: Option<i64>,
    observed: Option<f64>,
    uncertainty: Option<f64>,
    observed_deg: Option<f64>,
    uncertainty_deg: Option<f64>,
}

fn missing_field(parameter: &str, field: &str) -> FlavorError {
    FlavorError::MalformedConfiguration(
        ErrorInfo::new(
            "missing-field",
            format!("parameter '{parameter}' is missing required field '{field}'"),
        )
        .with_context("parameter", parameter)
        .with_context("field", field),
    )
}

fn finite(parameter: &str, field: &str, value: f64) -> Result<f64, FlavorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FlavorError::MalformedConfiguration(
            ErrorInfo::new(
                "non-finite-value",
                format!("parameter '{parameter}' field '{field}' is not finite"),
            )
            .with_context("parameter", parameter)
            .with_context("field", field),
        ))
    }
}

fn build_parameter(
    hierarchy: &GenerationHierarchy,
    id: ParameterId,
    raw: RawParameter,
) -> Result<Parameter, FlavorError> {
    let name = id.as_str();
    let prediction = hierarchy.evaluate(id)?;

    if let Some(sector) = raw.sector {
        if sector != id.sector() {
            return Err(FlavorError::MalformedConfiguration(
                ErrorInfo::new(
                    "sector-mismatch",
                    format!("parameter '{name}' declares sector {sector}, expected {}", id.sector()),
                )
                .with_context("parameter", name)
                .with_context("field", "sector"),
            ));
        }
    }

    if let Some(kind) = raw.kind {
        if kind != id.kind() {
            return Err(FlavorError::MalformedConfiguration(
                ErrorInfo::new(
                    "kind-mismatch",
                    format!("parameter '{name}' declares kind {kind:?}, expected {:?}", id.kind()),
                )
                .with_context("parameter", name)
                .with_context("field", "kind"),
            ));
        }
    }

    match (raw.numerator, raw.denominator) {
        (None, None) => {}
        (Some(num), Some(den)) => {
            let pinned = Exact::from_integers(num, den).ok_or_else(|| {
                FlavorError::MalformedConfiguration(
                    ErrorInfo::new("zero-denominator", format!("parameter '{name}' has denominator 0"))
                        .with_context("parameter", name)
                        .with_context("field", "denominator"),
                )
            })?;
            if pinned != prediction.exact {
                return Err(FlavorError::MalformedConfiguration(
                    ErrorInfo::new(
                        "formula-mismatch",
                        format!(
                            "parameter '{name}' pins {pinned} but the hierarchy gives {}",
                            prediction.exact
                        ),
                    )
                    .with_context("parameter", name)
                    .with_hint("drop numerator/denominator or correct them"),
                ));
            }
        }
        (Some(_), None) => return Err(missing_field(name, "denominator")),
        (None, Some(_)) => return Err(missing_field(name, "numerator")),
    }

    let central = finite(name, "observed", raw.observed.ok_or_else(|| missing_field(name, "observed"))?)?;
    let uncertainty = finite(
        name,
        "uncertainty",
        raw.uncertainty.ok_or_else(|| missing_field(name, "uncertainty"))?,
    )?;

    let phase = match (raw.observed_deg, raw.uncertainty_deg) {
        (None, None) => None,
        (Some(degrees), Some(err)) => Some(PhaseObservation {
            degrees: finite(name, "observed_deg", degrees)?,
            uncertainty: finite(name, "uncertainty_deg", err)?,
        }),
        (Some(_), None) => return Err(missing_field(name, "uncertainty_deg")),
        (None, Some(_)) => return Err(missing_field(name, "observed_deg")),
    };

    Ok(Parameter {
        id,
        sector: id.sector(),
        label: raw.label.unwrap_or_else(|| id.label().to_string()),
        kind: id.kind(),
        prediction,
        observation: Observation {
            central,
            uncertainty,
        },
        phase,
    })
}

impl ParameterTable {
    /// Parses and validates a table written in YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self, FlavorError> {
        Self::from_yaml_with(text, &GenerationHierarchy::standard())
    }

    /// Parses a table against an explicit hierarchy.
    pub fn from_yaml_with(text: &str, hierarchy: &GenerationHierarchy) -> Result<Self, FlavorError> {
        let raw: RawTable = serde_yaml::from_str(text).map_err(|err| {
            FlavorError::MalformedConfiguration(ErrorInfo::new("yaml-read", err.to_string()))
        })?;
        let version = raw.version.ok_or_else(|| missing_field("<table>", "version"))?;
        let source = raw.source.unwrap_or_default();
        let mut records = raw
            .parameters
            .ok_or_else(|| missing_field("<table>", "parameters"))?;

        if let Some(unknown) = records
            .keys()
            .find(|key| key.parse::<ParameterId>().is_err())
        {
            return Err(FlavorError::MalformedConfiguration(
                ErrorInfo::new("unknown-parameter", format!("table declares unknown parameter '{unknown}'"))
                    .with_context("parameter", unknown.clone()),
            ));
        }

        let mut parameters = Vec::with_capacity(ParameterId::ALL.len());
        for id in ParameterId::ALL {
            let record = records.remove(id.as_str()).ok_or_else(|| {
                FlavorError::MalformedConfiguration(
                    ErrorInfo::new("missing-record", format!("table has no record for '{id}'"))
                        .with_context("parameter", id.as_str()),
                )
            })?;
            parameters.push(build_parameter(hierarchy, id, record)?);
        }

        let mut extended = BTreeMap::new();
        for (key, quantity) in raw.extended {
            let id: ExtendedId = key.parse().map_err(|_| {
                FlavorError::MalformedConfiguration(
                    ErrorInfo::new("unknown-extended", format!("unknown exploratory quantity '{key}'"))
                        .with_context("quantity", key.clone()),
                )
            })?;
            finite(&key, "extended", quantity.value())?;
            extended.insert(id, quantity);
        }

        tracing::debug!(version = %version, parameters = parameters.len(), "loaded comparison table");
        Ok(Self {
            version,
            source,
            parameters,
            extended,
        })
    }

    /// Looks up a parameter by identifier.
    pub fn get(&self, id: ParameterId) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.id == id)
    }

    /// Looks up a parameter by its string identifier.
    pub fn lookup(&self, name: &str) -> Result<&Parameter, FlavorError> {
        let id: ParameterId = name.parse()?;
        self.get(id)
            .ok_or_else(|| FlavorError::invalid_parameter(name))
    }
}

/// The embedded PDG 2024 comparison table.
pub fn pdg_2024() -> Result<&'static ParameterTable, FlavorError> {
    static TABLE: OnceLock<Result<ParameterTable, FlavorError>> = OnceLock::new();
    TABLE
        .get_or_init(|| ParameterTable::from_yaml_str(PDG_2024_YAML))
        .as_ref()
        .map_err(Clone::clone)
}
