use std::fmt;
use std::str::FromStr;

use flavor_core::errors::ErrorInfo;
use flavor_core::{FlavorError, Sector};
use serde::{Deserialize, Serialize};

use crate::exact::Exact;
use crate::hierarchy::GenerationHierarchy;

/// Identifier of one of the nine pre-registered mixing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParameterId {
    /// Cabibbo angle, sin(θ₁₂).
    #[serde(rename = "CKM_theta12")]
    CkmTheta12,
    /// sin(θ₂₃) of the quark sector.
    #[serde(rename = "CKM_theta23")]
    CkmTheta23,
    /// sin(θ₁₃) of the quark sector.
    #[serde(rename = "CKM_theta13")]
    CkmTheta13,
    /// sin(δ) of the quark CP phase.
    #[serde(rename = "CKM_delta")]
    CkmDelta,
    /// Solar angle, sin²(θ₁₂).
    #[serde(rename = "PMNS_theta12")]
    PmnsTheta12,
    /// Atmospheric angle, sin²(θ₂₃).
    #[serde(rename = "PMNS_theta23")]
    PmnsTheta23,
    /// Reactor angle, sin²(θ₁₃).
    #[serde(rename = "PMNS_theta13")]
    PmnsTheta13,
    /// sin(δ) of the lepton CP phase.
    #[serde(rename = "PMNS_delta")]
    PmnsDelta,
    /// Weak mixing angle, sin²(θ_W).
    #[serde(rename = "Weinberg")]
    Weinberg,
}

/// What the predicted ratio measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    /// Sine of a mixing angle.
    Sine,
    /// Squared sine of a mixing angle.
    SineSquared,
    /// Sine of a CP violating phase.
    PhaseSine,
}

impl ParameterId {
    /// All parameters in report order.
    pub const ALL: [ParameterId; 9] = [
        ParameterId::CkmTheta12,
        ParameterId::CkmTheta23,
        ParameterId::CkmTheta13,
        ParameterId::CkmDelta,
        ParameterId::PmnsTheta12,
        ParameterId::PmnsTheta23,
        ParameterId::PmnsTheta13,
        ParameterId::PmnsDelta,
        ParameterId::Weinberg,
    ];

    /// Stable identifier used in tables and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterId::CkmTheta12 => "CKM_theta12",
            ParameterId::CkmTheta23 => "CKM_theta23",
            ParameterId::CkmTheta13 => "CKM_theta13",
            ParameterId::CkmDelta => "CKM_delta",
            ParameterId::PmnsTheta12 => "PMNS_theta12",
            ParameterId::PmnsTheta23 => "PMNS_theta23",
            ParameterId::PmnsTheta13 => "PMNS_theta13",
            ParameterId::PmnsDelta => "PMNS_delta",
            ParameterId::Weinberg => "Weinberg",
        }
    }

    /// Sector the parameter belongs to.
    pub fn sector(&self) -> Sector {
        match self {
            ParameterId::CkmTheta12
            | ParameterId::CkmTheta23
            | ParameterId::CkmTheta13
            | ParameterId::CkmDelta => Sector::Ckm,
            ParameterId::PmnsTheta12
            | ParameterId::PmnsTheta23
            | ParameterId::PmnsTheta13
            | ParameterId::PmnsDelta => Sector::Pmns,
            ParameterId::Weinberg => Sector::Weinberg,
        }
    }

    /// Quantity the formula predicts.
    pub fn kind(&self) -> QuantityKind {
        match self {
            ParameterId::CkmTheta12 | ParameterId::CkmTheta23 | ParameterId::CkmTheta13 => {
                QuantityKind::Sine
            }
            ParameterId::CkmDelta | ParameterId::PmnsDelta => QuantityKind::PhaseSine,
            ParameterId::PmnsTheta12
            | ParameterId::PmnsTheta23
            | ParameterId::PmnsTheta13
            | ParameterId::Weinberg => QuantityKind::SineSquared,
        }
    }

    /// Default display label.
    pub fn label(&self) -> &'static str {
        match self {
            ParameterId::CkmTheta12 => "sin(θ₁₂)_CKM",
            ParameterId::CkmTheta23 => "sin(θ₂₃)_CKM",
            ParameterId::CkmTheta13 => "sin(θ₁₃)_CKM",
            ParameterId::CkmDelta => "sin(δ)_CKM",
            ParameterId::PmnsTheta12 => "sin²(θ₁₂)_PMNS",
            ParameterId::PmnsTheta23 => "sin²(θ₂₃)_PMNS",
            ParameterId::PmnsTheta13 => "sin²(θ₁₃)_PMNS",
            ParameterId::PmnsDelta => "sin(δ)_PMNS",
            ParameterId::Weinberg => "sin²(θ_W)",
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterId {
    type Err = FlavorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| FlavorError::invalid_parameter(s))
    }
}

/// Exact prediction for a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Parameter the prediction belongs to.
    pub id: ParameterId,
    /// Exact value in lowest terms.
    pub exact: Exact,
    /// Human readable derivation of the value.
    pub formula: String,
}

impl Prediction {
    /// Floating point view of the exact value.
    pub fn value(&self) -> f64 {
        self.exact.to_f64()
    }

    /// Predicted CP phase in degrees, for phase parameters only.
    ///
    /// The quark phase uses the principal arcsine. The lepton phase sits in
    /// the third quadrant, `-180° + arcsin(|sin δ|)`.
    pub fn phase_degrees(&self) -> Option<f64> {
        if self.id.kind() != QuantityKind::PhaseSine {
            return None;
        }
        let sine = self.value();
        match self.id.sector() {
            Sector::Pmns if sine < 0.0 => Some(-180.0 + sine.abs().asin().to_degrees()),
            _ => Some(sine.asin().to_degrees()),
        }
    }
}

fn fraction(id: &str, num: i64, den: i64) -> Result<Exact, FlavorError> {
    Exact::from_integers(num, den).ok_or_else(|| zero_denominator(id))
}

/// Error for a hierarchy whose cluster numbers leave a formula undefined.
pub(crate) fn zero_denominator(id: &str) -> FlavorError {
    FlavorError::DivisionByZero(
        ErrorInfo::new(
            "zero-denominator",
            format!("hierarchy leaves '{id}' with a zero denominator"),
        )
        .with_context("parameter", id)
        .with_hint("cluster numbers and p₃ must be non-zero"),
    )
}

impl GenerationHierarchy {
    /// Evaluates the closed-form expression for `id`.
    ///
    /// Fails with `DivisionByZero` when the hierarchy's cluster numbers make
    /// the denominator vanish.
    pub fn evaluate(&self, id: ParameterId) -> Result<Prediction, FlavorError> {
        let (p1, p2, p3) = (self.p1(), self.p2(), self.p3());
        let c = self.cluster;
        let c2 = self.cluster_secondary;
        let (num, den, formula) = match id {
            ParameterId::CkmTheta12 => {
                let num = p2 * c - p1;
                let den = c.pow(2);
                let text = format!("(p₂×{c} - p₁)/{c}² = ({p2}×{c} - {p1})/{den} = {num}/{den}");
                (num, den, text)
            }
            ParameterId::CkmTheta23 => {
                let num = c - (p3 - p2);
                let den = c.pow(2);
                let text = format!("[{c} - (p₃-p₂)]/{c}² = [{c} - ({p3}-{p2})]/{den} = {num}/{den}");
                (num, den, text)
            }
            ParameterId::CkmTheta13 => {
                let num = p3 - p1;
                let den = c.pow(3);
                let text = format!("(p₃ - p₁)/{c}³ = ({p3} - {p1})/{den} = {num}/{den}");
                (num, den, text)
            }
            ParameterId::CkmDelta => {
                let num = c - p2;
                let den = c2;
                let text = format!("({c} - p₂)/({c} - 2) = ({c} - {p2})/{den} = {num}/{den}");
                (num, den, text)
            }
            ParameterId::PmnsTheta12 => {
                let num = p1 + p2;
                let den = c;
                let text = format!("(p₁ + p₂)/{c} = ({p1} + {p2})/{c} = {num}/{den}");
                (num, den, text)
            }
            ParameterId::PmnsTheta23 => {
                let num = p3 - p2;
                let den = c2;
                let text = format!("(p₃ - p₂)/({c} - 2) = ({p3} - {p2})/{den} = {num}/{den}");
                (num, den, text)
            }
            ParameterId::PmnsTheta13 => {
                let num = (c - p3) * (c - p1);
                let den = c.pow(3);
                let text = format!(
                    "({c}-p₃)({c}-p₁)/{c}³ = ({c}-{p3})({c}-{p1})/{den} = {num}/{den}"
                );
                (num, den, text)
            }
            ParameterId::PmnsDelta => {
                let num = c - p2;
                let den = c;
                let text = format!("-({c} - p₂)/{c} = -({c} - {p2})/{c} = -{num}/{den}");
                (-num, den, text)
            }
            ParameterId::Weinberg => {
                let num = p2;
                let den = c;
                let text = format!("p₂/{c} = {p2}/{c} = {num}/{den}");
                (num, den, text)
            }
        };
        Ok(Prediction {
            id,
            exact: fraction(id.as_str(), num, den)?,
            formula,
        })
    }

    /// Evaluates the parameter named by a string identifier.
    pub fn evaluate_named(&self, name: &str) -> Result<Prediction, FlavorError> {
        let id: ParameterId = name.parse()?;
        self.evaluate(id)
    }

    /// Evaluates every parameter in report order.
    pub fn evaluate_all(&self) -> Result<Vec<Prediction>, FlavorError> {
        ParameterId::ALL.iter().map(|id| self.evaluate(*id)).collect()
    }
}

/// Evaluates `name` against the standard hierarchy.
pub fn predict(name: &str) -> Result<Prediction, FlavorError> {
    GenerationHierarchy::standard().evaluate_named(name)
}
