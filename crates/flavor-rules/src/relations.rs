use flavor_core::FlavorError;
use serde::{Deserialize, Serialize};

use crate::exact::Exact;
use crate::formulas::ParameterId;
use crate::hierarchy::GenerationHierarchy;

/// Exact ratio between two predictions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossRelation {
    /// Numerator parameter.
    pub numerator: ParameterId,
    /// Denominator parameter.
    pub denominator: ParameterId,
    /// Exact ratio of the two predictions.
    pub ratio: Exact,
    /// Ratio implied by the hierarchy, `(13 - p₃)(13 - p₁)/(p₃ - p₁)`.
    pub expected: Exact,
}

impl CrossRelation {
    /// Whether the computed ratio equals the expected one exactly.
    pub fn holds(&self) -> bool {
        self.ratio == self.expected
    }
}

/// Shared structure of the two CP phase formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStructure {
    /// Common numerator `13 - p₂`.
    pub common_numerator: i64,
    /// Quark phase denominator `13 - 2`.
    pub ckm_denominator: i64,
    /// Lepton phase denominator `13`.
    pub pmns_denominator: i64,
    /// Exact quark phase sine.
    pub ckm_sine: Exact,
    /// Exact lepton phase sine.
    pub pmns_sine: Exact,
    /// Predicted quark phase in degrees.
    pub ckm_degrees: f64,
    /// Predicted lepton phase in degrees.
    pub pmns_degrees: f64,
}

impl GenerationHierarchy {
    /// sin²(θ₁₃)_PMNS / sin(θ₁₃)_CKM, computed without rounding.
    pub fn cross_relation_theta13(&self) -> Option<CrossRelation> {
        let pmns = self.evaluate(ParameterId::PmnsTheta13).ok()?;
        let ckm = self.evaluate(ParameterId::CkmTheta13).ok()?;
        let ratio = pmns.exact.checked_div(&ckm.exact)?;
        let expected =
            Exact::from_integers((self.cluster - self.p3()) * (self.cluster - self.p1()), self.p3() - self.p1())?;
        Some(CrossRelation {
            numerator: ParameterId::PmnsTheta13,
            denominator: ParameterId::CkmTheta13,
            ratio,
            expected,
        })
    }

    /// Describes how the two CP phase predictions relate.
    pub fn phase_structure(&self) -> Result<PhaseStructure, FlavorError> {
        let ckm = self.evaluate(ParameterId::CkmDelta)?;
        let pmns = self.evaluate(ParameterId::PmnsDelta)?;
        Ok(PhaseStructure {
            common_numerator: self.cluster - self.p2(),
            ckm_denominator: self.cluster_secondary,
            pmns_denominator: self.cluster,
            ckm_degrees: ckm.phase_degrees().unwrap_or(f64::NAN),
            pmns_degrees: pmns.phase_degrees().unwrap_or(f64::NAN),
            ckm_sine: ckm.exact,
            pmns_sine: pmns.exact,
        })
    }
}
