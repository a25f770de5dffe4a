//! Exploratory predictions outside flavor mixing.
//!
//! These are reported next to the main comparison but never reach the judge.

use std::fmt;
use std::str::FromStr;

use flavor_core::FlavorError;
use serde::{Deserialize, Serialize};

use crate::exact::Exact;
use crate::formulas::zero_denominator;
use crate::hierarchy::GenerationHierarchy;

/// Identifier of an exploratory prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtendedId {
    /// Strong coupling α_s at M_Z.
    AlphaStrong,
    /// Inverse fine structure constant.
    AlphaEmInverse,
    /// m_τ / m_μ.
    TauMuonMassRatio,
    /// m_μ / m_e.
    MuonElectronMassRatio,
    /// Δm²₃₂ / Δm²₂₁.
    NeutrinoMassRatio,
    /// m_H / v.
    HiggsVevRatio,
}

impl ExtendedId {
    /// All exploratory predictions in report order.
    pub const ALL: [ExtendedId; 6] = [
        ExtendedId::AlphaStrong,
        ExtendedId::AlphaEmInverse,
        ExtendedId::TauMuonMassRatio,
        ExtendedId::MuonElectronMassRatio,
        ExtendedId::NeutrinoMassRatio,
        ExtendedId::HiggsVevRatio,
    ];

    /// Stable identifier used in tables and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtendedId::AlphaStrong => "alpha_strong",
            ExtendedId::AlphaEmInverse => "alpha_em_inverse",
            ExtendedId::TauMuonMassRatio => "tau_muon_mass_ratio",
            ExtendedId::MuonElectronMassRatio => "muon_electron_mass_ratio",
            ExtendedId::NeutrinoMassRatio => "neutrino_mass_ratio",
            ExtendedId::HiggsVevRatio => "higgs_vev_ratio",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ExtendedId::AlphaStrong => "α_s",
            ExtendedId::AlphaEmInverse => "1/α_EM",
            ExtendedId::TauMuonMassRatio => "m_τ/m_μ",
            ExtendedId::MuonElectronMassRatio => "m_μ/m_e",
            ExtendedId::NeutrinoMassRatio => "Δm²₃₂/Δm²₂₁",
            ExtendedId::HiggsVevRatio => "m_H/v",
        }
    }
}

impl fmt::Display for ExtendedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtendedId {
    type Err = FlavorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtendedId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| FlavorError::invalid_parameter(s))
    }
}

/// Exact exploratory prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPrediction {
    /// Quantity predicted.
    pub id: ExtendedId,
    /// Exact value in lowest terms.
    pub exact: Exact,
    /// Human readable derivation.
    pub formula: String,
}

impl ExtendedPrediction {
    /// Floating point view of the exact value.
    pub fn value(&self) -> f64 {
        self.exact.to_f64()
    }
}

impl GenerationHierarchy {
    /// Evaluates an exploratory prediction.
    ///
    /// Fails with `DivisionByZero` when `p₃` or the cluster number is zero.
    pub fn evaluate_extended(&self, id: ExtendedId) -> Result<ExtendedPrediction, FlavorError> {
        let (p1, p2, p3) = (self.p1(), self.p2(), self.p3());
        let c = self.cluster;
        let c2 = self.cluster_secondary;
        let (exact, formula) = match id {
            ExtendedId::AlphaStrong => (
                Exact::from_integers(1, p3),
                format!("1/p₃ = 1/{p3}"),
            ),
            ExtendedId::AlphaEmInverse => {
                let value = c2 * c - (p3 - p2);
                (
                    Some(Exact::integer(value)),
                    format!("{c2}×{c} - (p₃-p₂) = {} - ({p3}-{p2}) = {value}", c2 * c),
                )
            }
            ExtendedId::TauMuonMassRatio => {
                let value = c + p2 + p1;
                (
                    Some(Exact::integer(value)),
                    format!("{c} + p₂ + p₁ = {c} + {p2} + {p1} = {value}"),
                )
            }
            ExtendedId::MuonElectronMassRatio => {
                let value = c * (c + p2) - p1;
                (
                    Some(Exact::integer(value)),
                    format!("{c}×({c}+p₂) - p₁ = {c}×{} - {p1} = {value}", c + p2),
                )
            }
            ExtendedId::NeutrinoMassRatio => {
                let value = (p3 - p1) * (p2 + p1);
                (
                    Some(Exact::integer(value)),
                    format!("(p₃-p₁)(p₂+p₁) = {}×{} = {value}", p3 - p1, p2 + p1),
                )
            }
            ExtendedId::HiggsVevRatio => {
                let half = Exact::from_integers(1, 2);
                let tail = Exact::from_integers(1, p3 * c);
                let exact = half.zip(tail).map(|(a, b)| a.add(&b));
                let text = match &exact {
                    Some(value) => format!("1/2 + 1/(p₃×{c}) = 1/2 + 1/{} = {value}", p3 * c),
                    None => format!("1/2 + 1/(p₃×{c})"),
                };
                (exact, text)
            }
        };
        Ok(ExtendedPrediction {
            id,
            exact: exact.ok_or_else(|| zero_denominator(id.as_str()))?,
            formula,
        })
    }

    /// Evaluates every exploratory prediction in report order.
    pub fn evaluate_extended_all(&self) -> Result<Vec<ExtendedPrediction>, FlavorError> {
        ExtendedId::ALL
            .iter()
            .map(|id| self.evaluate_extended(*id))
            .collect()
    }
}
