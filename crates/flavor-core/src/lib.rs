#![deny(missing_docs)]
#![doc = "Core error and provenance types for the flavor hierarchy engine."]

pub mod errors;
pub mod provenance;

pub use errors::{ErrorInfo, FlavorError};
pub use provenance::{RunProvenance, SchemaVersion};

use serde::{Deserialize, Serialize};

/// Flavor-mixing sector a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    /// Quark mixing (Cabibbo-Kobayashi-Maskawa matrix).
    #[serde(rename = "CKM")]
    Ckm,
    /// Lepton mixing (Pontecorvo-Maki-Nakagawa-Sakata matrix).
    #[serde(rename = "PMNS")]
    Pmns,
    /// Electroweak mixing angle.
    Weinberg,
}

impl Sector {
    /// Returns the canonical label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Ckm => "CKM",
            Sector::Pmns => "PMNS",
            Sector::Weinberg => "Weinberg",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
