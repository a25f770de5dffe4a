#![deny(missing_docs)]
#![doc = "Generation hierarchy predictions for flavor mixing parameters and the comparison table they are judged against."]

/// Exact rational values.
pub mod exact;
/// Exploratory predictions outside the mixing matrices.
pub mod extended;
/// The nine mixing formulas.
pub mod formulas;
/// Generation powers and cluster numbers.
pub mod hierarchy;
/// Exact relations between predictions.
pub mod relations;
/// Versioned comparison table.
pub mod table;

pub use exact::Exact;
pub use extended::{ExtendedId, ExtendedPrediction};
pub use formulas::{predict, ParameterId, Prediction, QuantityKind};
pub use hierarchy::GenerationHierarchy;
pub use relations::{CrossRelation, PhaseStructure};
pub use table::{pdg_2024, Observation, ObservedQuantity, Parameter, ParameterTable, PhaseObservation};
