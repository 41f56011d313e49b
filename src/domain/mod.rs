//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. All types are
//! serializable and carry the ordering and encoding invariants the
//! classifiers depend on.

mod report;
mod schema;
mod symptoms;
mod task;

pub use report::{BinaryOutcome, DiseaseMeta, Label, PredictionResult};
pub use schema::{
    Bounds, CategoryMap, EncodeError, FeatureKind, FeatureRow, FeatureSchema, FeatureSpec,
};
pub use symptoms::SymptomVocabulary;
pub use task::DiseaseTask;
