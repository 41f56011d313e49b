//! # polydx
//!
//! Prediction dispatch engine for a multi-disease risk screening product.
//!
//! Each supported disease has its own frozen, pre-trained classifier with its
//! own input schema; a separate multi-class model maps a set of reported
//! symptoms to a disease. This crate owns the part with real invariants:
//! encoding user input into the exact feature vector a model was trained on,
//! invoking the right model, and turning the raw label back into a labeled,
//! human-readable result.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (tasks, schemas, symptom vocabulary, results)
//! - `ports`: Trait boundary to loaded classifier artifacts
//! - `adapters`: Concrete artifact and reference-data loaders (JSON)
//! - `application`: Registries, encoders, interpreter and the dispatcher

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{PredictionEngine, SchemaRegistry};
pub use domain::{DiseaseMeta, DiseaseTask, Label, PredictionResult};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Top-level error type for the prediction engine.
///
/// Every variant is a local, synchronous failure surfaced to the immediate
/// caller. Nothing here is recoverable by retrying: given the same input and
/// the same loaded artifacts, the same call fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown prediction task {0:?}")]
    UnknownTask(String),

    #[error("task {task} is unavailable: {reason}")]
    TaskUnavailable { task: String, reason: String },

    #[error("input encoding failed: {0}")]
    Encode(#[from] domain::EncodeError),

    #[error("classifier invocation failed: {0}")]
    Predict(#[from] ports::PredictError),

    #[error("predicted disease {0:?} has no catalog entry")]
    UnresolvedDisease(String),

    #[error("model artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("disease catalog error: {0}")]
    Catalog(#[from] adapters::CatalogError),
}
