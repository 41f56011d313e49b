//! Application layer: Registries, encoding and the dispatch use case.
//!
//! This module wires domain types to loaded artifacts: the schema registry
//! (single source of truth for feature layouts), the model registry (eagerly
//! loaded classifier handles), the input encoder, the result interpreter and
//! the prediction dispatcher.

mod dispatcher;
mod encoder;
mod interpreter;
mod registry;

pub use dispatcher::PredictionEngine;
pub use encoder::{encode_row, InputValues, RawValue};
pub use interpreter::{interpret_binary, interpret_symptoms};
pub use registry::{ModelRegistry, SchemaRegistry, SymptomBundle, SYMPTOM_TASK_KEY};
