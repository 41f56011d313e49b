//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the dispatch logic and the loaded classifier artifacts.

mod classifier;

pub use classifier::{Classifier, PredictError};
pub(crate) use classifier::check_row;
