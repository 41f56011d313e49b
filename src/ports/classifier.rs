//! Classifier port: the predict contract every loaded artifact exposes.
//!
//! A handle is loaded once at process start, immutable thereafter, and
//! shared read-only across concurrent requests. Inference is deterministic
//! and side-effect-free, so no coordination is needed at this boundary.

use crate::domain::{FeatureRow, Label};

/// Errors raised by a classifier invocation.
///
/// These indicate drift between the caller's schema and the artifact, not
/// transient conditions; retrying the same call cannot succeed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("feature count mismatch: row has {got}, model expects {expected}")]
    ShapeMismatch { got: usize, expected: usize },

    #[error(
        "feature name mismatch at position {index}: row has {got:?}, model was trained on {expected:?}"
    )]
    NameMismatch {
        index: usize,
        got: String,
        expected: String,
    },

    #[error("this model family does not expose prediction confidence")]
    ConfidenceUnsupported,

    #[error("corrupt model parameters: {0}")]
    Corrupt(String),
}

/// Opaque trained classifier handle.
///
/// The capability surface is exactly `predict`, plus confidence output for
/// families that were exported with probability information. Implementations
/// must be reentrant: `&self` inference with no interior mutation.
pub trait Classifier: Send + Sync {
    /// Feature names this artifact was trained on, in training order.
    fn feature_names(&self) -> &[String];

    /// Whether `predict_with_confidence` is supported.
    fn supports_confidence(&self) -> bool {
        false
    }

    /// Predict one label per input row.
    ///
    /// # Errors
    /// Returns `PredictError` if a row does not match the trained feature
    /// layout by count and by name.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>, PredictError>;

    /// Predict labels with a probability-like confidence in [0, 1].
    ///
    /// # Errors
    /// `PredictError::ConfidenceUnsupported` for families exported without
    /// probability information.
    fn predict_with_confidence(
        &self,
        rows: &[FeatureRow],
    ) -> Result<Vec<(Label, f64)>, PredictError> {
        let _ = rows;
        Err(PredictError::ConfidenceUnsupported)
    }
}

/// Verify a row against the trained feature layout, by count and by name.
///
/// Name-based artifact formats silently mis-predict when columns are
/// reordered, so the check is strict and positional.
pub(crate) fn check_row(expected: &[String], row: &FeatureRow) -> Result<(), PredictError> {
    if row.columns.len() != expected.len() || row.values.len() != expected.len() {
        return Err(PredictError::ShapeMismatch {
            got: row.values.len().max(row.columns.len()),
            expected: expected.len(),
        });
    }
    for (index, (got, want)) in row.columns.iter().zip(expected.iter()).enumerate() {
        if got != want {
            return Err(PredictError::NameMismatch {
                index,
                got: got.clone(),
                expected: want.clone(),
            });
        }
    }
    Ok(())
}
