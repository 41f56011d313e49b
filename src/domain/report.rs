//! Prediction result types.
//!
//! A `PredictionResult` is created per request, owned by the caller, and
//! discarded after display; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Raw value a classifier outputs.
///
/// Most of the frozen artifacts emit integer labels (`1` = positive class),
/// but one family was trained with string labels (`"YES"`/`"NO"`), so the
/// raw representation has to carry both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Normalized outcome of a binary predictor.
///
/// Callers branch on `is_positive` and never on the raw label representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOutcome {
    pub is_positive: bool,
    pub message: String,
}

/// Descriptive metadata for one disease the multi-class model can predict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseMeta {
    /// Label exactly as the classifier emits it.
    pub label: String,
    pub description: String,
    /// Always exactly four entries, enforced at catalog load.
    pub precautions: [String; 4],
}

/// Uniform result handed back to the UI layer for every dispatch path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Stable task key (`"diabetes"`, ... or `"symptoms"`).
    pub task: String,
    /// Raw label as emitted by the classifier.
    pub raw_label: Label,
    /// Normalized binary outcome; `None` for the multi-class path.
    pub is_positive: Option<bool>,
    /// Probability-like score in [0, 1], where the model family provides one.
    pub confidence: Option<f64>,
    /// Human-readable result message.
    pub message: String,
    /// Resolved disease metadata; only set for the symptom path.
    pub meta: Option<DiseaseMeta>,
    /// When this result was produced.
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
