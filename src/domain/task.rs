//! Disease task identifiers.
//!
//! One `DiseaseTask` per independently trained binary predictor. The
//! symptom-based multi-class path is not a `DiseaseTask`; it is dispatched
//! separately because it has a vocabulary instead of a field schema.

use serde::{Deserialize, Serialize};

/// One independently trained disease predictor.
///
/// The stable key (`key()`) is the contract with the UI layer and with the
/// artifact files on disk (`<key>.json`); it never changes once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseTask {
    Diabetes,
    Heart,
    Parkinsons,
    LungCancer,
    Liver,
    Hepatitis,
    ChronicKidney,
    BreastCancer,
}

impl DiseaseTask {
    /// All registered tasks, in menu order.
    pub const ALL: [DiseaseTask; 8] = [
        Self::Diabetes,
        Self::Heart,
        Self::Parkinsons,
        Self::LungCancer,
        Self::Liver,
        Self::Hepatitis,
        Self::ChronicKidney,
        Self::BreastCancer,
    ];

    /// Stable key used for dispatch and artifact file names.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Heart => "heart",
            Self::Parkinsons => "parkinsons",
            Self::LungCancer => "lung_cancer",
            Self::Liver => "liver",
            Self::Hepatitis => "hepatitis",
            Self::ChronicKidney => "chronic_kidney",
            Self::BreastCancer => "breast_cancer",
        }
    }

    /// Human display name for result messages and menus.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes",
            Self::Heart => "Heart Disease",
            Self::Parkinsons => "Parkinson's Disease",
            Self::LungCancer => "Lung Cancer",
            Self::Liver => "Liver Disease",
            Self::Hepatitis => "Hepatitis",
            Self::ChronicKidney => "Chronic Kidney Disease",
            Self::BreastCancer => "Breast Cancer",
        }
    }

    /// Resolve a stable key back to a task.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl std::fmt::Display for DiseaseTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
