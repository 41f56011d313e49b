//! Result interpreter: raw labels to human-readable outcomes.
//!
//! Binary artifacts disagree on label representation (most emit 1/0, one
//! emits "YES"/"NO" strings). This module owns the normalization so callers
//! branch on `is_positive` and never on the raw value.

use crate::adapters::DiseaseCatalog;
use crate::domain::{BinaryOutcome, DiseaseMeta, DiseaseTask, Label};
use crate::EngineError;

/// Normalize a raw binary label to the two-valued contract.
///
/// Integer `1` and text `YES` (ASCII case-insensitive) are positive
/// findings; every other value is negative.
fn is_positive(raw: &Label) -> bool {
    match raw {
        Label::Int(v) => *v == 1,
        Label::Text(s) => s.eq_ignore_ascii_case("yes"),
    }
}

/// Interpret a binary task's raw label into a normalized outcome with the
/// task's result message.
#[must_use]
pub fn interpret_binary(task: DiseaseTask, raw: &Label) -> BinaryOutcome {
    let positive = is_positive(raw);
    let message = if positive {
        positive_message(task)
    } else {
        negative_message(task)
    };
    BinaryOutcome {
        is_positive: positive,
        message: message.to_string(),
    }
}

fn positive_message(task: DiseaseTask) -> &'static str {
    match task {
        DiseaseTask::Diabetes => "We are really sorry to say but it seems like you are Diabetic.",
        DiseaseTask::Heart => {
            "We are really sorry to say but it seems like you have Heart Disease."
        }
        DiseaseTask::Parkinsons => {
            "We are really sorry to say but it seems like you have Parkinson's disease."
        }
        DiseaseTask::LungCancer => "The model predicts that there is a risk of Lung Cancer.",
        DiseaseTask::Liver => {
            "We are really sorry to say, but it seems like you have liver disease."
        }
        DiseaseTask::Hepatitis => {
            "We are really sorry to say but it seems like you have Hepatitis."
        }
        DiseaseTask::ChronicKidney => {
            "We are really sorry to say but it seems like you have kidney disease."
        }
        DiseaseTask::BreastCancer => "The model predicts that you have Breast Cancer.",
    }
}

fn negative_message(task: DiseaseTask) -> &'static str {
    match task {
        DiseaseTask::Diabetes => "Congratulations, you are not diabetic.",
        DiseaseTask::Heart => "Congratulations, you don't have Heart Disease.",
        DiseaseTask::Parkinsons => "Congratulations, you don't have Parkinson's disease.",
        DiseaseTask::LungCancer => "The model predicts no significant risk of Lung Cancer.",
        DiseaseTask::Liver => "Congratulations, you don't have liver disease.",
        DiseaseTask::Hepatitis => "Congratulations, you do not have Hepatitis.",
        DiseaseTask::ChronicKidney => "Congratulations, you don't have kidney disease.",
        DiseaseTask::BreastCancer => "The model predicts that you don't have Breast Cancer.",
    }
}

/// Interpret the multi-class symptom prediction.
///
/// Clamps the probability to [0, 1], formats the result message with the
/// confidence as a percentage, and resolves the label through the disease
/// catalog.
///
/// # Errors
/// `EngineError::UnresolvedDisease` if the catalog has no entry for the
/// predicted label. An unmapped label means the classifier and the catalog
/// drifted apart, which must be surfaced, never papered over with default
/// text.
pub fn interpret_symptoms(
    raw: &Label,
    probability: f64,
    catalog: &DiseaseCatalog,
) -> Result<(DiseaseMeta, f64, String), EngineError> {
    let confidence = probability.clamp(0.0, 1.0);
    let name = raw.to_string();
    let meta = catalog
        .resolve(&name)
        .cloned()
        .ok_or(EngineError::UnresolvedDisease(name.clone()))?;
    let message = format!("Disease: {name} with {:.2}% probability", confidence * 100.0);
    Ok((meta, confidence, message))
}
