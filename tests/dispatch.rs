//! End-to-end dispatch tests.
//!
//! Each test writes artifact fixtures into a temp directory, builds the
//! engine exactly the way the serving process would, and drives the public
//! dispatch surface.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use polydx::application::{InputValues, RawValue};
use polydx::domain::Label;
use polydx::{EngineError, PredictionEngine};

/// Logistic diabetes artifact that turns positive at Glucose >= 126.
fn write_diabetes_artifact(dir: &Path) {
    let names = [
        "Pregnancies",
        "Glucose",
        "BloodPressure",
        "SkinThickness",
        "Insulin",
        "BMI",
        "DiabetesPedigreeFunction",
        "Age",
    ];
    let mut coefficients = vec![0.0; names.len()];
    coefficients[1] = 1.0;
    let mut scaler_mean = vec![0.0; names.len()];
    scaler_mean[1] = 126.0;

    let artifact = json!({
        "schema_version": 1,
        "task": "diabetes",
        "feature_names": names,
        "family": "logistic",
        "scaler_mean": scaler_mean,
        "scaler_scale": vec![1.0; names.len()],
        "coefficients": coefficients,
        "intercept": 0.0,
        "positive_label": 1,
        "negative_label": 0
    });
    std::fs::write(dir.join("diabetes.json"), artifact.to_string()).expect("write artifact");
}

/// Decision-tree lung artifact with the dataset's string labels: smokers
/// (SMOKING encoded 2) are flagged.
fn write_lung_artifact(dir: &Path) {
    let names = [
        "GENDER",
        "AGE",
        "SMOKING",
        "YELLOW_FINGERS",
        "ANXIETY",
        "PEER_PRESSURE",
        "CHRONICDISEASE",
        "FATIGUE",
        "ALLERGY",
        "WHEEZING",
        "ALCOHOLCONSUMING",
        "COUGHING",
        "SHORTNESSOFBREATH",
        "SWALLOWINGDIFFICULTY",
        "CHESTPAIN",
    ];
    let artifact = json!({
        "schema_version": 1,
        "task": "lung_cancer",
        "feature_names": names,
        "family": "decision_tree",
        "nodes": [
            {"kind": "split", "feature": 2, "threshold": 1.5, "left": 1, "right": 2},
            {"kind": "leaf", "label": "NO"},
            {"kind": "leaf", "label": "YES"}
        ]
    });
    std::fs::write(dir.join("lung_cancer.json"), artifact.to_string()).expect("write artifact");
}

fn write_symptom_artifact(dir: &Path) {
    let artifact = json!({
        "schema_version": 1,
        "task": "symptoms",
        "feature_names": ["itching", "skin_rash", "fatigue", "high_fever"],
        "family": "softmax",
        "classes": ["Fungal infection", "Malaria", "Drift Disease"],
        "weights": [
            [4.0, 4.0, 0.0, 0.0],
            [0.0, 0.0, 4.0, 4.0],
            [0.0, 6.0, 0.0, 0.0]
        ],
        "biases": [0.5, 0.0, 0.0]
    });
    std::fs::write(dir.join("symptoms.json"), artifact.to_string()).expect("write artifact");
}

/// Catalog intentionally missing "Drift Disease".
fn write_catalog(dir: &Path) {
    let catalog = json!({
        "diseases": [
            {
                "label": "Fungal infection",
                "description": "A common skin infection caused by fungus.",
                "precautions": [
                    "bath twice",
                    "use detol or neem in bathing water",
                    "keep infected area dry",
                    "use clean cloths"
                ]
            },
            {
                "label": "Malaria",
                "description": "An infectious disease caused by protozoan parasites.",
                "precautions": [
                    "consult nearest hospital",
                    "avoid oily food",
                    "avoid non veg food",
                    "keep mosquitos out"
                ]
            }
        ]
    });
    std::fs::write(dir.join("disease_catalog.json"), catalog.to_string()).expect("write catalog");
}

fn engine_with_fixtures() -> (TempDir, PredictionEngine) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_diabetes_artifact(dir.path());
    write_lung_artifact(dir.path());
    write_symptom_artifact(dir.path());
    write_catalog(dir.path());

    let engine = PredictionEngine::load(dir.path(), &dir.path().join("disease_catalog.json"));
    (dir, engine)
}

fn diabetes_input(glucose: f64) -> InputValues {
    let mut values = InputValues::new();
    values.insert("Pregnancies".into(), RawValue::from(2.0));
    values.insert("Glucose".into(), RawValue::from(glucose));
    values.insert("BloodPressure".into(), RawValue::from(80.0));
    values.insert("SkinThickness".into(), RawValue::from(25.0));
    values.insert("Insulin".into(), RawValue::from(100.0));
    values.insert("BMI".into(), RawValue::from(28.4));
    values.insert("DiabetesPedigreeFunction".into(), RawValue::from(0.52));
    values.insert("Age".into(), RawValue::from(45.0));
    values
}

fn lung_input(smoking: &str) -> InputValues {
    let mut values = InputValues::new();
    values.insert("GENDER".into(), RawValue::from("M"));
    values.insert("AGE".into(), RawValue::from(62.0));
    for field in [
        "SMOKING",
        "YELLOW_FINGERS",
        "ANXIETY",
        "PEER_PRESSURE",
        "CHRONICDISEASE",
        "FATIGUE",
        "ALLERGY",
        "WHEEZING",
        "ALCOHOLCONSUMING",
        "COUGHING",
        "SHORTNESSOFBREATH",
        "SWALLOWINGDIFFICULTY",
        "CHESTPAIN",
    ] {
        values.insert(field.into(), RawValue::from("NO"));
    }
    values.insert("SMOKING".into(), RawValue::from(smoking));
    values
}

#[test]
fn binary_positive_path() {
    let (_dir, engine) = engine_with_fixtures();

    let result = engine
        .predict_key("diabetes", &diabetes_input(190.0))
        .expect("dispatch succeeds");
    assert_eq!(result.task, "diabetes");
    assert_eq!(result.raw_label, Label::Int(1));
    assert_eq!(result.is_positive, Some(true));
    assert!(!result.message.is_empty());
    let confidence = result.confidence.expect("logistic family has confidence");
    assert!(confidence > 0.5 && confidence <= 1.0);
    assert!(result.meta.is_none());
}

#[test]
fn binary_negative_path() {
    let (_dir, engine) = engine_with_fixtures();

    let result = engine
        .predict_key("diabetes", &diabetes_input(90.0))
        .expect("dispatch succeeds");
    assert_eq!(result.raw_label, Label::Int(0));
    assert_eq!(result.is_positive, Some(false));
    assert!(result.message.contains("not diabetic"));
}

#[test]
fn string_coded_labels_normalize() {
    let (_dir, engine) = engine_with_fixtures();

    let positive = engine
        .predict_key("lung_cancer", &lung_input("YES"))
        .expect("dispatch succeeds");
    assert_eq!(positive.raw_label, Label::Text("YES".into()));
    assert_eq!(positive.is_positive, Some(true));
    // The tree family was exported without probabilities.
    assert!(positive.confidence.is_none());

    let negative = engine
        .predict_key("lung_cancer", &lung_input("NO"))
        .expect("dispatch succeeds");
    assert_eq!(negative.raw_label, Label::Text("NO".into()));
    assert_eq!(negative.is_positive, Some(false));
}

#[test]
fn repeated_dispatch_is_deterministic() {
    let (_dir, engine) = engine_with_fixtures();
    let input = diabetes_input(140.0);

    let first = engine.predict_key("diabetes", &input).expect("dispatch");
    for _ in 0..5 {
        let again = engine.predict_key("diabetes", &input).expect("dispatch");
        assert_eq!(again.raw_label, first.raw_label);
        assert_eq!(again.confidence, first.confidence);
        assert_eq!(again.message, first.message);
    }
}

#[test]
fn unknown_task_key_fails_before_any_model_work() {
    // No artifacts at all: if key resolution happened after model lookup,
    // this would surface as TaskUnavailable instead.
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = PredictionEngine::load(dir.path(), &dir.path().join("disease_catalog.json"));

    let err = engine
        .predict_key("jaundice", &InputValues::new())
        .expect_err("unknown key");
    assert!(matches!(err, EngineError::UnknownTask(key) if key == "jaundice"));
}

#[test]
fn missing_artifact_disables_only_its_own_task() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_diabetes_artifact(dir.path());
    write_symptom_artifact(dir.path());
    write_catalog(dir.path());
    // No lung_cancer.json.
    let engine = PredictionEngine::load(dir.path(), &dir.path().join("disease_catalog.json"));

    let err = engine
        .predict_key("lung_cancer", &lung_input("YES"))
        .expect_err("lung task is disabled");
    assert!(matches!(err, EngineError::TaskUnavailable { task, .. } if task == "lung_cancer"));

    // Diabetes keeps serving.
    engine
        .predict_key("diabetes", &diabetes_input(190.0))
        .expect("unrelated task unaffected");
    assert!(engine.symptoms_available());
}

#[test]
fn corrupt_artifact_disables_only_its_own_task() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_diabetes_artifact(dir.path());
    std::fs::write(dir.path().join("lung_cancer.json"), "{not json").expect("write junk");
    let engine = PredictionEngine::load(dir.path(), &dir.path().join("disease_catalog.json"));

    assert!(!engine.is_available(polydx::DiseaseTask::LungCancer));
    assert!(engine.is_available(polydx::DiseaseTask::Diabetes));
}

#[test]
fn symptom_diagnosis_resolves_metadata() {
    let (_dir, engine) = engine_with_fixtures();

    let result = engine
        .diagnose_symptoms(&["fatigue", "high_fever"])
        .expect("diagnosis succeeds");
    assert_eq!(result.task, "symptoms");
    assert_eq!(result.raw_label, Label::Text("Malaria".into()));
    let meta = result.meta.expect("metadata resolved");
    assert_eq!(meta.label, "Malaria");
    assert_eq!(meta.precautions.len(), 4);
    let confidence = result.confidence.expect("softmax has confidence");
    assert!(confidence > 0.5 && confidence <= 1.0);
    assert!(result.message.contains("Malaria"));
    assert!(result.message.contains('%'));
}

#[test]
fn empty_symptom_selection_is_valid() {
    let (_dir, engine) = engine_with_fixtures();

    let result = engine
        .diagnose_symptoms::<&str>(&[])
        .expect("all-zero vector still predicts");
    assert_eq!(result.raw_label, Label::Text("Fungal infection".into()));
    assert!(result.meta.is_some());
    assert!(result.confidence.is_some());
}

#[test]
fn unknown_symptom_is_rejected() {
    let (_dir, engine) = engine_with_fixtures();

    let err = engine
        .diagnose_symptoms(&["headache"])
        .expect_err("not in vocabulary");
    assert!(matches!(
        err,
        EngineError::Encode(polydx::domain::EncodeError::UnknownSymptom { .. })
    ));
}

#[test]
fn unmapped_predicted_label_surfaces_drift() {
    let (_dir, engine) = engine_with_fixtures();

    // skin_rash alone drives the class that has no catalog entry.
    let err = engine
        .diagnose_symptoms(&["skin_rash"])
        .expect_err("catalog drift must surface");
    assert!(matches!(err, EngineError::UnresolvedDisease(label) if label == "Drift Disease"));
}

#[test]
fn vocabulary_comes_from_the_loaded_artifact() {
    let (_dir, engine) = engine_with_fixtures();

    let vocabulary = engine.symptom_vocabulary().expect("symptom model loaded");
    assert_eq!(
        vocabulary.names(),
        &["itching", "skin_rash", "fatigue", "high_fever"]
    );
}

#[test]
fn available_tasks_reflect_loaded_artifacts() {
    let (_dir, engine) = engine_with_fixtures();
    let keys: Vec<&str> = engine.available_tasks().iter().map(|t| t.key()).collect();
    assert_eq!(keys, vec!["diabetes", "lung_cancer"]);
}
