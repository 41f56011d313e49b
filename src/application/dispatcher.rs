//! Prediction dispatcher: the one call the UI layer makes.
//!
//! Pure orchestration: resolve schema, encode input, fetch the handle,
//! invoke predict, interpret. Stateless between calls, no caching, no
//! retry; classifier calls are deterministic and side-effect-free, so a
//! failure is surfaced, not retried. Tasks share nothing mutable, so one
//! failing dispatch cannot affect another.

use std::path::Path;

use crate::adapters::DiseaseCatalog;
use crate::application::encoder::{encode_row, InputValues};
use crate::application::interpreter::{interpret_binary, interpret_symptoms};
use crate::application::registry::{ModelRegistry, SchemaRegistry, SYMPTOM_TASK_KEY};
use crate::domain::{DiseaseTask, FeatureRow, PredictionResult, SymptomVocabulary};
use crate::ports::PredictError;
use crate::{EngineError, Result};

/// The prediction engine: schemas, loaded models and reference data,
/// assembled once at startup and shared read-only afterwards.
pub struct PredictionEngine {
    schemas: SchemaRegistry,
    models: ModelRegistry,
    catalog: Option<DiseaseCatalog>,
    catalog_error: Option<String>,
}

impl PredictionEngine {
    /// Build the engine by eagerly loading artifacts and the disease
    /// catalog.
    ///
    /// Load failures never abort construction: each broken artifact
    /// disables its own task, and a broken catalog disables the symptom
    /// path, leaving everything else serving.
    #[must_use]
    pub fn load(model_dir: &Path, catalog_path: &Path) -> Self {
        let schemas = SchemaRegistry::builtin();
        let models = ModelRegistry::load(model_dir, &schemas);
        let (catalog, catalog_error) = match DiseaseCatalog::load(catalog_path) {
            Ok(catalog) => (Some(catalog), None),
            Err(e) => {
                tracing::warn!("Disabling symptom diagnosis: {}", e);
                (None, Some(e.to_string()))
            }
        };
        Self {
            schemas,
            models,
            catalog,
            catalog_error,
        }
    }

    /// Assemble an engine from already-built parts.
    #[must_use]
    pub fn from_parts(
        schemas: SchemaRegistry,
        models: ModelRegistry,
        catalog: Option<DiseaseCatalog>,
    ) -> Self {
        Self {
            schemas,
            models,
            catalog,
            catalog_error: None,
        }
    }

    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Tasks currently able to serve predictions, in menu order.
    #[must_use]
    pub fn available_tasks(&self) -> Vec<DiseaseTask> {
        self.models.available_tasks()
    }

    #[must_use]
    pub fn is_available(&self, task: DiseaseTask) -> bool {
        self.models.get(task).is_ok()
    }

    #[must_use]
    pub fn symptoms_available(&self) -> bool {
        self.models.has_symptom_model() && self.catalog.is_some()
    }

    /// The loaded symptom vocabulary, for the UI's symptom picker.
    #[must_use]
    pub fn symptom_vocabulary(&self) -> Option<&SymptomVocabulary> {
        self.models.symptom_model().ok().map(|b| &b.vocabulary)
    }

    /// Dispatch by stable string key, as received from the UI layer.
    ///
    /// # Errors
    /// `EngineError::UnknownTask` for an unregistered key, before any
    /// encoding or model work happens.
    pub fn predict_key(&self, key: &str, values: &InputValues) -> Result<PredictionResult> {
        let task = DiseaseTask::from_key(key)
            .ok_or_else(|| EngineError::UnknownTask(key.to_string()))?;
        self.predict(task, values)
    }

    /// Run one binary disease prediction.
    ///
    /// # Errors
    /// Encoding, availability and invocation failures are returned as-is;
    /// none of them are retried.
    pub fn predict(&self, task: DiseaseTask, values: &InputValues) -> Result<PredictionResult> {
        tracing::debug!("Dispatching prediction for task {}", task.key());

        let schema = self.schemas.schema_for(task);
        let row = encode_row(values, schema)?;
        let loaded = self.models.get(task)?;

        let (raw_label, confidence) = if loaded.classifier.supports_confidence() {
            let (label, confidence) = take_first(
                loaded.classifier.predict_with_confidence(&[row])?,
            )?;
            (label, Some(confidence))
        } else {
            (take_first(loaded.classifier.predict(&[row])?)?, None)
        };

        let outcome = interpret_binary(task, &raw_label);
        tracing::info!(
            "Prediction complete: task={}, label={}, positive={}",
            task.key(),
            raw_label,
            outcome.is_positive
        );

        Ok(PredictionResult {
            task: task.key().to_string(),
            raw_label,
            is_positive: Some(outcome.is_positive),
            confidence,
            message: outcome.message,
            meta: None,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Run the symptom-based multi-class diagnosis.
    ///
    /// An empty selection is valid: the model is invoked with the all-zero
    /// vector and its top class is reported like any other.
    ///
    /// # Errors
    /// `EngineError::TaskUnavailable` if the symptom model or catalog did
    /// not load; `UnknownSymptom` for names outside the vocabulary;
    /// `UnresolvedDisease` if the predicted label has no catalog entry.
    pub fn diagnose_symptoms<S: AsRef<str>>(&self, selected: &[S]) -> Result<PredictionResult> {
        tracing::debug!("Dispatching symptom diagnosis ({} selected)", selected.len());

        let bundle = self.models.symptom_model()?;
        let catalog = self.catalog.as_ref().ok_or_else(|| {
            let reason = self
                .catalog_error
                .clone()
                .unwrap_or_else(|| "disease catalog not loaded".to_string());
            EngineError::TaskUnavailable {
                task: SYMPTOM_TASK_KEY.to_string(),
                reason,
            }
        })?;

        let vector = bundle.vocabulary.encode(selected)?;
        let row = FeatureRow {
            columns: bundle.vocabulary.names().to_vec(),
            values: vector,
        };

        let (raw_label, probability) =
            take_first(bundle.classifier.predict_with_confidence(&[row])?)?;
        let (meta, confidence, message) = interpret_symptoms(&raw_label, probability, catalog)?;

        tracing::info!(
            "Symptom diagnosis complete: disease={}, confidence={:.2}%",
            meta.label,
            confidence * 100.0
        );

        Ok(PredictionResult {
            task: SYMPTOM_TASK_KEY.to_string(),
            raw_label,
            is_positive: None,
            confidence: Some(confidence),
            message,
            meta: Some(meta),
            generated_at: chrono::Utc::now(),
        })
    }
}

fn take_first<T>(mut labels: Vec<T>) -> Result<T> {
    if labels.is_empty() {
        return Err(EngineError::Predict(PredictError::Corrupt(
            "classifier returned no labels for one input row".into(),
        )));
    }
    Ok(labels.swap_remove(0))
}
