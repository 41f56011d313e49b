//! Schema and model registries.
//!
//! `SchemaRegistry` is static configuration: every field name, bound and
//! categorical mapping below is transcribed from the pipeline each frozen
//! artifact was trained with. Column names are verbatim, training-set
//! spellings included (`Total_Protiens`, `concave points_mean`); "fixing"
//! them here would break name-matched artifacts.
//!
//! `ModelRegistry` eagerly loads one artifact per task at process start.
//! A load failure disables that task for the process lifetime and leaves
//! every other task available.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::artifact::{load_artifact, load_artifact_for_schema, LoadedArtifact};
use crate::domain::{DiseaseTask, FeatureSchema, FeatureSpec, SymptomVocabulary};
use crate::ports::Classifier;
use crate::EngineError;

/// Dispatch key for the symptom-based multi-class path.
pub const SYMPTOM_TASK_KEY: &str = "symptoms";

/// File name of the multi-class symptom artifact inside the model directory.
const SYMPTOM_ARTIFACT_FILE: &str = "symptoms.json";

fn cont(name: &str, min: f64, max: f64) -> FeatureSpec {
    FeatureSpec::continuous(name, min, max)
}

fn int(name: &str, min: f64, max: f64) -> FeatureSpec {
    FeatureSpec::integer(name, min, max)
}

fn cat(name: &str, entries: &[(&str, i64)]) -> FeatureSpec {
    FeatureSpec::categorical(name, entries)
}

const YES_NO: &[(&str, i64)] = &[("No", 0), ("Yes", 1)];

/// Single source of truth for per-task feature layouts.
pub struct SchemaRegistry {
    /// Indexed by `DiseaseTask` discriminant; `builtin()` fills every slot.
    schemas: Vec<FeatureSchema>,
}

impl SchemaRegistry {
    /// The registered schemas, one per task, versioned alongside their
    /// artifacts.
    #[must_use]
    pub fn builtin() -> Self {
        let schemas = vec![
            Self::diabetes(),
            Self::heart(),
            Self::parkinsons(),
            Self::lung_cancer(),
            Self::liver(),
            Self::hepatitis(),
            Self::chronic_kidney(),
            Self::breast_cancer(),
        ];
        Self { schemas }
    }

    /// Schema for a task. Total: `builtin()` registers every task.
    #[must_use]
    pub fn schema_for(&self, task: DiseaseTask) -> &FeatureSchema {
        &self.schemas[task as usize]
    }

    #[must_use]
    pub fn schemas(&self) -> &[FeatureSchema] {
        &self.schemas
    }

    fn diabetes() -> FeatureSchema {
        FeatureSchema::new(
            DiseaseTask::Diabetes,
            1,
            vec![
                int("Pregnancies", 0.0, 20.0),
                int("Glucose", 0.0, 200.0),
                int("BloodPressure", 0.0, 150.0),
                int("SkinThickness", 0.0, 100.0),
                int("Insulin", 0.0, 900.0),
                cont("BMI", 0.0, 70.0),
                cont("DiabetesPedigreeFunction", 0.0, 3.0),
                int("Age", 1.0, 120.0),
            ],
        )
    }

    fn heart() -> FeatureSchema {
        FeatureSchema::new(
            DiseaseTask::Heart,
            1,
            vec![
                int("age", 1.0, 120.0),
                cat("sex", &[("male", 1), ("female", 0)]),
                cat(
                    "cp",
                    &[
                        ("typical angina", 0),
                        ("atypical angina", 1),
                        ("non-anginal pain", 2),
                        ("asymptomatic", 3),
                    ],
                ),
                int("trestbps", 50.0, 200.0),
                int("chol", 100.0, 600.0),
                cat("fbs", YES_NO),
                cat(
                    "restecg",
                    &[
                        ("normal", 0),
                        ("ST-T wave abnormality", 1),
                        ("left ventricular hypertrophy", 2),
                    ],
                ),
                int("thalach", 50.0, 250.0),
                cat("exang", YES_NO),
                cont("oldpeak", 0.0, 10.0),
                cat("slope", &[("upsloping", 0), ("flat", 1), ("downsloping", 2)]),
                int("ca", 0.0, 3.0),
                cat(
                    "thal",
                    &[("normal", 0), ("fixed defect", 1), ("reversible defect", 2)],
                ),
            ],
        )
    }

    fn parkinsons() -> FeatureSchema {
        FeatureSchema::new(
            DiseaseTask::Parkinsons,
            1,
            vec![
                cont("MDVP:Fo(Hz)", 50.0, 300.0),
                cont("MDVP:Fhi(Hz)", 50.0, 400.0),
                cont("MDVP:Flo(Hz)", 50.0, 200.0),
                cont("MDVP:Jitter(%)", 0.0, 1.0),
                cont("MDVP:Jitter(Abs)", 0.0, 0.02),
                cont("MDVP:RAP", 0.0, 0.02),
                cont("MDVP:PPQ", 0.0, 0.02),
                cont("Jitter:DDP", 0.0, 0.02),
                cont("MDVP:Shimmer", 0.0, 0.2),
                cont("MDVP:Shimmer(dB)", 0.0, 2.0),
                cont("Shimmer:APQ3", 0.0, 0.2),
                cont("Shimmer:APQ5", 0.0, 0.2),
                cont("MDVP:APQ", 0.0, 0.2),
                cont("Shimmer:DDA", 0.0, 0.5),
                cont("NHR", 0.0, 1.0),
                cont("HNR", 0.0, 50.0),
                cont("RPDE", 0.0, 2.0),
                cont("DFA", 0.0, 2.0),
                cont("spread1", -10.0, 10.0),
                cont("spread2", -10.0, 10.0),
                cont("D2", 0.0, 10.0),
                cont("PPE", 0.0, 5.0),
            ],
        )
    }

    fn lung_cancer() -> FeatureSchema {
        // 13 habit/symptom columns share the dataset's NO=1/YES=2 coding.
        let yes_no_21: &[(&str, i64)] = &[("NO", 1), ("YES", 2)];
        FeatureSchema::new(
            DiseaseTask::LungCancer,
            1,
            vec![
                cat("GENDER", &[("M", 1), ("F", 0)]),
                int("AGE", 1.0, 120.0),
                cat("SMOKING", yes_no_21),
                cat("YELLOW_FINGERS", yes_no_21),
                cat("ANXIETY", yes_no_21),
                cat("PEER_PRESSURE", yes_no_21),
                cat("CHRONICDISEASE", yes_no_21),
                cat("FATIGUE", yes_no_21),
                cat("ALLERGY", yes_no_21),
                cat("WHEEZING", yes_no_21),
                cat("ALCOHOLCONSUMING", yes_no_21),
                cat("COUGHING", yes_no_21),
                cat("SHORTNESSOFBREATH", yes_no_21),
                cat("SWALLOWINGDIFFICULTY", yes_no_21),
                cat("CHESTPAIN", yes_no_21),
            ],
        )
    }

    fn liver() -> FeatureSchema {
        // Gender comes first for this artifact, unlike every other task.
        FeatureSchema::new(
            DiseaseTask::Liver,
            1,
            vec![
                cat("Gender", &[("Male", 0), ("Female", 1)]),
                int("Age", 1.0, 120.0),
                cont("Total_Bilirubin", 0.0, 50.0),
                cont("Direct_Bilirubin", 0.0, 50.0),
                int("Alkaline_Phosphotase", 0.0, 1000.0),
                int("Alamine_Aminotransferase", 0.0, 1000.0),
                int("Aspartate_Aminotransferase", 0.0, 1000.0),
                cont("Total_Protiens", 0.0, 20.0),
                cont("Albumin", 0.0, 10.0),
                cont("Albumin_and_Globulin_Ratio", 0.0, 5.0),
            ],
        )
    }

    fn hepatitis() -> FeatureSchema {
        // HCV lab panel; this artifact codes Male=1/Female=2.
        FeatureSchema::new(
            DiseaseTask::Hepatitis,
            1,
            vec![
                int("Age", 1.0, 120.0),
                cat("Sex", &[("Male", 1), ("Female", 2)]),
                cont("ALB", 0.0, 100.0),
                cont("ALP", 0.0, 500.0),
                cont("ALT", 0.0, 500.0),
                cont("AST", 0.0, 500.0),
                cont("BIL", 0.0, 300.0),
                cont("CHE", 0.0, 20.0),
                cont("CHOL", 0.0, 15.0),
                cont("CREA", 0.0, 1100.0),
                cont("GGT", 0.0, 700.0),
                cont("PROT", 40.0, 100.0),
            ],
        )
    }

    fn chronic_kidney() -> FeatureSchema {
        let normal_abnormal: &[(&str, i64)] = &[("Normal", 1), ("Abnormal", 0)];
        let present: &[(&str, i64)] = &[("Present", 1), ("Not Present", 0)];
        let yes_no: &[(&str, i64)] = &[("Yes", 1), ("No", 0)];
        FeatureSchema::new(
            DiseaseTask::ChronicKidney,
            1,
            vec![
                int("age", 1.0, 100.0),
                int("bp", 50.0, 200.0),
                cont("sg", 1.0, 1.05),
                int("al", 0.0, 5.0),
                int("su", 0.0, 5.0),
                cat("rbc", normal_abnormal),
                cat("pc", normal_abnormal),
                cat("pcc", present),
                cat("ba", present),
                int("bgr", 50.0, 200.0),
                int("bu", 10.0, 200.0),
                int("sc", 0.0, 10.0),
                int("sod", 100.0, 200.0),
                int("pot", 2.0, 7.0),
                int("hemo", 3.0, 17.0),
                int("pcv", 20.0, 60.0),
                int("wc", 2000.0, 20000.0),
                int("rc", 2.0, 8.0),
                cat("htn", yes_no),
                cat("dm", yes_no),
                cat("cad", yes_no),
                cat("appet", &[("Good", 1), ("Poor", 0)]),
                cat("pe", yes_no),
                cat("ane", yes_no),
            ],
        )
    }

    fn breast_cancer() -> FeatureSchema {
        // WDBC columns; three of them embed a space in the trained name.
        FeatureSchema::new(
            DiseaseTask::BreastCancer,
            1,
            vec![
                cont("radius_mean", 6.0, 30.0),
                cont("texture_mean", 9.0, 40.0),
                cont("perimeter_mean", 43.0, 190.0),
                cont("area_mean", 143.0, 2501.0),
                cont("smoothness_mean", 0.05, 0.25),
                cont("compactness_mean", 0.02, 0.3),
                cont("concavity_mean", 0.0, 0.5),
                cont("concave points_mean", 0.0, 0.2),
                cont("symmetry_mean", 0.1, 1.0),
                cont("fractal_dimension_mean", 0.01, 0.1),
                cont("radius_se", 0.1, 3.0),
                cont("texture_se", 0.2, 2.0),
                cont("perimeter_se", 1.0, 30.0),
                cont("area_se", 6.0, 500.0),
                cont("smoothness_se", 0.001, 0.03),
                cont("compactness_se", 0.002, 0.2),
                cont("concavity_se", 0.0, 0.05),
                cont("concave points_se", 0.0, 0.03),
                cont("symmetry_se", 0.1, 1.0),
                cont("fractal_dimension_se", 0.01, 0.1),
                cont("radius_worst", 7.0, 40.0),
                cont("texture_worst", 12.0, 50.0),
                cont("perimeter_worst", 50.0, 250.0),
                cont("area_worst", 185.0, 4250.0),
                cont("smoothness_worst", 0.07, 0.3),
                cont("compactness_worst", 0.03, 0.6),
                cont("concavity_worst", 0.0, 0.8),
                cont("concave points_worst", 0.0, 0.2),
                cont("symmetry_worst", 0.1, 1.0),
                cont("fractal_dimension_worst", 0.01, 0.2),
            ],
        )
    }
}

/// Loaded multi-class symptom model plus the vocabulary it defines.
pub struct SymptomBundle {
    pub classifier: Arc<dyn Classifier>,
    pub vocabulary: SymptomVocabulary,
    pub fingerprint: String,
}

/// Holds every loaded classifier handle for the process lifetime.
///
/// Handles are immutable and shared read-only; concurrent prediction
/// requests need no coordination.
pub struct ModelRegistry {
    models: BTreeMap<DiseaseTask, LoadedArtifact>,
    disabled: BTreeMap<DiseaseTask, String>,
    symptom: Option<SymptomBundle>,
    symptom_error: Option<String>,
}

impl ModelRegistry {
    /// Eagerly load every task's artifact from `model_dir`.
    ///
    /// Artifacts are named `<task_key>.json`, plus `symptoms.json` for the
    /// multi-class model. Failures are captured per task: a broken or
    /// missing artifact disables that one task and nothing else.
    #[must_use]
    pub fn load(model_dir: &Path, schemas: &SchemaRegistry) -> Self {
        let mut models = BTreeMap::new();
        let mut disabled = BTreeMap::new();

        for task in DiseaseTask::ALL {
            let path = model_dir.join(format!("{}.json", task.key()));
            match load_artifact_for_schema(&path, schemas.schema_for(task)) {
                Ok(loaded) => {
                    models.insert(task, loaded);
                }
                Err(e) => {
                    tracing::warn!("Disabling task {}: {}", task.key(), e);
                    disabled.insert(task, e.to_string());
                }
            }
        }

        let (symptom, symptom_error) =
            match Self::load_symptom_bundle(&model_dir.join(SYMPTOM_ARTIFACT_FILE)) {
                Ok(bundle) => (Some(bundle), None),
                Err(e) => {
                    tracing::warn!("Disabling symptom diagnosis: {}", e);
                    (None, Some(e.to_string()))
                }
            };

        tracing::info!(
            "Model registry ready: {} task models loaded, {} disabled, symptom model {}",
            models.len(),
            disabled.len(),
            if symptom.is_some() { "loaded" } else { "unavailable" }
        );

        Self {
            models,
            disabled,
            symptom,
            symptom_error,
        }
    }

    fn load_symptom_bundle(path: &Path) -> Result<SymptomBundle, EngineError> {
        let loaded = load_artifact(path)?;
        if loaded.task_key != SYMPTOM_TASK_KEY {
            return Err(EngineError::Artifact(
                crate::adapters::ArtifactError::TaskMismatch {
                    artifact: loaded.task_key,
                    expected: SYMPTOM_TASK_KEY.to_string(),
                },
            ));
        }
        if !loaded.classifier.supports_confidence() {
            return Err(EngineError::Artifact(
                crate::adapters::ArtifactError::Malformed(
                    "symptom model must expose class probabilities".into(),
                ),
            ));
        }
        let vocabulary = SymptomVocabulary::new(loaded.classifier.feature_names().to_vec());
        Ok(SymptomBundle {
            classifier: Arc::clone(&loaded.classifier),
            vocabulary,
            fingerprint: loaded.fingerprint,
        })
    }

    /// Classifier handle for a task.
    ///
    /// # Errors
    /// `EngineError::TaskUnavailable` with the captured load failure if the
    /// task's artifact did not load.
    pub fn get(&self, task: DiseaseTask) -> crate::Result<&LoadedArtifact> {
        self.models.get(&task).ok_or_else(|| {
            let reason = self
                .disabled
                .get(&task)
                .cloned()
                .unwrap_or_else(|| "model not loaded".to_string());
            EngineError::TaskUnavailable {
                task: task.key().to_string(),
                reason,
            }
        })
    }

    /// The symptom model bundle.
    ///
    /// # Errors
    /// `EngineError::TaskUnavailable` if the symptom artifact did not load.
    pub fn symptom_model(&self) -> crate::Result<&SymptomBundle> {
        self.symptom.as_ref().ok_or_else(|| {
            let reason = self
                .symptom_error
                .clone()
                .unwrap_or_else(|| "model not loaded".to_string());
            EngineError::TaskUnavailable {
                task: SYMPTOM_TASK_KEY.to_string(),
                reason,
            }
        })
    }

    /// Tasks whose artifacts loaded successfully, in menu order.
    #[must_use]
    pub fn available_tasks(&self) -> Vec<DiseaseTask> {
        DiseaseTask::ALL
            .into_iter()
            .filter(|t| self.models.contains_key(t))
            .collect()
    }

    /// Tasks that were disabled at load time, with the captured reason.
    pub fn disabled_tasks(&self) -> impl Iterator<Item = (DiseaseTask, &str)> {
        self.disabled.iter().map(|(t, reason)| (*t, reason.as_str()))
    }

    #[must_use]
    pub fn has_symptom_model(&self) -> bool {
        self.symptom.is_some()
    }
}
