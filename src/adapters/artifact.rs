//! Model artifact adapter: JSON exports of the frozen classifiers.
//!
//! Each task's trained model is exported by the training pipeline as one
//! JSON file carrying the feature layout it was trained on, a schema version,
//! and family-specific parameters. The engine treats a loaded artifact as an
//! opaque `Classifier` handle; the family only matters here.
//!
//! Load-time checks are deliberately strict. A model that loads with the
//! wrong feature order does not fail visibly, it mis-predicts on every
//! request, so any disagreement between artifact and registered schema is a
//! hard `ArtifactError`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureRow, FeatureSchema, Label};
use crate::ports::{check_row, Classifier, PredictError};

/// Error type for artifact loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact declares task {artifact:?}, expected {expected:?}")]
    TaskMismatch { artifact: String, expected: String },

    #[error("artifact schema_version {artifact} does not match registered schema version {expected}")]
    VersionMismatch { artifact: u32, expected: u32 },

    #[error("artifact feature layout does not match the registered schema: {0}")]
    SchemaMismatch(String),

    #[error("malformed model parameters: {0}")]
    Malformed(String),
}

/// On-disk artifact structure produced by the training pipeline export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    pub task: String,
    pub feature_names: Vec<String>,
    #[serde(flatten)]
    pub params: ModelParams,
}

/// Family-specific trained parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelParams {
    Logistic(LogisticParams),
    DecisionTree(TreeParams),
    Softmax(SoftmaxParams),
}

impl ModelParams {
    fn family_name(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic",
            Self::DecisionTree(_) => "decision_tree",
            Self::Softmax(_) => "softmax",
        }
    }
}

/// Standard-scaler + logistic regression export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticParams {
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub positive_label: Label,
    pub negative_label: Label,
}

/// Single decision tree export: a flat node array, root at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: Label,
    },
}

/// Multi-class linear model export with softmax probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftmaxParams {
    pub classes: Vec<String>,
    /// One weight row per class, each of feature length.
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl ModelArtifact {
    /// Internal consistency checks, independent of any registered schema.
    fn validate(&self) -> Result<(), ArtifactError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ArtifactError::Malformed("empty feature_names".into()));
        }

        match &self.params {
            ModelParams::Logistic(p) => {
                if p.coefficients.len() != n
                    || p.scaler_mean.len() != n
                    || p.scaler_scale.len() != n
                {
                    return Err(ArtifactError::Malformed(format!(
                        "logistic parameter lengths do not match {n} feature names"
                    )));
                }
                if p.scaler_scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                    return Err(ArtifactError::Malformed(
                        "scaler_scale entries must be finite and non-zero".into(),
                    ));
                }
                if p.positive_label == p.negative_label {
                    return Err(ArtifactError::Malformed(
                        "positive_label and negative_label must differ".into(),
                    ));
                }
            }
            ModelParams::DecisionTree(p) => validate_tree(&p.nodes, n)?,
            ModelParams::Softmax(p) => {
                let k = p.classes.len();
                if k < 2 {
                    return Err(ArtifactError::Malformed(
                        "softmax model needs at least two classes".into(),
                    ));
                }
                if p.weights.len() != k || p.biases.len() != k {
                    return Err(ArtifactError::Malformed(format!(
                        "softmax has {k} classes but {} weight rows and {} biases",
                        p.weights.len(),
                        p.biases.len()
                    )));
                }
                if let Some(row) = p.weights.iter().find(|row| row.len() != n) {
                    return Err(ArtifactError::Malformed(format!(
                        "softmax weight row has length {}, expected {n}",
                        row.len()
                    )));
                }
            }
        }
        Ok(())
    }

    fn into_classifier(self) -> Arc<dyn Classifier> {
        let names = self.feature_names;
        match self.params {
            ModelParams::Logistic(params) => Arc::new(LogisticModel { names, params }),
            ModelParams::DecisionTree(params) => Arc::new(DecisionTreeModel { names, params }),
            ModelParams::Softmax(params) => Arc::new(SoftmaxModel { names, params }),
        }
    }
}

/// Reject out-of-bounds child indices and revisited nodes up front, so the
/// predict-time walk cannot loop.
fn validate_tree(nodes: &[TreeNode], n_features: usize) -> Result<(), ArtifactError> {
    if nodes.is_empty() {
        return Err(ArtifactError::Malformed("decision tree has no nodes".into()));
    }
    let mut visited = vec![false; nodes.len()];
    let mut stack = vec![0usize];
    while let Some(index) = stack.pop() {
        if visited[index] {
            return Err(ArtifactError::Malformed(format!(
                "decision tree node {index} is reachable twice (cycle or shared subtree)"
            )));
        }
        visited[index] = true;
        if let TreeNode::Split {
            feature,
            left,
            right,
            ..
        } = &nodes[index]
        {
            if *feature >= n_features {
                return Err(ArtifactError::Malformed(format!(
                    "split node {index} references feature {feature}, but the model has {n_features}"
                )));
            }
            for child in [*left, *right] {
                if child >= nodes.len() {
                    return Err(ArtifactError::Malformed(format!(
                        "split node {index} references missing child {child}"
                    )));
                }
                stack.push(child);
            }
        }
    }
    Ok(())
}

/// A loaded, validated artifact: the opaque handle plus identification.
pub struct LoadedArtifact {
    pub task_key: String,
    pub schema_version: u32,
    pub family: &'static str,
    /// SHA-256 fingerprint of the artifact bytes (first 8 bytes, hex).
    pub fingerprint: String,
    pub classifier: Arc<dyn Classifier>,
}

impl std::fmt::Debug for LoadedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifact")
            .field("task_key", &self.task_key)
            .field("schema_version", &self.schema_version)
            .field("family", &self.family)
            .field("fingerprint", &self.fingerprint)
            .field("classifier", &"<dyn Classifier>")
            .finish()
    }
}

/// Load an artifact file and run its internal consistency checks.
///
/// # Errors
/// `ArtifactError` if the file is unreadable, not valid artifact JSON, or
/// internally inconsistent.
pub fn load_artifact(path: &Path) -> Result<LoadedArtifact, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let fingerprint = compute_fingerprint(&bytes);

    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Format {
            path: path.display().to_string(),
            source,
        })?;
    artifact.validate()?;

    tracing::info!(
        "Loaded model artifact {:?} (task={}, family={}, n_features={}, fingerprint={})",
        path,
        artifact.task,
        artifact.params.family_name(),
        artifact.feature_names.len(),
        fingerprint
    );

    Ok(LoadedArtifact {
        task_key: artifact.task.clone(),
        schema_version: artifact.schema_version,
        family: artifact.params.family_name(),
        fingerprint,
        classifier: artifact.into_classifier(),
    })
}

/// Load an artifact and verify it against the registered schema it will
/// serve: task key, schema version, and the exact ordered feature names.
///
/// # Errors
/// `ArtifactError` on any disagreement; a mismatched artifact must disable
/// the task, never serve it.
pub fn load_artifact_for_schema(
    path: &Path,
    schema: &FeatureSchema,
) -> Result<LoadedArtifact, ArtifactError> {
    let loaded = load_artifact(path)?;

    if loaded.task_key != schema.task.key() {
        return Err(ArtifactError::TaskMismatch {
            artifact: loaded.task_key,
            expected: schema.task.key().to_string(),
        });
    }
    if loaded.schema_version != schema.version {
        return Err(ArtifactError::VersionMismatch {
            artifact: loaded.schema_version,
            expected: schema.version,
        });
    }

    let artifact_names = loaded.classifier.feature_names();
    let schema_names = schema.feature_names();
    if artifact_names.len() != schema_names.len() {
        return Err(ArtifactError::SchemaMismatch(format!(
            "artifact has {} features, schema has {}",
            artifact_names.len(),
            schema_names.len()
        )));
    }
    for (index, (artifact_name, schema_name)) in
        artifact_names.iter().zip(schema_names.iter()).enumerate()
    {
        if artifact_name != schema_name {
            return Err(ArtifactError::SchemaMismatch(format!(
                "feature {index} is {artifact_name:?} in the artifact but {schema_name:?} in the schema"
            )));
        }
    }

    Ok(loaded)
}

fn compute_fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();

    // First 8 bytes are enough for identification in logs.
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

struct LogisticModel {
    names: Vec<String>,
    params: LogisticParams,
}

impl LogisticModel {
    /// Positive-class probability for one row: standard scaling followed by
    /// the linear term, matching the training pipeline exactly.
    fn probability(&self, row: &FeatureRow) -> f64 {
        let p = &self.params;
        let mut z = p.intercept;
        for i in 0..row.values.len() {
            let scaled = (row.values[i] - p.scaler_mean[i]) / p.scaler_scale[i];
            z += p.coefficients[i] * scaled;
        }
        sigmoid(z)
    }

    fn classify(&self, probability: f64) -> (Label, f64) {
        if probability >= 0.5 {
            (self.params.positive_label.clone(), probability)
        } else {
            (self.params.negative_label.clone(), 1.0 - probability)
        }
    }
}

impl Classifier for LogisticModel {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn supports_confidence(&self) -> bool {
        true
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>, PredictError> {
        self.predict_with_confidence(rows)
            .map(|labels| labels.into_iter().map(|(label, _)| label).collect())
    }

    fn predict_with_confidence(
        &self,
        rows: &[FeatureRow],
    ) -> Result<Vec<(Label, f64)>, PredictError> {
        rows.iter()
            .map(|row| {
                check_row(&self.names, row)?;
                Ok(self.classify(self.probability(row)))
            })
            .collect()
    }
}

struct DecisionTreeModel {
    names: Vec<String>,
    params: TreeParams,
}

impl Classifier for DecisionTreeModel {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>, PredictError> {
        rows.iter()
            .map(|row| {
                check_row(&self.names, row)?;
                let nodes = &self.params.nodes;
                let mut index = 0usize;
                // Bounded by the node count; load-time validation rejects cycles.
                for _ in 0..=nodes.len() {
                    match &nodes[index] {
                        TreeNode::Leaf { label } => return Ok(label.clone()),
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            index = if row.values[*feature] <= *threshold {
                                *left
                            } else {
                                *right
                            };
                        }
                    }
                }
                Err(PredictError::Corrupt(
                    "decision tree walk did not reach a leaf".into(),
                ))
            })
            .collect()
    }
}

struct SoftmaxModel {
    names: Vec<String>,
    params: SoftmaxParams,
}

impl SoftmaxModel {
    /// Class probabilities for one row, numerically stabilized.
    fn probabilities(&self, row: &FeatureRow) -> Vec<f64> {
        let p = &self.params;
        let scores: Vec<f64> = p
            .weights
            .iter()
            .zip(p.biases.iter())
            .map(|(weights, bias)| {
                bias + weights
                    .iter()
                    .zip(row.values.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
            })
            .collect();

        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }
}

impl Classifier for SoftmaxModel {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn supports_confidence(&self) -> bool {
        true
    }

    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<Label>, PredictError> {
        self.predict_with_confidence(rows)
            .map(|labels| labels.into_iter().map(|(label, _)| label).collect())
    }

    fn predict_with_confidence(
        &self,
        rows: &[FeatureRow],
    ) -> Result<Vec<(Label, f64)>, PredictError> {
        rows.iter()
            .map(|row| {
                check_row(&self.names, row)?;
                let probabilities = self.probabilities(row);
                let (best, probability) = probabilities
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.total_cmp(b.1))
                    .ok_or_else(|| PredictError::Corrupt("softmax produced no classes".into()))?;
                Ok((
                    Label::Text(self.params.classes[best].clone()),
                    *probability,
                ))
            })
            .collect()
    }
}
