//! Feature schemas: the ordered field layout each classifier was trained on.
//!
//! A schema is static configuration, never derived at runtime. Field order in
//! an emitted row must match the order used at training time; a reordering
//! does not crash anything, it silently corrupts every prediction. The same
//! holds for categorical mappings: `NO`/`YES` encode to 1/2 for one task and
//! would be plain wrong for another, so every mapping is attached to its own
//! schema field and nothing is shared across tasks.

use serde::{Deserialize, Serialize};

use super::DiseaseTask;

/// Errors raised while encoding user input against a schema or vocabulary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("unknown symptom {name:?}: not one of the {vocabulary_len} symptoms this model knows")]
    UnknownSymptom { name: String, vocabulary_len: usize },

    #[error("unknown category {value:?} for field {field:?} (expected one of {expected:?})")]
    UnknownCategory {
        field: String,
        value: String,
        expected: Vec<String>,
    },

    #[error("missing value for field {0:?}")]
    MissingField(String),

    #[error("field {field:?} expects {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("invalid number for field {field:?}: {reason}")]
    InvalidNumber { field: String, reason: String },
}

/// Semantic kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Real-valued measurement (BMI, bilirubin, jitter...).
    Continuous,
    /// Whole-number measurement (age, pregnancies, vessel count...).
    Integer,
    /// Labeled choice encoded to the integer the model was trained on.
    Categorical,
}

/// Declared numeric range for a field.
///
/// Bounds document what the collecting UI must enforce; the encoder itself
/// only validates type (spec'd caller contract: out-of-bounds input is a UI
/// bug, not an encoding failure).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Ordered label-to-integer encoding for one categorical field.
///
/// The order is the declaration order from the training pipeline, preserved
/// so that UIs can present choices consistently and so that decode is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMap {
    entries: Vec<(String, i64)>,
}

impl CategoryMap {
    #[must_use]
    pub fn new(entries: &[(&str, i64)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(label, code)| ((*label).to_string(), *code))
                .collect(),
        }
    }

    /// Encode a human label to its trained integer code.
    ///
    /// Matching is exact (case and spacing included): a near-miss label means
    /// the caller is running against a different schema version, and guessing
    /// would hide that.
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, code)| *code)
    }

    /// Reverse lookup: trained integer code back to its label.
    #[must_use]
    pub fn decode(&self, code: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(l, _)| l.as_str())
    }

    /// Labels in declaration order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(l, _)| l.clone()).collect()
    }
}

/// One field of a feature schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Column name, verbatim from the training data (case and spacing
    /// matter: some artifact formats match by name, not position).
    pub name: String,
    pub kind: FeatureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryMap>,
}

impl FeatureSpec {
    #[must_use]
    pub fn continuous(name: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: FeatureKind::Continuous,
            bounds: Some(Bounds { min, max }),
            categories: None,
        }
    }

    #[must_use]
    pub fn integer(name: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: FeatureKind::Integer,
            bounds: Some(Bounds { min, max }),
            categories: None,
        }
    }

    #[must_use]
    pub fn categorical(name: &str, entries: &[(&str, i64)]) -> Self {
        Self {
            name: name.to_string(),
            kind: FeatureKind::Categorical,
            bounds: None,
            categories: Some(CategoryMap::new(entries)),
        }
    }
}

/// Ordered feature layout for one disease task.
///
/// The single source of truth preventing field-order drift between the UI
/// and the trained artifact. `version` is checked against the artifact's
/// `schema_version` at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub task: DiseaseTask,
    pub version: u32,
    pub features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    #[must_use]
    pub fn new(task: DiseaseTask, version: u32, features: Vec<FeatureSpec>) -> Self {
        Self {
            task,
            version,
            features,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Field names in training order.
    #[must_use]
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Check an encoded row against the declared bounds.
    ///
    /// This is the helper the collecting UI uses to enforce its side of the
    /// contract; the dispatch path does not call it.
    ///
    /// # Errors
    /// Returns one message per out-of-bounds field.
    pub fn check_bounds(&self, row: &FeatureRow) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        for (spec, value) in self.features.iter().zip(row.values.iter()) {
            if let Some(bounds) = &spec.bounds {
                if !bounds.contains(*value) {
                    errors.push(format!(
                        "{} {} out of range [{}, {}]",
                        spec.name, value, bounds.min, bounds.max
                    ));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One encoded input row: schema-ordered values with their training-time
/// column names attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureRow {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gender_map() -> CategoryMap {
        CategoryMap::new(&[("male", 1), ("female", 0)])
    }

    #[test]
    fn test_category_roundtrip() {
        let map = gender_map();
        for label in map.labels() {
            let code = map.encode(&label).expect("label should encode");
            assert_eq!(map.decode(code), Some(label.as_str()));
        }
    }

    #[test]
    fn test_category_exact_match_only() {
        let map = gender_map();
        assert_eq!(map.encode("male"), Some(1));
        assert_eq!(map.encode("Male"), None);
        assert_eq!(map.encode(" male"), None);
    }

    #[test]
    fn test_bounds_check_reports_each_field() {
        let schema = FeatureSchema::new(
            DiseaseTask::Diabetes,
            1,
            vec![
                FeatureSpec::integer("Age", 1.0, 120.0),
                FeatureSpec::continuous("BMI", 0.0, 70.0),
            ],
        );
        let row = FeatureRow {
            columns: vec!["Age".into(), "BMI".into()],
            values: vec![150.0, 25.0],
        };
        let errors = schema.check_bounds(&row).expect_err("age out of range");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Age"));
    }
}
