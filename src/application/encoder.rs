//! Input encoder for the per-disease binary paths.
//!
//! Takes the validated field→value mapping the form layer collected and
//! emits one feature row in exact schema order, with the training-time
//! column names attached. Bounds are the UI's contract; the encoder checks
//! types only.

use std::collections::HashMap;

use crate::domain::{EncodeError, FeatureKind, FeatureRow, FeatureSchema};

/// Raw user-entered value before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A numeric entry (number inputs, sliders).
    Number(f64),
    /// A labeled choice (select boxes, checkboxes rendered as yes/no).
    Choice(String),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Choice(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Choice(s)
    }
}

impl RawValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "a number",
            Self::Choice(_) => "a labeled choice",
        }
    }
}

/// Field name → raw value, as handed over by the form layer.
pub type InputValues = HashMap<String, RawValue>;

/// Encode collected input against a schema into one feature row.
///
/// Iterates schema fields in training order, so the output ordering cannot
/// depend on the map's iteration order. Column names are copied from the
/// schema verbatim.
///
/// # Errors
/// `EncodeError` for a missing field, a wrongly-typed value, a non-finite
/// or non-integral number, or a category label the field's mapping does not
/// contain.
pub fn encode_row(values: &InputValues, schema: &FeatureSchema) -> Result<FeatureRow, EncodeError> {
    let mut columns = Vec::with_capacity(schema.len());
    let mut encoded = Vec::with_capacity(schema.len());

    for spec in &schema.features {
        let raw = values
            .get(&spec.name)
            .ok_or_else(|| EncodeError::MissingField(spec.name.clone()))?;

        let value = match (spec.kind, raw) {
            (FeatureKind::Continuous, RawValue::Number(v)) => {
                check_finite(&spec.name, *v)?;
                *v
            }
            (FeatureKind::Integer, RawValue::Number(v)) => {
                check_finite(&spec.name, *v)?;
                if v.fract() != 0.0 {
                    return Err(EncodeError::InvalidNumber {
                        field: spec.name.clone(),
                        reason: format!("expected a whole number, got {v}"),
                    });
                }
                *v
            }
            (FeatureKind::Categorical, RawValue::Choice(label)) => {
                // Mappings are per-task by construction: the lookup table
                // lives on this schema field and nowhere else.
                let map = spec
                    .categories
                    .as_ref()
                    .ok_or_else(|| EncodeError::UnknownCategory {
                        field: spec.name.clone(),
                        value: label.clone(),
                        expected: Vec::new(),
                    })?;
                map.encode(label).ok_or_else(|| EncodeError::UnknownCategory {
                    field: spec.name.clone(),
                    value: label.clone(),
                    expected: map.labels(),
                })? as f64
            }
            (FeatureKind::Categorical, other) => {
                return Err(EncodeError::TypeMismatch {
                    field: spec.name.clone(),
                    expected: "a labeled choice",
                    got: other.type_name(),
                })
            }
            (_, other) => {
                return Err(EncodeError::TypeMismatch {
                    field: spec.name.clone(),
                    expected: "a number",
                    got: other.type_name(),
                })
            }
        };

        columns.push(spec.name.clone());
        encoded.push(value);
    }

    Ok(FeatureRow {
        columns,
        values: encoded,
    })
}

fn check_finite(field: &str, v: f64) -> Result<(), EncodeError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(EncodeError::InvalidNumber {
            field: field.to_string(),
            reason: format!("{v} is not a finite number"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SchemaRegistry;
    use crate::domain::DiseaseTask;

    fn lung_input() -> InputValues {
        let mut values = InputValues::new();
        values.insert("GENDER".into(), "M".into());
        values.insert("AGE".into(), 62.0.into());
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
            values.insert(field.into(), "NO".into());
        }
        values.insert("SMOKING".into(), "YES".into());
        values
    }

    #[test]
    fn test_row_follows_schema_order_not_map_order() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(DiseaseTask::LungCancer);
        let row = encode_row(&lung_input(), schema).expect("encodes");

        assert_eq!(row.columns, schema.feature_names());
        assert_eq!(row.values[0], 1.0); // GENDER "M"
        assert_eq!(row.values[1], 62.0); // AGE
        assert_eq!(row.values[2], 2.0); // SMOKING "YES" -> 2
        assert_eq!(row.values[3], 1.0); // YELLOW_FINGERS "NO" -> 1
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(DiseaseTask::LungCancer);
        let input = lung_input();
        let first = encode_row(&input, schema).expect("encodes");
        for _ in 0..10 {
            assert_eq!(encode_row(&input, schema).expect("encodes"), first);
        }
    }

    #[test]
    fn test_unknown_category_is_surfaced_with_expectations() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(DiseaseTask::LungCancer);
        let mut input = lung_input();
        input.insert("SMOKING".into(), "Yes".into()); // wrong case for this task

        let err = encode_row(&input, schema).expect_err("must reject");
        match err {
            EncodeError::UnknownCategory {
                field,
                value,
                expected,
            } => {
                assert_eq!(field, "SMOKING");
                assert_eq!(value, "Yes");
                assert_eq!(expected, vec!["NO".to_string(), "YES".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_named() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(DiseaseTask::LungCancer);
        let mut input = lung_input();
        input.remove("CHESTPAIN");

        assert_eq!(
            encode_row(&input, schema),
            Err(EncodeError::MissingField("CHESTPAIN".into()))
        );
    }

    #[test]
    fn test_integer_field_rejects_fractional_value() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(DiseaseTask::LungCancer);
        let mut input = lung_input();
        input.insert("AGE".into(), 62.5.into());

        assert!(matches!(
            encode_row(&input, schema),
            Err(EncodeError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_categorical_field_rejects_bare_number() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.schema_for(DiseaseTask::LungCancer);
        let mut input = lung_input();
        input.insert("SMOKING".into(), 2.0.into());

        assert!(matches!(
            encode_row(&input, schema),
            Err(EncodeError::TypeMismatch { .. })
        ));
    }
}
