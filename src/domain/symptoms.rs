//! Symptom vocabulary: the fixed input layout of the multi-class model.
//!
//! The vocabulary is taken from the loaded artifact's feature names, never
//! from user input. Its size and order define the binary presence vector the
//! symptom model consumes.

use std::collections::HashMap;

use super::EncodeError;

/// Fixed, ordered set of symptom names known to the multi-class model.
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    /// Build a vocabulary from the artifact's feature names, preserving order.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Symptom names in model order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Encode a symptom selection into the binary presence vector.
    ///
    /// The result always has length `len()`: one slot per vocabulary entry in
    /// model order, 1.0 where the symptom was selected, 0.0 otherwise. An
    /// empty selection is valid and yields an all-zero vector.
    ///
    /// # Errors
    /// `EncodeError::UnknownSymptom` if any selected name is not in the
    /// vocabulary. A stale UI talking to a newer model must be surfaced, not
    /// silently dropped.
    pub fn encode<S: AsRef<str>>(&self, selected: &[S]) -> Result<Vec<f64>, EncodeError> {
        let mut vector = vec![0.0; self.names.len()];
        for name in selected {
            let name = name.as_ref();
            let slot = self
                .index
                .get(name)
                .ok_or_else(|| EncodeError::UnknownSymptom {
                    name: name.to_string(),
                    vocabulary_len: self.names.len(),
                })?;
            vector[*slot] = 1.0;
        }
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> SymptomVocabulary {
        SymptomVocabulary::new(vec![
            "itching".into(),
            "skin_rash".into(),
            "fatigue".into(),
            "high_fever".into(),
        ])
    }

    #[test]
    fn test_empty_selection_is_all_zero() {
        let vocab = vocabulary();
        let v = vocab.encode::<&str>(&[]).expect("empty selection is valid");
        assert_eq!(v, vec![0.0; 4]);
    }

    #[test]
    fn test_full_selection_is_all_one() {
        let vocab = vocabulary();
        let all: Vec<&str> = vocab.names().iter().map(String::as_str).collect();
        let v = vocab.encode(&all).expect("full selection is valid");
        assert_eq!(v, vec![1.0; 4]);
    }

    #[test]
    fn test_order_follows_vocabulary_not_selection() {
        let vocab = vocabulary();
        let v = vocab
            .encode(&["high_fever", "itching"])
            .expect("known symptoms");
        assert_eq!(v, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_symptom_is_rejected() {
        let vocab = vocabulary();
        let err = vocab.encode(&["headache"]).expect_err("unknown symptom");
        assert_eq!(
            err,
            EncodeError::UnknownSymptom {
                name: "headache".into(),
                vocabulary_len: 4
            }
        );
    }
}
