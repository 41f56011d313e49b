//! Disease catalog: read-only reference data for the symptom path.
//!
//! Maps each label the multi-class model can emit to a description and
//! exactly four precautions. Shipped as one JSON file next to the symptom
//! artifact and loaded once at startup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::DiseaseMeta;

/// Error type for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read disease catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid disease catalog {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog entry {label:?} has {got} precautions, expected exactly 4")]
    PrecautionCount { label: String, got: usize },

    #[error("catalog lists {0:?} twice")]
    DuplicateLabel(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    diseases: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    label: String,
    description: String,
    precautions: Vec<String>,
}

/// Immutable label → metadata table, keyed by the classifier's labels.
#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    entries: HashMap<String, DiseaseMeta>,
}

impl DiseaseCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    /// `CatalogError` if the file is unreadable, not valid catalog JSON, or
    /// an entry does not carry exactly four precautions.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&content).map_err(|source| CatalogError::Format {
                path: path.display().to_string(),
                source,
            })?;

        let mut entries = HashMap::with_capacity(file.diseases.len());
        for entry in file.diseases {
            let precautions: [String; 4] =
                entry
                    .precautions
                    .try_into()
                    .map_err(|got: Vec<String>| CatalogError::PrecautionCount {
                        label: entry.label.clone(),
                        got: got.len(),
                    })?;
            let meta = DiseaseMeta {
                label: entry.label.clone(),
                description: entry.description,
                precautions,
            };
            if entries.insert(entry.label.clone(), meta).is_some() {
                return Err(CatalogError::DuplicateLabel(entry.label));
            }
        }

        tracing::info!("Loaded disease catalog from {:?} ({} entries)", path, entries.len());
        Ok(Self { entries })
    }

    /// Resolve a predicted label to its metadata.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<&DiseaseMeta> {
        self.entries.get(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
