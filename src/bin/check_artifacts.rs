//! Deployment-time artifact check.
//!
//! Loads every registered schema, the model directory and the disease
//! catalog exactly the way the serving process would, then reports per-task
//! availability. Run this after shipping new artifacts: a schema/artifact
//! mismatch shows up here instead of as silent misdiagnosis in production.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use polydx::adapters::DiseaseCatalog;
use polydx::application::{ModelRegistry, SchemaRegistry};
use polydx::domain::DiseaseTask;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let model_dir = PathBuf::from(
        std::env::var("POLYDX_MODEL_DIR").unwrap_or_else(|_| "models".to_string()),
    );
    let catalog_path = std::env::var("POLYDX_CATALOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| model_dir.join("disease_catalog.json"));

    tracing::info!("Checking artifacts in {:?}", model_dir);

    let schemas = SchemaRegistry::builtin();
    let registry = ModelRegistry::load(&model_dir, &schemas);

    let mut unavailable = 0usize;
    for task in DiseaseTask::ALL {
        match registry.get(task) {
            Ok(loaded) => println!(
                "ok        {:16} family={:14} fingerprint={}  ({})",
                task.key(),
                loaded.family,
                loaded.fingerprint,
                task.display_name()
            ),
            Err(e) => {
                unavailable += 1;
                println!("DISABLED  {:16} {e}", task.key());
            }
        }
    }

    match registry.symptom_model() {
        Ok(bundle) => println!(
            "ok        {:16} vocabulary={} fingerprint={}",
            "symptoms",
            bundle.vocabulary.len(),
            bundle.fingerprint
        ),
        Err(e) => {
            unavailable += 1;
            println!("DISABLED  {:16} {e}", "symptoms");
        }
    }

    match DiseaseCatalog::load(&catalog_path) {
        Ok(catalog) => println!("ok        {:16} entries={}", "disease_catalog", catalog.len()),
        Err(e) => {
            unavailable += 1;
            println!("DISABLED  {:16} {e}", "disease_catalog");
        }
    }

    let total = DiseaseTask::ALL.len() + 2;
    if unavailable == total {
        anyhow::bail!("no artifact loaded from {:?}", model_dir);
    }
    if unavailable > 0 {
        tracing::warn!("{unavailable} of {total} artifacts unavailable");
    }
    Ok(())
}
