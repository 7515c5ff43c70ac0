//! Driver de ejecución: de un `inputs` JSON al documento final de itinerario.
//!
//! Cada invocación arma un engine en memoria nuevo: los runs HTTP son
//! independientes entre sí y la bitácora de resultados es el único estado
//! compartido.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tabi_adapters::{build_itinerary_pipeline, schema_registry, MockReasoner, MockScrape, MockSearch};
use tabi_core::{PipelineEngine, PipelineError};
use tabi_domain::RunConfig;
use tabi_persistence::{PersistenceError, ResultsLog};
use uuid::Uuid;

use crate::config::CONFIG;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Entrada inválida del caller (HTTP 400).
    #[error("entrada inválida: {0}")]
    Input(String),
    /// Falla de pipeline (HTTP 500).
    #[error("el pipeline falló: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("bitácora de resultados: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("el run terminó sin artifact final")]
    MissingFinalArtifact,
}

/// Corre el pipeline completo para `inputs` y devuelve el documento final.
/// El documento queda también registrado en la bitácora.
pub fn run_once(inputs: &Value) -> Result<Value, DriverError> {
    run_once_with_log(inputs, &ResultsLog::new(&CONFIG.results.path))
}

pub fn run_once_with_log(inputs: &Value, results: &ResultsLog) -> Result<Value, DriverError> {
    let config = RunConfig::from_value(inputs).map_err(|e| DriverError::Input(e.to_string()))?;

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let definition = build_itinerary_pipeline(Arc::new(MockReasoner),
                                              Arc::new(MockSearch::new(today)),
                                              Arc::new(MockScrape))?;
    let mut engine = PipelineEngine::in_memory(Arc::new(schema_registry()));

    let run_id = Uuid::new_v4();
    log::info!("run {run_id}: arrancando pipeline de {} etapas", definition.len());
    engine.run_to_completion(run_id, &definition, &config)?;

    let artifact = engine.final_artifact(run_id, &definition)
        .ok_or(DriverError::MissingFinalArtifact)?;
    let doc = artifact.payload;

    results.append(&doc)?;
    log::info!("run {run_id}: completado y registrado en {}", results.path().display());
    Ok(doc)
}
