//! Tipos de evento del run y estructura `RunEvent`.
//!
//! Rol en el pipeline:
//! - Cada ejecución del `PipelineEngine` emite eventos a un `EventStore`
//!   append-only.
//! - Estos eventos permiten reconstruir el estado del `RunRepository`
//!   (replay) sin depender de estructuras mutables.
//! - El enum `RunEventKind` define el contrato observable y estable del
//!   motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::PipelineError;

/// Eventos soportados por el motor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Emisión inicial de un run: fija la `definition_hash` y cantidad de
    /// etapas. Invariante: debe ser el primer evento de un `run_id`.
    RunInitialized { definition_hash: String, stage_count: usize },
    /// Una etapa comenzó su ejecución. No implica éxito.
    StageStarted { stage_index: usize, stage_id: String },
    /// Una etapa quedó fuera del run porque su gate evaluó a falso.
    /// Terminal para la etapa; el run continúa con la siguiente.
    StageSkipped {
        stage_index: usize,
        stage_id: String,
        gate: String,
    },
    /// Una etapa terminó correctamente, con el hash de su output y su
    /// fingerprint.
    StageFinished {
        stage_index: usize,
        stage_id: String,
        output: String,
        fingerprint: String,
    },
    /// Una etapa terminó con error terminal. El run no continúa
    /// (stop-on-failure).
    StageFailed {
        stage_index: usize,
        stage_id: String,
        error: PipelineError,
        fingerprint: String,
    },
    /// Evento de cierre con fingerprint agregado del run (hash de
    /// fingerprints ordenados de etapas exitosas).
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64, // asignado por EventStore in-memory (orden append)
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
