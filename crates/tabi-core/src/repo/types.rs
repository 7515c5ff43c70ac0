//! Tipos de repositorio: estado reconstruido (RunInstance) y definición
//! (PipelineDefinition).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! actualiza un `RunInstance` inmutable por evento. No almacena artifacts
//! completos (sólo hashes) para mantener neutralidad.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::event::{RunEvent, RunEventKind};
use crate::stage::{StageDefinition, StageStatus};

pub struct RunInstance {
    pub id: Uuid,
    pub slots: Vec<StageSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de una etapa en la instancia.
pub struct StageSlot {
    pub stage_id: String,
    pub status: StageStatus,
    pub fingerprint: Option<String>,
    pub output: Option<String>, // sólo el hash; el Artifact completo vive en el engine
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Trait para reconstruir (`replay`) el estado de un run a partir de eventos.
pub trait RunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance;
}

/// Definición inmutable del pipeline: DAG de etapas en orden topológico de
/// declaración.
pub struct PipelineDefinition {
    pub stages: Vec<Box<dyn StageDefinition>>,
    pub definition_hash: String,
}

impl std::fmt::Debug for PipelineDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineDefinition")
            .field("stages", &self.stages.iter().map(|s| s.id()).collect::<Vec<_>>())
            .field("definition_hash", &self.definition_hash)
            .finish()
    }
}

impl PipelineDefinition {
    pub fn new(stages: Vec<Box<dyn StageDefinition>>, definition_hash: String) -> Self {
        Self { stages, definition_hash }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Índice de la etapa `id`, si existe.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id() == id)
    }
}

pub struct InMemoryRunRepository;
impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InMemoryRunRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RunRepository for InMemoryRunRepository {
    fn load(&self, run_id: Uuid, events: &[RunEvent], definition: &PipelineDefinition) -> RunInstance {
        let mut slots: Vec<StageSlot> = definition.stages
                                                  .iter()
                                                  .map(|s| StageSlot { stage_id: s.id().to_string(),
                                                                       status: StageStatus::Pending,
                                                                       fingerprint: None,
                                                                       output: None,
                                                                       started_at: None,
                                                                       finished_at: None })
                                                  .collect();
        let mut completed = false;
        let mut failed = false;
        for ev in events {
            match &ev.kind {
                RunEventKind::RunInitialized { .. } => {}
                RunEventKind::StageStarted { stage_index, .. } => {
                    if let Some(slot) = slots.get_mut(*stage_index) {
                        slot.status = StageStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageSkipped { stage_index, .. } => {
                    if let Some(slot) = slots.get_mut(*stage_index) {
                        slot.status = StageStatus::Skipped;
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageFinished { stage_index,
                                              fingerprint,
                                              output,
                                              .. } => {
                    if let Some(slot) = slots.get_mut(*stage_index) {
                        slot.status = StageStatus::Done;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.output = Some(output.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                }
                RunEventKind::StageFailed { stage_index, fingerprint, .. } => {
                    if let Some(slot) = slots.get_mut(*stage_index) {
                        slot.status = StageStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                    failed = true;
                }
                RunEventKind::RunCompleted { .. } => completed = true,
            }
        }
        let cursor = slots.iter()
                          .position(|s| !s.status.is_terminal())
                          .unwrap_or(slots.len());
        RunInstance { id: run_id,
                      slots,
                      cursor,
                      completed,
                      failed }
    }
}

/// Construye la definición validando la forma del DAG:
/// - ids únicos;
/// - cada upstream referencia una etapa declarada ANTES (orden topológico por
///   construcción, sin ciclos posibles).
///
/// El `definition_hash` se calcula sobre los ids en orden.
pub fn build_pipeline_definition(stages: Vec<Box<dyn StageDefinition>>)
                                 -> Result<PipelineDefinition, PipelineError> {
    use crate::hashing::{hash_str, to_canonical_json};
    use serde_json::json;

    let mut seen: Vec<&str> = Vec::with_capacity(stages.len());
    for stage in &stages {
        let id = stage.id();
        if seen.contains(&id) {
            return Err(PipelineError::DuplicateStage(id.to_string()));
        }
        for up in stage.upstreams() {
            if !seen.contains(up) {
                return Err(PipelineError::UnknownUpstream { stage: id.to_string(),
                                                            upstream: (*up).to_string() });
            }
        }
        seen.push(id);
    }

    let ids_json = json!(seen);
    let canonical = to_canonical_json(&ids_json);
    let definition_hash = hash_str(&canonical);
    Ok(PipelineDefinition::new(stages, definition_hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StageContext;
    use crate::stage::StageRunResult;

    struct Probe {
        id: &'static str,
        ups: Vec<&'static str>,
    }

    impl StageDefinition for Probe {
        fn id(&self) -> &str {
            self.id
        }
        fn upstreams(&self) -> &[&str] {
            &self.ups
        }
        fn schema(&self) -> &str {
            "probe"
        }
        fn run(&self, _ctx: &StageContext) -> StageRunResult {
            unreachable!("no se ejecuta en estos tests")
        }
    }

    fn probe(id: &'static str, ups: Vec<&'static str>) -> Box<dyn StageDefinition> {
        Box::new(Probe { id, ups })
    }

    #[test]
    fn rejects_duplicate_stage_ids() {
        let err = build_pipeline_definition(vec![probe("a", vec![]), probe("a", vec![])]).unwrap_err();
        assert_eq!(err, PipelineError::DuplicateStage("a".into()));
    }

    #[test]
    fn rejects_upstream_not_declared_before() {
        let err = build_pipeline_definition(vec![probe("a", vec!["b"]), probe("b", vec![])]).unwrap_err();
        assert_eq!(err,
                   PipelineError::UnknownUpstream { stage: "a".into(),
                                                    upstream: "b".into() });
    }

    #[test]
    fn hash_depends_on_stage_order() {
        let d1 = build_pipeline_definition(vec![probe("a", vec![]), probe("b", vec!["a"])]).unwrap();
        let d2 = build_pipeline_definition(vec![probe("b", vec![]), probe("a", vec!["b"])]).unwrap();
        assert_ne!(d1.definition_hash, d2.definition_hash);
    }
}
