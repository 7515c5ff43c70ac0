//! Implementación del PipelineEngine.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::json;
use uuid::Uuid;

use tabi_domain::RunConfig;

use crate::errors::PipelineError;
use crate::event::{EventStore, RunEvent, RunEventKind};
use crate::hashing::hash_value;
use crate::model::{Artifact, StageContext};
use crate::registry::SchemaRegistry;
use crate::repo::{PipelineDefinition, RunRepository};
use crate::stage::{StageDefinition, StageRunResult};

/// Desenlace observable de una etapa tras (o durante) un run.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// La etapa produjo un artifact válido.
    Done(Artifact),
    /// El gate de la etapa evaluó a falso; no se ejecutó.
    Skipped,
    /// La etapa falló con un error terminal.
    Failed(PipelineError),
    /// La etapa aún no fue alcanzada por el run.
    Pending,
}

/// Motor de ejecución de pipelines deterministas.
///
/// Responsable de orquestar la ejecución de etapas (gate -> contexto ->
/// run -> validación de esquema), mantener el estado interno y garantizar
/// el determinismo mediante fingerprints.
pub struct PipelineEngine<E, R>
    where E: EventStore,
          R: RunRepository
{
    event_store: E,
    repository: R,
    registry: Arc<SchemaRegistry>,
    artifact_store: HashMap<String, Artifact>,
}

impl PipelineEngine<crate::event::InMemoryEventStore, crate::repo::InMemoryRunRepository> {
    /// Crea un engine con stores en memoria.
    pub fn in_memory(registry: Arc<SchemaRegistry>) -> Self {
        Self::new_with_stores(crate::event::InMemoryEventStore::default(),
                              crate::repo::InMemoryRunRepository::new(),
                              registry)
    }
}

impl<E, R> PipelineEngine<E, R>
    where E: EventStore,
          R: RunRepository
{
    /// Crea un motor con los stores proporcionados.
    pub fn new_with_stores(event_store: E, repository: R, registry: Arc<SchemaRegistry>) -> Self {
        Self { event_store,
               repository,
               registry,
               artifact_store: HashMap::new() }
    }

    /// Recupera un artifact por su hash.
    pub fn get_artifact(&self, hash: &str) -> Option<&Artifact> {
        self.artifact_store.get(hash)
    }

    fn store_artifact(&mut self, artifact: Artifact) {
        self.artifact_store.insert(artifact.hash.clone(), artifact);
    }

    /// Garantiza el evento `RunInitialized` y devuelve los eventos actuales
    /// del run (incluyendo el posiblemente recién agregado).
    fn load_or_init(&mut self, run_id: Uuid, definition: &PipelineDefinition) -> Vec<RunEvent> {
        let mut events = self.event_store.list(run_id);
        let has_init = events.iter().any(|e| matches!(e.kind, RunEventKind::RunInitialized { .. }));
        if !has_init {
            let ev = self.event_store
                         .append_kind(run_id,
                                      RunEventKind::RunInitialized { definition_hash: definition.definition_hash.clone(),
                                                                     stage_count: definition.len() });
            events.push(ev);
        }
        events
    }

    /// Ejecuta el run hasta terminar (todas las etapas en estado terminal o
    /// primera falla).
    pub fn run_to_completion(&mut self,
                             run_id: Uuid,
                             definition: &PipelineDefinition,
                             config: &RunConfig)
                             -> Result<Uuid, PipelineError> {
        loop {
            match self.next_with(run_id, definition, config) {
                Ok(()) => continue,
                Err(PipelineError::RunCompleted) => return Ok(run_id),
                Err(e) => return Err(e),
            }
        }
    }

    /// Avanza exactamente una etapa del run.
    pub fn next_with(&mut self,
                     run_id: Uuid,
                     definition: &PipelineDefinition,
                     config: &RunConfig)
                     -> Result<(), PipelineError> {
        let events = self.load_or_init(run_id, definition);
        let instance = self.repository.load(run_id, &events, definition);

        if instance.completed {
            return Err(PipelineError::RunCompleted);
        }
        if instance.failed {
            return Err(PipelineError::RunHasFailed);
        }

        let cursor = instance.cursor;
        if cursor >= definition.len() {
            return Err(PipelineError::RunCompleted);
        }

        let stage_def = &definition.stages[cursor];

        // Gate primero: una etapa no elegible se marca Skipped sin ejecutar.
        if let Some(gate) = stage_def.gate() {
            if !gate.evaluate(config) {
                let _ = self.event_store
                            .append_kind(run_id,
                                         RunEventKind::StageSkipped { stage_index: cursor,
                                                                      stage_id: stage_def.id().to_string(),
                                                                      gate: gate.name().to_string() });
                if cursor + 1 == definition.len() {
                    self.complete_run(run_id, definition);
                }
                return Ok(());
            }
        }

        // Bundle de upstreams: sólo etapas Done aportan su artifact; las
        // Skipped simplemente no aparecen en el mapa.
        let mut upstream: IndexMap<String, Artifact> = IndexMap::new();
        for up_id in stage_def.upstreams() {
            let slot = definition.index_of(up_id)
                                 .and_then(|i| instance.slots.get(i));
            if let Some(slot) = slot {
                if let Some(art) = slot.output.as_ref().and_then(|h| self.artifact_store.get(h)) {
                    upstream.insert((*up_id).to_string(), art.clone());
                }
            }
        }

        let ctx = StageContext { config,
                                 upstream,
                                 params: stage_def.base_params() };

        let _ = self.event_store
                    .append_kind(run_id,
                                 RunEventKind::StageStarted { stage_index: cursor,
                                                              stage_id: stage_def.id().to_string() });

        match stage_def.run(&ctx) {
            StageRunResult::Success { artifact } => {
                self.handle_stage_success(run_id, cursor, stage_def.as_ref(), artifact, definition)
            }
            StageRunResult::Failure { error } => {
                self.handle_stage_failure(run_id, cursor, stage_def.as_ref(), definition, error)
            }
        }
    }

    fn handle_stage_success(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            mut artifact: Artifact,
                            definition: &PipelineDefinition)
                            -> Result<(), PipelineError> {
        // Validación contra el Schema Registry ANTES de publicar el output.
        let schema = stage_def.schema();
        match self.registry.validate(schema, &artifact) {
            None => {
                let error = PipelineError::UnknownSchema { stage: stage_def.id().to_string(),
                                                           schema: schema.to_string() };
                return self.handle_stage_failure(run_id, cursor, stage_def, definition, error);
            }
            Some(Err(violation)) => {
                let error = PipelineError::SchemaViolation { stage: stage_def.id().to_string(),
                                                             field: violation.field,
                                                             message: violation.message };
                return self.handle_stage_failure(run_id, cursor, stage_def, definition, error);
            }
            Some(Ok(())) => {}
        }

        let output_hash = hash_value(&artifact.payload);
        artifact.hash = output_hash.clone();
        self.store_artifact(artifact);

        let fp = self.calculate_stage_fingerprint(cursor, stage_def, &output_hash, definition);
        let _ = self.event_store
                    .append_kind(run_id,
                                 RunEventKind::StageFinished { stage_index: cursor,
                                                               stage_id: stage_def.id().to_string(),
                                                               output: output_hash,
                                                               fingerprint: fp });

        if cursor + 1 == definition.len() {
            self.complete_run(run_id, definition);
        }

        Ok(())
    }

    fn handle_stage_failure(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            definition: &PipelineDefinition,
                            error: PipelineError)
                            -> Result<(), PipelineError> {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": definition.definition_hash,
            "stage_index": cursor,
            "params": stage_def.base_params()
        });
        let fp = hash_value(&fp_json);

        let _ = self.event_store
                    .append_kind(run_id,
                                 RunEventKind::StageFailed { stage_index: cursor,
                                                             stage_id: stage_def.id().to_string(),
                                                             error: error.clone(),
                                                             fingerprint: fp });
        Err(error)
    }

    fn calculate_stage_fingerprint(&self,
                                   cursor: usize,
                                   stage_def: &dyn StageDefinition,
                                   output_hash: &str,
                                   definition: &PipelineDefinition)
                                   -> String {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": definition.definition_hash,
            "stage_index": cursor,
            "output_hash": output_hash,
            "params": stage_def.base_params()
        });
        hash_value(&fp_json)
    }

    fn complete_run(&mut self, run_id: Uuid, definition: &PipelineDefinition) {
        let events = self.event_store.list(run_id);
        let stage_fps: Vec<String> = events.iter()
                                           .filter_map(|e| match &e.kind {
                                               RunEventKind::StageFinished { fingerprint, .. } => Some(fingerprint.clone()),
                                               _ => None,
                                           })
                                           .collect();

        let run_fp = hash_value(&json!({
                                    "engine_version": crate::constants::ENGINE_VERSION,
                                    "definition_hash": definition.definition_hash,
                                    "stage_fingerprints": stage_fps
                                }));

        let _ = self.event_store
                    .append_kind(run_id, RunEventKind::RunCompleted { run_fingerprint: run_fp });
    }

    /// Desenlace por etapa, en orden de definición.
    pub fn run_state(&self, run_id: Uuid, definition: &PipelineDefinition) -> IndexMap<String, StageOutcome> {
        let mut state: IndexMap<String, StageOutcome> =
            definition.stages
                      .iter()
                      .map(|s| (s.id().to_string(), StageOutcome::Pending))
                      .collect();

        for ev in self.event_store.list(run_id) {
            match ev.kind {
                RunEventKind::StageFinished { stage_id, output, .. } => {
                    if let Some(art) = self.artifact_store.get(&output) {
                        state.insert(stage_id, StageOutcome::Done(art.clone()));
                    }
                }
                RunEventKind::StageSkipped { stage_id, .. } => {
                    state.insert(stage_id, StageOutcome::Skipped);
                }
                RunEventKind::StageFailed { stage_id, error, .. } => {
                    state.insert(stage_id, StageOutcome::Failed(error));
                }
                _ => {}
            }
        }
        state
    }

    /// Artifact producido por la etapa `stage_id`, si terminó Done.
    pub fn stage_artifact(&self, run_id: Uuid, stage_id: &str) -> Option<Artifact> {
        self.event_store
            .list(run_id)
            .iter()
            .find_map(|e| match &e.kind {
                RunEventKind::StageFinished { stage_id: sid, output, .. } if sid == stage_id => {
                    self.artifact_store.get(output).cloned()
                }
                _ => None,
            })
    }

    /// Artifact de la última etapa del pipeline (el documento final).
    pub fn final_artifact(&self, run_id: Uuid, definition: &PipelineDefinition) -> Option<Artifact> {
        definition.stages
                  .last()
                  .and_then(|s| self.stage_artifact(run_id, s.id()))
    }

    /// Lista eventos del run.
    pub fn events(&self, run_id: Uuid) -> Vec<RunEvent> {
        self.event_store.list(run_id)
    }

    /// Variante compacta de eventos (útil en asserts de tests).
    pub fn event_variants(&self, run_id: Uuid) -> Vec<&'static str> {
        self.event_store
            .list(run_id)
            .iter()
            .map(|e| match e.kind {
                RunEventKind::RunInitialized { .. } => "I",
                RunEventKind::StageStarted { .. } => "S",
                RunEventKind::StageSkipped { .. } => "K",
                RunEventKind::StageFinished { .. } => "F",
                RunEventKind::StageFailed { .. } => "X",
                RunEventKind::RunCompleted { .. } => "C",
            })
            .collect()
    }

    /// Fingerprint agregado del run si terminó completo.
    pub fn run_fingerprint(&self, run_id: Uuid) -> Option<String> {
        self.event_store
            .list(run_id)
            .iter()
            .rev()
            .find_map(|e| match &e.kind {
                RunEventKind::RunCompleted { run_fingerprint } => Some(run_fingerprint.clone()),
                _ => None,
            })
    }
}
