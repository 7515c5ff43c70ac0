//! Motor de ejecución de pipelines.
//!
//! Orquesta etapas en orden de definición: evalúa el gate, arma el bundle
//! de contexto con los artifacts upstream, ejecuta la etapa y valida su
//! output contra el Schema Registry antes de publicarlo.

pub mod core;

pub use core::{PipelineEngine, StageOutcome};

pub use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use crate::repo::{InMemoryRunRepository, PipelineDefinition, RunRepository};
pub use crate::stage::{StageRunResult, StageStatus};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use uuid::Uuid;

    use tabi_domain::RunConfig;

    use super::*;
    use crate::errors::PipelineError;
    use crate::gate::{self, Gate};
    use crate::model::{ArtifactSpec, FieldViolation, StageContext};
    use crate::registry::SchemaRegistry;
    use crate::repo::build_pipeline_definition;
    use crate::stage::StageDefinition;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    impl ArtifactSpec for Note {
        fn validate(&self) -> Result<(), FieldViolation> {
            if self.text.is_empty() {
                return Err(FieldViolation::new("text", "no puede estar vacío"));
            }
            Ok(())
        }
    }

    fn registry() -> Arc<SchemaRegistry> {
        let mut reg = SchemaRegistry::new();
        reg.register::<Note>("note");
        Arc::new(reg)
    }

    fn config(services: &[&str]) -> RunConfig {
        RunConfig::from_value(&json!({ "services": services })).expect("config de prueba")
    }

    // Etapa raíz que siempre produce una nota.
    struct Root;

    impl StageDefinition for Root {
        fn id(&self) -> &str {
            "root"
        }
        fn upstreams(&self) -> &[&str] {
            &[]
        }
        fn schema(&self) -> &str {
            "note"
        }
        fn run(&self, _ctx: &StageContext) -> StageRunResult {
            StageRunResult::success(Note { text: "hola".into() }.into_artifact())
        }
    }

    // Etapa con gate que concatena el texto de su upstream.
    struct Gated {
        gate: Gate,
    }

    impl Gated {
        fn on_restaurants() -> Self {
            Self { gate: Gate::single("has_restaurants", gate::has_restaurants) }
        }
    }

    impl StageDefinition for Gated {
        fn id(&self) -> &str {
            "gated"
        }
        fn upstreams(&self) -> &[&str] {
            &["root"]
        }
        fn gate(&self) -> Option<&Gate> {
            Some(&self.gate)
        }
        fn schema(&self) -> &str {
            "note"
        }
        fn run(&self, ctx: &StageContext) -> StageRunResult {
            let up: Note = match ctx.decode_upstream("root") {
                Ok(Some(n)) => n,
                other => panic!("upstream root debía estar disponible: {other:?}"),
            };
            StageRunResult::success(Note { text: format!("{} mundo", up.text) }.into_artifact())
        }
    }

    // Etapa final que reporta si su upstream gated estaba disponible.
    struct Tail;

    impl StageDefinition for Tail {
        fn id(&self) -> &str {
            "tail"
        }
        fn upstreams(&self) -> &[&str] {
            &["root", "gated"]
        }
        fn schema(&self) -> &str {
            "note"
        }
        fn run(&self, ctx: &StageContext) -> StageRunResult {
            let text = match ctx.upstream_payload("gated") {
                Some(p) => format!("con gated: {}", p["text"]),
                None => "sin gated".to_string(),
            };
            StageRunResult::success(Note { text }.into_artifact())
        }
    }

    // Etapa que emite un artifact que viola el esquema.
    struct Broken;

    impl StageDefinition for Broken {
        fn id(&self) -> &str {
            "broken"
        }
        fn upstreams(&self) -> &[&str] {
            &["root"]
        }
        fn schema(&self) -> &str {
            "note"
        }
        fn run(&self, _ctx: &StageContext) -> StageRunResult {
            StageRunResult::success(Note { text: String::new() }.into_artifact())
        }
    }

    #[test]
    fn full_run_emits_expected_event_sequence() {
        let def = build_pipeline_definition(vec![Box::new(Root) as Box<dyn StageDefinition>,
                                              Box::new(Gated::on_restaurants()),
                                              Box::new(Tail)])
            .expect("definición válida");
        let mut engine = PipelineEngine::in_memory(registry());
        let run_id = Uuid::new_v4();

        engine.run_to_completion(run_id, &def, &config(&["restaurants"]))
              .expect("run completo");

        assert_eq!(engine.event_variants(run_id), vec!["I", "S", "F", "S", "F", "S", "F", "C"]);
        assert!(engine.run_fingerprint(run_id).is_some());
    }

    #[test]
    fn gate_false_skips_stage_and_run_continues() {
        let def = build_pipeline_definition(vec![Box::new(Root) as Box<dyn StageDefinition>,
                                              Box::new(Gated::on_restaurants()),
                                              Box::new(Tail)])
            .expect("definición válida");
        let mut engine = PipelineEngine::in_memory(registry());
        let run_id = Uuid::new_v4();

        engine.run_to_completion(run_id, &def, &config(&[]))
              .expect("run completo");

        assert_eq!(engine.event_variants(run_id), vec!["I", "S", "F", "K", "S", "F", "C"]);

        let state = engine.run_state(run_id, &def);
        assert_eq!(state["gated"], StageOutcome::Skipped);

        // La downstream ve la ausencia, nunca un error.
        let tail = engine.stage_artifact(run_id, "tail").expect("tail Done");
        assert_eq!(tail.payload["text"], "sin gated");
    }

    #[test]
    fn downstream_reads_gated_upstream_when_present() {
        let def = build_pipeline_definition(vec![Box::new(Root) as Box<dyn StageDefinition>,
                                              Box::new(Gated::on_restaurants()),
                                              Box::new(Tail)])
            .expect("definición válida");
        let mut engine = PipelineEngine::in_memory(registry());
        let run_id = Uuid::new_v4();

        engine.run_to_completion(run_id, &def, &config(&["restaurants"]))
              .expect("run completo");

        let gated = engine.stage_artifact(run_id, "gated").expect("gated Done");
        assert_eq!(gated.payload["text"], "hola mundo");
        let tail = engine.stage_artifact(run_id, "tail").expect("tail Done");
        assert_eq!(tail.payload["text"], "con gated: \"hola mundo\"");
    }

    #[test]
    fn schema_violation_fails_stage_and_stops_run() {
        let def = build_pipeline_definition(vec![Box::new(Root) as Box<dyn StageDefinition>, Box::new(Broken), Box::new(Tail)])
            .expect("definición válida");
        let mut engine = PipelineEngine::in_memory(registry());
        let run_id = Uuid::new_v4();

        let err = engine.run_to_completion(run_id, &def, &config(&[]))
                        .expect_err("debía fallar");
        assert!(matches!(err, PipelineError::SchemaViolation { ref stage, ref field, .. }
                              if stage == "broken" && field == "text"));

        // tail nunca arrancó: stop-on-failure.
        assert_eq!(engine.event_variants(run_id), vec!["I", "S", "F", "S", "X"]);
        let state = engine.run_state(run_id, &def);
        assert_eq!(state["tail"], StageOutcome::Pending);

        // Reintentar sobre el mismo run es rechazado.
        assert_eq!(engine.next_with(run_id, &def, &config(&[])),
                   Err(PipelineError::RunHasFailed));
    }

    #[test]
    fn identical_runs_share_fingerprint() {
        let mk = || {
            build_pipeline_definition(vec![Box::new(Root) as Box<dyn StageDefinition>,
                                           Box::new(Gated::on_restaurants()),
                                           Box::new(Tail)]).expect("definición válida")
        };
        let cfg = config(&["restaurants"]);

        let mut e1 = PipelineEngine::in_memory(registry());
        let r1 = Uuid::new_v4();
        e1.run_to_completion(r1, &mk(), &cfg).expect("run 1");

        let mut e2 = PipelineEngine::in_memory(registry());
        let r2 = Uuid::new_v4();
        e2.run_to_completion(r2, &mk(), &cfg).expect("run 2");

        assert_eq!(e1.run_fingerprint(r1), e2.run_fingerprint(r2));
    }

    #[test]
    fn unknown_schema_is_a_stage_failure() {
        struct Orphan;
        impl StageDefinition for Orphan {
            fn id(&self) -> &str {
                "orphan"
            }
            fn upstreams(&self) -> &[&str] {
                &[]
            }
            fn schema(&self) -> &str {
                "no_registrado"
            }
            fn run(&self, _ctx: &StageContext) -> StageRunResult {
                StageRunResult::success(Note { text: "x".into() }.into_artifact())
            }
        }

        let def = build_pipeline_definition(vec![Box::new(Orphan) as Box<dyn StageDefinition>])
            .expect("definición válida");
        let mut engine = PipelineEngine::in_memory(registry());
        let run_id = Uuid::new_v4();

        let err = engine.run_to_completion(run_id, &def, &config(&[]))
                        .expect_err("debía fallar");
        assert_eq!(err,
                   PipelineError::UnknownSchema { stage: "orphan".into(),
                                                  schema: "no_registrado".into() });
    }
}
