//! Corrida end-to-end del pipeline canónico sobre el engine en memoria.

use std::sync::Arc;

use serde_json::json;
use tabi_adapters::artifacts::ItinerarySynthesis;
use tabi_adapters::{build_itinerary_pipeline, schema_registry, MockReasoner, MockScrape, MockSearch};
use tabi_core::{ArtifactSpec, PipelineEngine, StageOutcome};
use tabi_domain::RunConfig;
use uuid::Uuid;

fn engine_and_def() -> (PipelineEngine<tabi_core::InMemoryEventStore, tabi_core::InMemoryRunRepository>,
                        tabi_core::PipelineDefinition) {
    let registry = Arc::new(schema_registry());
    let def = build_itinerary_pipeline(Arc::new(MockReasoner),
                                       Arc::new(MockSearch::new("2026-06-01")),
                                       Arc::new(MockScrape)).unwrap();
    (PipelineEngine::in_memory(registry), def)
}

#[test]
fn full_run_with_all_services_completes_without_skips() {
    let (mut engine, def) = engine_and_def();
    let cfg = RunConfig::from_value(&json!({"duration": 2,
                                            "departureDate": "2026-06-02",
                                            "citiesToInclude": ["Kyoto"],
                                            "budget": "2000",
                                            "services": ["restaurants", "lodging"]})).unwrap();
    let run_id = Uuid::new_v4();
    engine.run_to_completion(run_id, &def, &cfg).unwrap();

    // RunInitialized + (Started, Finished) x 10 + RunCompleted.
    let variants = engine.event_variants(run_id);
    assert_eq!(variants.len(), 22);
    assert_eq!(variants[0], "I");
    assert_eq!(*variants.last().unwrap(), "C");
    assert!(!variants.contains(&"K"));
    assert!(!variants.contains(&"X"));

    let doc = ItinerarySynthesis::from_artifact(&engine.final_artifact(run_id, &def).unwrap()).unwrap();
    assert_eq!(doc.itinerary.len(), 1);
    assert_eq!(doc.itinerary[0].city, "Kyoto");
    let first_day = &doc.itinerary[0].days[0];
    assert!(!first_day.transport.is_empty());
    assert!(first_day.lodging.is_some());
    assert!(!first_day.dining.is_empty());
    assert!(doc.budget_overview.is_some());
    assert!(!doc.bibliography.is_empty());
}

#[test]
fn run_without_services_skips_gated_stages_and_still_completes() {
    let (mut engine, def) = engine_and_def();
    let cfg = RunConfig::from_value(&json!({"duration": 2,
                                            "departureDate": "2026-06-02",
                                            "citiesToInclude": ["Kyoto"],
                                            "budget": "2000"})).unwrap();
    let run_id = Uuid::new_v4();
    engine.run_to_completion(run_id, &def, &cfg).unwrap();

    let state = engine.run_state(run_id, &def);
    assert!(matches!(state["transport"], StageOutcome::Skipped));
    assert!(matches!(state["lodging"], StageOutcome::Skipped));
    assert!(matches!(state["dining"], StageOutcome::Skipped));
    assert!(matches!(state["itinerary_synthesis"], StageOutcome::Done(_)));

    let doc = ItinerarySynthesis::from_artifact(&engine.final_artifact(run_id, &def).unwrap()).unwrap();
    for day in &doc.itinerary[0].days {
        assert!(day.transport.is_empty());
        assert!(day.lodging.is_none());
        assert!(day.dining.is_empty());
    }
    // El budget sólo agrega actividades, pero sigue presente.
    assert!(doc.budget_overview.is_some());
}

#[test]
fn identical_configs_share_run_fingerprint() {
    let cfg = RunConfig::from_value(&json!({"duration": 2,
                                            "departureDate": "2026-06-02",
                                            "citiesToInclude": ["Kyoto"],
                                            "budget": "2000",
                                            "services": ["restaurants"]})).unwrap();

    let (mut a, def_a) = engine_and_def();
    let id_a = Uuid::new_v4();
    a.run_to_completion(id_a, &def_a, &cfg).unwrap();

    let (mut b, def_b) = engine_and_def();
    let id_b = Uuid::new_v4();
    b.run_to_completion(id_b, &def_b, &cfg).unwrap();

    assert_eq!(a.run_fingerprint(id_a).unwrap(), b.run_fingerprint(id_b).unwrap());
}
