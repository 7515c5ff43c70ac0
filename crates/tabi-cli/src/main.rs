use std::sync::Arc;

use chrono::Utc;
use tabi_adapters::{build_itinerary_pipeline, schema_registry, MockReasoner, MockScrape, MockSearch};
use tabi_core::PipelineEngine;
use tabi_domain::RunConfig;
use uuid::Uuid;

fn usage() -> ! {
    eprintln!("uso: tabi-cli run --inputs '<JSON>' [--out <archivo>]");
    std::process::exit(2);
}

fn main() {
    let _ = dotenvy::dotenv();
    env_logger::init();

    // CLI mínima: `tabi-cli run --inputs '<JSON>' [--out <archivo>]`
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "run" {
        usage();
    }
    let mut inputs: Option<String> = None;
    let mut out: Option<String> = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--inputs" => {
                i += 1;
                if i < args.len() { inputs = Some(args[i].clone()); }
            }
            "--out" => {
                i += 1;
                if i < args.len() { out = Some(args[i].clone()); }
            }
            _ => usage(),
        }
        i += 1;
    }
    let Some(raw) = inputs else { usage() };

    let value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => { eprintln!("[tabi run] inputs ilegibles: {e}"); std::process::exit(2); }
    };
    let config = match RunConfig::from_value(&value) {
        Ok(c) => c,
        Err(e) => { eprintln!("[tabi run] inputs inválidos: {e}"); std::process::exit(2); }
    };

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let definition = match build_itinerary_pipeline(Arc::new(MockReasoner),
                                                    Arc::new(MockSearch::new(today)),
                                                    Arc::new(MockScrape)) {
        Ok(d) => d,
        Err(e) => { eprintln!("[tabi run] pipeline inválido: {e}"); std::process::exit(5); }
    };
    let mut engine = PipelineEngine::in_memory(Arc::new(schema_registry()));

    let run_id = Uuid::new_v4();
    if let Err(e) = engine.run_to_completion(run_id, &definition, &config) {
        eprintln!("[tabi run] el run falló: {e}");
        for variant in engine.event_variants(run_id) {
            eprintln!("  evento: {variant}");
        }
        std::process::exit(4);
    }

    let Some(artifact) = engine.final_artifact(run_id, &definition) else {
        eprintln!("[tabi run] el run terminó sin documento final");
        std::process::exit(5);
    };
    let rendered = match serde_json::to_string_pretty(&artifact.payload) {
        Ok(s) => s,
        Err(e) => { eprintln!("[tabi run] documento inserializable: {e}"); std::process::exit(5); }
    };

    match out {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, rendered) {
                eprintln!("[tabi run] no se pudo escribir {path}: {e}");
                std::process::exit(5);
            }
            println!("itinerario escrito en {path} (run {run_id})");
        }
        None => println!("{rendered}"),
    }
}
