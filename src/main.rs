//! Binario `tabiflow-server`: levanta la superficie HTTP del pipeline.

use std::sync::Arc;

use tabiflow::config::CONFIG;
use tabiflow::{router, AppState, RunRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let state = AppState { registry: Arc::new(RunRegistry::new(CONFIG.jobs.registry_capacity)) };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&CONFIG.server.bind_addr).await?;
    log::info!("tabiflow-server escuchando en {}", CONFIG.server.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
