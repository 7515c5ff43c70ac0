//! Superficie HTTP: health check, kickoff síncrono, kickoff asíncrono y
//! polling de resultados.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::driver::{self, DriverError};
use crate::jobs::{JobStatus, RunRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RunRegistry>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/kickoff", post(kickoff))
        .route("/kickoff_post", post(kickoff_post))
        .route("/results/{job_id}", get(results))
        .with_state(state)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({"ok": false, "error": message}))).into_response()
}

fn status_for(err: &DriverError) -> StatusCode {
    match err {
        DriverError::Input(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Extrae el objeto `inputs` del body. Acepta tanto un objeto embebido como
/// un string JSON-encodeado (compat con el cliente original).
fn parse_inputs(body: &Value) -> Result<Value, String> {
    match body.get("inputs") {
        Some(Value::String(raw)) => serde_json::from_str(raw).map_err(|e| format!("`inputs` ilegible: {e}")),
        Some(v) => Ok(v.clone()),
        None => Err("falta el campo `inputs`".to_string()),
    }
}

/// Corrida síncrona: responde recién cuando el pipeline terminó.
async fn kickoff(Json(body): Json<Value>) -> Response {
    let inputs = match parse_inputs(&body) {
        Ok(v) => v,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let outcome = tokio::task::spawn_blocking(move || driver::run_once(&inputs)).await;
    match outcome {
        Ok(Ok(doc)) => Json(json!({"ok": true, "data": doc})).into_response(),
        Ok(Err(e)) => error_response(status_for(&e), e.to_string()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("el run se cayó: {e}")),
    }
}

/// Corrida asíncrona: registra el job y devuelve el id de inmediato.
async fn kickoff_post(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let inputs = match parse_inputs(&body) {
        Ok(v) => v,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let job_id = state.registry.start();
    let registry = state.registry.clone();
    tokio::task::spawn_blocking(move || {
        let status = match driver::run_once(&inputs) {
            Ok(doc) => JobStatus::Done(doc),
            Err(e) => {
                log::warn!("job {job_id}: falló: {e}");
                JobStatus::Failed(e.to_string())
            }
        };
        registry.finish(job_id, status);
    });
    Json(json!({"status": "accepted", "job_id": job_id})).into_response()
}

async fn results(State(state): State<AppState>, Path(job_id): Path<Uuid>) -> Response {
    match state.registry.get(job_id) {
        None => error_response(StatusCode::NOT_FOUND, format!("job desconocido: {job_id}")),
        Some(JobStatus::Running) => Json(json!({"status": "running"})).into_response(),
        Some(JobStatus::Done(doc)) => Json(json!({"status": "done", "data": doc})).into_response(),
        Some(JobStatus::Failed(message)) => Json(json!({"status": "failed", "error": message})).into_response(),
    }
}
