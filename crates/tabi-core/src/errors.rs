//! Errores del core del pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum PipelineError {
    #[error("run already completed")]
    RunCompleted,
    #[error("run has failed previously (stop-on-failure invariant)")]
    RunHasFailed,
    #[error("duplicate stage id: {0}")]
    DuplicateStage(String),
    #[error("stage {stage}: upstream {upstream} is not defined earlier in the pipeline")]
    UnknownUpstream { stage: String, upstream: String },
    #[error("stage {stage}: schema {schema} is not registered")]
    UnknownSchema { stage: String, schema: String },
    #[error("stage {stage}: schema violation at `{field}`: {message}")]
    SchemaViolation { stage: String, field: String, message: String },
    #[error("stage {stage}: collaborator error: {message}")]
    Collaborator { stage: String, message: String },
    #[error("internal: {0}")]
    Internal(String),
}
