//! Definiciones relacionadas a etapas.
//!
//! Una etapa es la unidad del pipeline: consume los artifacts de sus
//! upstreams declaradas (las DONE; las SKIPPED están ausentes) más la
//! configuración del run, y produce un único artifact validado contra su
//! esquema. Este módulo define:
//! - `StageDefinition`: interfaz neutral usada por el engine.
//! - `StageRunResult`: resultado de ejecutar la etapa.
//! - `StageStatus`: estados en runtime.
//! - `ToolKind`: colaboradores externos que la etapa puede invocar.

pub mod definition;
mod run_result;
mod status;

pub use definition::{StageDefinition, ToolKind};
pub use run_result::StageRunResult;
pub use status::StageStatus;
