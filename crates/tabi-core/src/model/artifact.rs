//! Artifact neutral del pipeline.
//!
//! Un `Artifact` es la unidad de datos producida por una etapa y consumida
//! por sus downstream. Es neutral:
//! - `payload` es JSON genérico; el motor no interpreta su semántica (los
//!   contratos viven en el Schema Registry).
//! - `hash` lo calcula el engine sobre el JSON canonicalizado; sirve como
//!   identidad y trazabilidad del output.
//! - `metadata` anota información auxiliar que no entra al hash.
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipos neutrales de artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Output JSON de una etapa del pipeline.
    StageJson,
}

/// Artifact producido por una etapa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,            // hash canónico del payload (asignado por engine)
    pub payload: Value,          // contenido JSON
    pub metadata: Option<Value>, // auxiliar (no entra al hash)
}

impl Artifact {
    /// Constructor interno; preferir crear artifacts a través de
    /// `ArtifactSpec::into_artifact`.
    pub(crate) fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }
}
