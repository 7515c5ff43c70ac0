//! Contexto de ejecución entregado a `StageDefinition::run`.
//!
//! El bundle de upstream contiene únicamente las etapas declaradas que
//! llegaron a DONE; una upstream SKIPPED simplemente no aparece en el mapa
//! (ausente, nunca error). El orden de inserción sigue el orden de
//! declaración de upstreams, por eso `IndexMap`.

use indexmap::IndexMap;
use serde_json::Value;
use tabi_domain::RunConfig;

use super::typed_artifact::{ArtifactDecodeError, ArtifactSpec};
use super::Artifact;

pub struct StageContext<'a> {
    /// Configuración del run, inmutable, pasada explícitamente (los gates y
    /// las etapas nunca la buscan en estado ambiente).
    pub config: &'a RunConfig,
    /// Artifacts de upstreams DONE, por nombre de etapa.
    pub upstream: IndexMap<String, Artifact>,
    /// Parámetros canónicos de la etapa.
    pub params: Value,
}

impl<'a> StageContext<'a> {
    /// Payload crudo de una upstream disponible.
    pub fn upstream_payload(&self, stage_id: &str) -> Option<&Value> {
        self.upstream.get(stage_id).map(|a| &a.payload)
    }

    /// Decodifica una upstream al tipo de su esquema. `Ok(None)` significa
    /// "no disponible" (upstream gated-out); un artifact presente pero
    /// indecodificable es un error.
    pub fn decode_upstream<T: ArtifactSpec>(&self, stage_id: &str) -> Result<Option<T>, ArtifactDecodeError> {
        match self.upstream.get(stage_id) {
            None => Ok(None),
            Some(a) => T::from_artifact(a).map(Some),
        }
    }
}
