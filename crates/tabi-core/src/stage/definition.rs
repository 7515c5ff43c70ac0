use serde_json::{json, Value};

use super::run_result::StageRunResult;
use crate::gate::Gate;
use crate::model::StageContext;

/// Colaboradores externos que una etapa tiene permitido invocar. La lista es
/// declarativa (inspección/trazabilidad); el wiring concreto vive en los
/// adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Búsqueda web (resultados datados).
    Search,
    /// Scraping de una página concreta.
    Scrape,
    /// Búsqueda dentro de un sitio.
    WebsiteSearch,
}

/// Trait que define una etapa del pipeline.
///
/// Las upstreams se declaran por nombre (no por referencia directa) para
/// mantener el grafo serializable e inspeccionable. La transformación en sí
/// se delega a un colaborador de razonamiento externo; la obligación del core
/// es armar el bundle de contexto correcto y validar el artifact devuelto.
pub trait StageDefinition {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Etapas upstream cuyos artifacts puede leer, en orden de declaración.
    fn upstreams(&self) -> &[&str];

    /// Gate opcional; `None` = etapa siempre elegible.
    fn gate(&self) -> Option<&Gate> {
        None
    }

    /// Nombre del esquema (Schema Registry) que el output debe satisfacer.
    fn schema(&self) -> &str;

    /// Herramientas externas permitidas.
    fn tools(&self) -> &[ToolKind] {
        &[]
    }

    /// Parámetros base deterministas (entran al fingerprint).
    fn base_params(&self) -> Value {
        json!({})
    }

    /// Ejecuta la etapa con su bundle de contexto.
    fn run(&self, ctx: &StageContext) -> StageRunResult;
}
