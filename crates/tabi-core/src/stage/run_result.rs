use crate::errors::PipelineError;
use crate::model::Artifact;

/// Desenlace de ejecutar una etapa: un artifact válido o un error tipado.
/// Variante etiquetada para que el desenlace sea serializable sin ambigüedad.
#[derive(Debug, Clone, PartialEq)]
pub enum StageRunResult {
    Success { artifact: Artifact },
    Failure { error: PipelineError },
}

impl StageRunResult {
    pub fn success(artifact: Artifact) -> Self {
        StageRunResult::Success { artifact }
    }

    pub fn failure(error: PipelineError) -> Self {
        StageRunResult::Failure { error }
    }
}
