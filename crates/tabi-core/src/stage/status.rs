use serde::{Deserialize, Serialize};

/// Estado observable de una etapa dentro de un run.
///
/// Transiciones válidas:
///
/// - `Pending -> Skipped`  (gate evaluado a falso)
/// - `Pending -> Running`  (gate ausente o verdadero; la elegibilidad se
///   resuelve en la misma transición, no se persiste como estado propio)
/// - `Running -> Done`
/// - `Running -> Failed`
///
/// `Done`, `Failed` y `Skipped` son terminales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    Pending,
    Running,
    Done,
    Failed,
    Skipped,
}

impl StageStatus {
    /// ¿La etapa ya no va a cambiar de estado?
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StageStatus::Done | StageStatus::Failed | StageStatus::Skipped
        )
    }
}
