//! Constantes del motor.
//!
//! `ENGINE_VERSION` entra en el input de los fingerprints de etapa y de run:
//! un cambio de versión del motor invalida determinísticamente los
//! fingerprints aunque la definición y los datos no cambien.

/// Versión lógica del motor de pipeline.
pub const ENGINE_VERSION: &str = "TF1.0";
