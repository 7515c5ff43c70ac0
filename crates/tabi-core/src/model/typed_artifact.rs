//! Tipado fuerte opcional para `Artifact` manteniendo el núcleo agnóstico.
//!
//! Cada esquema de etapa se describe una sola vez como un tipo serde que
//! implementa `ArtifactSpec`; el Schema Registry registra su decodificación +
//! validación bajo el nombre canónico del esquema. El core no conoce ningún
//! esquema concreto.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Artifact, ArtifactKind};

/// Violación de contrato a nivel de campo. `field` es una ruta estilo
/// JSON-pointer relajado ("days[2].activities[0].sources").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(),
               message: message.into() }
    }
}

/// Errores posibles al decodificar un artifact tipado.
#[derive(Debug)]
pub enum ArtifactDecodeError {
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    VersionMismatch { expected: u32, found: Option<u32> },
    Deserialize(String),
    Validation(FieldViolation),
}

impl std::fmt::Display for ArtifactDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactDecodeError::KindMismatch { expected, found } => {
                write!(f, "artifact kind mismatch: expected {expected:?}, found {found:?}")
            }
            ArtifactDecodeError::VersionMismatch { expected, found } => {
                write!(f, "schema_version mismatch: expected {expected}, found {found:?}")
            }
            ArtifactDecodeError::Deserialize(m) => write!(f, "deserialize: {m}"),
            ArtifactDecodeError::Validation(v) => write!(f, "validation at `{}`: {}", v.field, v.message),
        }
    }
}

/// Especificación de un artifact tipado: forma serde + validación semántica.
pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned + Clone {
    /// Kind asociado (permite distinguir en runtime).
    const KIND: ArtifactKind = ArtifactKind::StageJson;
    /// Versión de esquema (incrementar en cambios incompatibles).
    const SCHEMA_VERSION: u32 = 1;

    /// Validación de contrato (rangos, enums, min_items, fuentes datadas).
    /// Sin efectos secundarios.
    fn validate(&self) -> Result<(), FieldViolation> {
        Ok(())
    }

    /// Campo que lleva la versión dentro del payload.
    fn version_field_name() -> &'static str {
        "schema_version"
    }

    /// Serializa a `Artifact` sin hash (lo añadirá el engine).
    fn into_artifact(self) -> Artifact {
        let mut value = serde_json::to_value(&self).expect("serialize artifact spec");
        if let Value::Object(map) = &mut value {
            map.entry(Self::version_field_name().to_string())
               .or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Artifact::new_unhashed(Self::KIND, value, None)
    }

    /// Decodifica desde artifact neutro verificando kind, versión y
    /// ejecutando `validate`.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactDecodeError> {
        if a.kind != Self::KIND {
            return Err(ArtifactDecodeError::KindMismatch { expected: Self::KIND,
                                                           found: a.kind.clone() });
        }
        let found_version = a.payload
                             .get(Self::version_field_name())
                             .and_then(|v| v.as_u64())
                             .map(|v| v as u32);
        match found_version {
            Some(v) if v == Self::SCHEMA_VERSION => {}
            other => {
                return Err(ArtifactDecodeError::VersionMismatch { expected: Self::SCHEMA_VERSION,
                                                                  found: other })
            }
        }
        let decoded: Self = serde_json::from_value(a.payload.clone())
            .map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ArtifactDecodeError::Validation)?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Probe {
        n: u32,
    }

    impl ArtifactSpec for Probe {
        fn validate(&self) -> Result<(), FieldViolation> {
            if self.n > 10 {
                return Err(FieldViolation::new("n", "debe ser <= 10"));
            }
            Ok(())
        }
    }

    #[test]
    fn roundtrip_inserts_and_checks_schema_version() {
        let art = Probe { n: 3 }.into_artifact();
        assert_eq!(art.payload["schema_version"], 1);
        let back = Probe::from_artifact(&art).expect("decode");
        assert_eq!(back.n, 3);
    }

    #[test]
    fn validation_failure_names_the_field() {
        let art = Probe { n: 99 }.into_artifact();
        match Probe::from_artifact(&art) {
            Err(ArtifactDecodeError::Validation(v)) => assert_eq!(v.field, "n"),
            other => panic!("esperaba Validation, llegó {other:?}"),
        }
    }

    #[test]
    fn missing_version_is_rejected() {
        let mut art = Probe { n: 1 }.into_artifact();
        art.payload.as_object_mut().unwrap().remove("schema_version");
        assert!(matches!(Probe::from_artifact(&art), Err(ArtifactDecodeError::VersionMismatch { .. })));
    }
}
