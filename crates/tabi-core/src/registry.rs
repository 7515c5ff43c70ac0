//! Schema Registry: única autoridad de contratos de output.
//!
//! Cada esquema se registra una sola vez bajo su nombre canónico; el engine
//! valida cada artifact producido contra el esquema declarado por su etapa.
//! El registry no conoce los tipos concretos: guarda closures de validación
//! construidas a partir de `ArtifactSpec`.

use std::collections::HashMap;

use crate::model::{Artifact, ArtifactDecodeError, ArtifactSpec, FieldViolation};

type Validator = Box<dyn Fn(&Artifact) -> Result<(), FieldViolation> + Send + Sync>;

/// Registro nombre -> validación de esquema.
pub struct SchemaRegistry {
    validators: HashMap<String, Validator>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self { validators: HashMap::new() }
    }

    /// Registra el esquema `name` con la decodificación + validación de `T`.
    /// Un registro posterior bajo el mismo nombre reemplaza al anterior.
    pub fn register<T: ArtifactSpec + 'static>(&mut self, name: &str) {
        let validator: Validator = Box::new(|artifact: &Artifact| {
            T::from_artifact(artifact).map(|_| ()).map_err(decode_to_violation)
        });
        self.validators.insert(name.to_string(), validator);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Valida `artifact` contra el esquema `name`. `None` si el esquema no
    /// está registrado (el engine lo traduce a `UnknownSchema`).
    pub fn validate(&self, name: &str, artifact: &Artifact) -> Option<Result<(), FieldViolation>> {
        self.validators.get(name).map(|v| v(artifact))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Aplana cualquier error de decodificación a una violación de campo.
fn decode_to_violation(err: ArtifactDecodeError) -> FieldViolation {
    match err {
        ArtifactDecodeError::Validation(v) => v,
        ArtifactDecodeError::Deserialize(msg) => {
            FieldViolation::new(field_from_serde_message(&msg), msg)
        }
        other => FieldViolation::new("<artifact>", other.to_string()),
    }
}

/// serde_json reporta campos faltantes como "missing field `x`"; extraemos
/// el nombre entre backticks para señalar el campo concreto.
fn field_from_serde_message(msg: &str) -> String {
    let mut parts = msg.split('`');
    match (parts.next(), parts.next()) {
        (Some(_), Some(field)) if !field.is_empty() => field.to_string(),
        _ => "<payload>".to_string(),
    }
}
