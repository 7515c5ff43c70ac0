//! Referencias de fuente datadas.
//!
//! Invariante del sistema: cada hoja factual de un artifact (actividad,
//! segmento de transporte, alojamiento, comida, ítem de coste) debe llevar al
//! menos una fuente con URL y fecha ISO. Los esquemas delegan aquí la
//! validación de cada referencia.

use serde::{Deserialize, Serialize};

use crate::timefmt::is_iso_date;
use crate::DomainError;

/// URL + fecha de publicación/consulta (YYYY-MM-DD).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl SourceRef {
    pub fn new(url: impl Into<String>, date: impl Into<String>) -> Self {
        Self { url: url.into(),
               date: date.into(),
               title: None }
    }

    /// Valida URL no vacía con esquema http(s) y fecha ISO.
    pub fn check(&self) -> Result<(), DomainError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(DomainError::Validation(format!("source url inválida: {:?}", self.url)));
        }
        if !is_iso_date(&self.date) {
            return Err(DomainError::Validation(format!("source date no es YYYY-MM-DD: {:?}", self.date)));
        }
        Ok(())
    }
}

/// Metadatos de generación adjuntos a varios artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationInfo {
    /// Fecha de generación (YYYY-MM-DD).
    pub generated_at: String,
    /// Fuseau de referencia, ej. "Asia/Tokyo".
    pub timezone: String,
}

impl GenerationInfo {
    /// Sello de generación con la zona de referencia del itinerario.
    pub fn today() -> Self {
        Self { generated_at: chrono::Utc::now().format("%Y-%m-%d").to_string(),
               timezone: "Asia/Tokyo".to_string() }
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if !is_iso_date(&self.generated_at) {
            return Err(DomainError::Validation(format!("generated_at no es YYYY-MM-DD: {:?}", self.generated_at)));
        }
        if self.timezone.is_empty() {
            return Err(DomainError::Validation("timezone vacío".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ref_requires_http_url_and_iso_date() {
        assert!(SourceRef::new("https://www.jma.go.jp", "2026-04-01").check().is_ok());
        assert!(SourceRef::new("jma.go.jp", "2026-04-01").check().is_err());
        assert!(SourceRef::new("https://www.jma.go.jp", "avril 2026").check().is_err());
    }

    #[test]
    fn generation_info_today_is_valid() {
        assert!(GenerationInfo::today().check().is_ok());
    }
}
