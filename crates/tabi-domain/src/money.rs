//! Montos monetarios del itinerario.
//!
//! La devise de base es EUR (TTC); los montos JPY son derivados vía un taux
//! EUR→JPY opcionalmente documentado en `FxMeta`. Sin crate decimal: se usan
//! `f64` validados (finitos, no negativos) y redondeo a céntimos al agregar.

use serde::{Deserialize, Serialize};

use crate::timefmt::{is_iso_date, is_money};
use crate::DomainError;

/// Monto TTC: EUR obligatorio, JPY derivado opcional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Money {
    pub eur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jpy: Option<u64>,
}

impl Money {
    pub fn eur(eur: f64) -> Self {
        Self { eur, jpy: None }
    }

    /// Deriva el monto JPY con el taux dado.
    pub fn with_rate(eur: f64, rate: f64) -> Self {
        Self { eur,
               jpy: Some((eur * rate).round() as u64) }
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if !is_money(self.eur) {
            return Err(DomainError::Validation(format!("monto EUR inválido: {}", self.eur)));
        }
        Ok(())
    }
}

/// Metadatos del taux de change EUR→JPY usado para derivar montos JPY.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxMeta {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    pub as_of: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl FxMeta {
    pub fn eur_jpy(rate: f64, as_of: impl Into<String>) -> Self {
        Self { base: "EUR".to_string(),
               quote: "JPY".to_string(),
               rate,
               as_of: as_of.into(),
               source_url: None }
    }

    pub fn check(&self) -> Result<(), DomainError> {
        if self.base != "EUR" || self.quote != "JPY" {
            return Err(DomainError::Validation(format!("par de devises no soportado: {}/{}", self.base, self.quote)));
        }
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(DomainError::Validation(format!("taux inválido: {}", self.rate)));
        }
        if !is_iso_date(&self.as_of) {
            return Err(DomainError::Validation(format!("as_of no es YYYY-MM-DD: {:?}", self.as_of)));
        }
        Ok(())
    }
}

/// Redondeo a céntimos para subtotales agregados.
pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
