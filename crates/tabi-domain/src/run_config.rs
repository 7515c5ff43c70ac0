//! Configuración de entrada de un run.
//!
//! Parámetros entregados por el caller para una petición de itinerario:
//! perfil del viajero, fechas, villes à inclure/exclure, budget (EUR) y la
//! lista de `services` que pilota el gating de etapas opcionales. Inmutable
//! durante toda la vida del run.
//!
//! El front HTTP original acepta claves camelCase (`departureDate`,
//! `citiesToInclude`, ...) y valores laxos (budget/duration como string o
//! número); se normalizan aquí, nunca aguas abajo.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainError;

/// Rythme souhaité du voyage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Lent,
    Equilibre,
    Rapide,
}

impl Default for Pace {
    fn default() -> Self {
        Pace::Equilibre
    }
}

impl Pace {
    /// Nombre de actividades por día según el ritmo.
    pub fn activities_per_day(self) -> usize {
        match self {
            Pace::Lent => 2,
            Pace::Equilibre => 3,
            Pace::Rapide => 4,
        }
    }
}

/// Conjunto de services demandés ("restaurants", "lodging", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Services(pub Vec<String>);

impl Services {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|s| s == name)
    }
}

/// Budget/duration llegan como string o número según el cliente.
fn de_lax_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where D: Deserializer<'de>
{
    let v = Option::<Value>::deserialize(d)?;
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s.trim()
                                   .parse::<f64>()
                                   .map(Some)
                                   .map_err(|_| de::Error::custom(format!("valor numérico inválido: {s:?}"))),
        Some(other) => Err(de::Error::custom(format!("se esperaba número o string, llegó {other}"))),
    }
}

/// Run Input Configuration (ver SourceRef/Pace para los formatos).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(alias = "planningType")]
    pub planning_type: Option<String>,
    #[serde(alias = "travelWith")]
    pub travel_with: Option<String>,
    pub pace: Pace,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "departureDate")]
    pub departure_date: Option<String>,
    #[serde(alias = "returnDate")]
    pub return_date: Option<String>,
    #[serde(deserialize_with = "de_lax_f64")]
    pub duration: Option<f64>,
    #[serde(alias = "citiesToInclude")]
    pub cities_to_include: Vec<String>,
    #[serde(alias = "citiesToExclude")]
    pub cities_to_exclude: Vec<String>,
    #[serde(deserialize_with = "de_lax_f64")]
    pub budget: Option<f64>,
    pub comments: Option<String>,
    pub interests: Vec<String>,
    pub services: Services,
}

impl RunConfig {
    /// Parse estricto desde el body HTTP. Un valor no-objeto es un error de
    /// entrada (HTTP 400 aguas arriba), nunca llega al pipeline.
    pub fn from_value(v: &Value) -> Result<Self, DomainError> {
        if !v.is_object() {
            return Err(DomainError::Validation("`inputs` debe ser un objeto JSON".into()));
        }
        let cfg: RunConfig = serde_json::from_value(v.clone())?;
        Ok(cfg)
    }

    /// Duración en días (mínimo 1; default 3 si ausente).
    pub fn duration_days(&self) -> u32 {
        self.duration
            .map(|d| d.max(1.0) as u32)
            .unwrap_or(3)
    }

    /// Ciudades efectivas del viaje: las incluidas menos las excluidas, o un
    /// default razonable si el caller no incluye ninguna.
    pub fn effective_cities(&self) -> Vec<String> {
        let base: Vec<String> = if self.cities_to_include.is_empty() {
            vec!["Tokyo".to_string(), "Kyoto".to_string()]
        } else {
            self.cities_to_include.clone()
        };
        base.into_iter()
            .filter(|c| !self.cities_to_exclude.iter().any(|x| x.eq_ignore_ascii_case(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_camel_case_aliases_and_lax_numbers() {
        let v = json!({
            "pace": "equilibre",
            "citiesToInclude": ["Kyoto"],
            "citiesToExclude": [],
            "budget": "5000",
            "services": ["restaurants", "lodging"],
            "duration": "2",
            "departureDate": "2026-04-01"
        });
        let cfg = RunConfig::from_value(&v).expect("parse");
        assert_eq!(cfg.pace, Pace::Equilibre);
        assert_eq!(cfg.budget, Some(5000.0));
        assert_eq!(cfg.duration_days(), 2);
        assert_eq!(cfg.effective_cities(), vec!["Kyoto".to_string()]);
        assert!(cfg.services.contains("restaurants"));
    }

    #[test]
    fn rejects_non_object_inputs() {
        assert!(RunConfig::from_value(&json!("pas un objet")).is_err());
        assert!(RunConfig::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn excluded_cities_are_filtered_case_insensitive() {
        let v = json!({ "citiesToInclude": ["Tokyo", "Osaka"], "citiesToExclude": ["osaka"] });
        let cfg = RunConfig::from_value(&v).expect("parse");
        assert_eq!(cfg.effective_cities(), vec!["Tokyo".to_string()]);
    }

    #[test]
    fn invalid_pace_literal_is_an_error() {
        let v = json!({ "pace": "vite" });
        assert!(RunConfig::from_value(&v).is_err());
    }
}
