//! Esquema `city_meteo`: previsiones diarias y recomendaciones.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};

use super::{check_iso_date, check_non_empty};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub temperatures_moyennes: String,
    pub precipitations_probables: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phenomenes_particuliers: Option<String>,
}

/// Fuente consultada el día de la generación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultedSource {
    pub url: String,
    pub date_consultation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub weather_summary: WeatherSummary,
    /// Conseils pratiques estrictamente meteorológicos para ese día.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityMeteoInfo {
    pub daily_forecast: Vec<DailyForecast>,
    pub sources: Vec<ConsultedSource>,
}

impl ArtifactSpec for CityMeteoInfo {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.daily_forecast.is_empty() {
            return Err(FieldViolation::new("daily_forecast", "se requiere al menos un día de previsión"));
        }
        for (i, d) in self.daily_forecast.iter().enumerate() {
            check_iso_date(&format!("daily_forecast[{i}].date"), &d.date)?;
            check_non_empty(&format!("daily_forecast[{i}].weather_summary.temperatures_moyennes"),
                            &d.weather_summary.temperatures_moyennes)?;
        }
        if self.sources.is_empty() {
            return Err(FieldViolation::new("sources", "se requiere al menos una fuente consultada"));
        }
        for (i, s) in self.sources.iter().enumerate() {
            if !(s.url.starts_with("http://") || s.url.starts_with("https://")) {
                return Err(FieldViolation::new(format!("sources[{i}].url"), format!("url inválida: {:?}", s.url)));
            }
            check_iso_date(&format!("sources[{i}].date_consultation"), &s.date_consultation)?;
        }
        Ok(())
    }
}
