//! Etapa `weather`: previsiones diarias para las fechas del viaje.

use std::sync::Arc;

use tabi_core::{StageContext, StageDefinition, StageRunResult, ToolKind};

use super::{success, trip_dates, LIVE_NEWS, PROFILE, WEATHER};
use crate::artifacts::{CityMeteoInfo, ConsultedSource, DailyForecast, WeatherSummary};
use crate::collab::SearchTool;
use crate::registry;

pub struct WeatherStage {
    search: Arc<dyn SearchTool>,
}

impl WeatherStage {
    pub fn new(search: Arc<dyn SearchTool>) -> Self {
        Self { search }
    }
}

/// Previsión plausible y determinista según el mes (sin proveedor real).
fn forecast_for(date: &str) -> WeatherSummary {
    let month: u32 = date.get(5..7).and_then(|m| m.parse().ok()).unwrap_or(4);
    let (temps, precip, phen) = match month {
        12 | 1 | 2 => ("2-10 °C", "20%", Some("vents froids possibles")),
        3 | 4 | 5 => ("12-20 °C", "30%", None),
        6 => ("20-27 °C", "60%", Some("saison des pluies")),
        7 | 8 => ("26-34 °C", "40%", Some("forte chaleur et humidité")),
        9 => ("22-28 °C", "50%", Some("risque de typhon")),
        _ => ("14-22 °C", "25%", None),
    };
    WeatherSummary { temperatures_moyennes: temps.to_string(),
                     precipitations_probables: precip.to_string(),
                     phenomenes_particuliers: phen.map(str::to_string) }
}

impl StageDefinition for WeatherStage {
    fn id(&self) -> &str {
        WEATHER
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE, LIVE_NEWS]
    }

    fn schema(&self) -> &str {
        registry::CITY_METEO
    }

    fn tools(&self) -> &[ToolKind] {
        &[ToolKind::Search]
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let daily_forecast = trip_dates(ctx.config).into_iter()
                                                   .map(|date| {
                                                       let summary = forecast_for(&date);
                                                       let reco = if summary.phenomenes_particuliers.is_some() {
                                                           "Prévoir un plan B en intérieur"
                                                       } else {
                                                           "Tenue confortable, parapluie pliable"
                                                       };
                                                       DailyForecast { date,
                                                                       weather_summary: summary,
                                                                       recommendations: vec![reco.to_string()] }
                                                   })
                                                   .collect();

        let sources = self.search
                          .search("prévisions météo Japon agence nationale", 1)
                          .into_iter()
                          .map(|h| ConsultedSource { url: h.url, date_consultation: h.date })
                          .collect();

        success(CityMeteoInfo { daily_forecast, sources })
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde_json::json;
    use tabi_core::ArtifactSpec;
    use tabi_domain::RunConfig;

    use super::*;
    use crate::collab::MockSearch;

    #[test]
    fn one_forecast_per_trip_day() {
        let cfg = RunConfig::from_value(&json!({"departureDate": "2026-06-10", "duration": 4})).unwrap();
        let ctx = StageContext { config: &cfg,
                                 upstream: IndexMap::new(),
                                 params: json!({}) };
        let stage = WeatherStage::new(Arc::new(MockSearch::new("2026-04-01")));
        match stage.run(&ctx) {
            StageRunResult::Success { artifact } => {
                let meteo = CityMeteoInfo::from_artifact(&artifact).unwrap();
                assert_eq!(meteo.daily_forecast.len(), 4);
                assert_eq!(meteo.daily_forecast[0].date, "2026-06-10");
                // Junio = saison des pluies.
                assert!(meteo.daily_forecast[0].weather_summary.phenomenes_particuliers.is_some());
            }
            other => panic!("esperaba Success, llegó {other:?}"),
        }
    }
}
