//! Implementaciones de `StageDefinition` para las diez etapas del pipeline.
//!
//! Cada etapa arma su artifact a partir de la configuración del run, el
//! bundle de upstreams y sus colaboradores (mock). El narrativo se delega al
//! `Reasoner`; los datos factuales llevan fuentes datadas del `SearchTool`.

pub mod activities;
pub mod audit;
pub mod budget;
pub mod dining;
pub mod lodging;
pub mod news;
pub mod profile;
pub mod synthesis;
pub mod transport;
pub mod weather;

pub use activities::DailyActivitiesStage;
pub use audit::QualityAuditStage;
pub use budget::BudgetAggregationStage;
pub use dining::DiningStage;
pub use lodging::LodgingStage;
pub use news::LiveNewsStage;
pub use profile::ProfileStage;
pub use synthesis::ItinerarySynthesisStage;
pub use transport::TransportStage;
pub use weather::WeatherStage;

use chrono::{Duration, NaiveDate, Utc};
use tabi_core::{ArtifactSpec, PipelineError, StageContext, StageRunResult};
use tabi_domain::RunConfig;

/// Ids canónicos de etapa (los upstreams se declaran con estos nombres).
pub const PROFILE: &str = "profile";
pub const LIVE_NEWS: &str = "live_news";
pub const WEATHER: &str = "weather";
pub const TRANSPORT: &str = "transport";
pub const LODGING: &str = "lodging";
pub const DAILY_ACTIVITIES: &str = "daily_activities";
pub const DINING: &str = "dining";
pub const BUDGET_AGGREGATION: &str = "budget_aggregation";
pub const QUALITY_AUDIT: &str = "quality_audit";
pub const ITINERARY_SYNTHESIS: &str = "itinerary_synthesis";

/// Fechas ISO consecutivas del viaje: arranca en `departure_date` si es
/// válida, si no en la fecha de hoy.
pub(crate) fn trip_dates(config: &RunConfig) -> Vec<String> {
    let start = config.departure_date
                      .as_deref()
                      .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                      .unwrap_or_else(|| Utc::now().date_naive());
    (0..config.duration_days() as i64).map(|i| (start + Duration::days(i)).format("%Y-%m-%d").to_string())
                                      .collect()
}

/// Ciudad asignada a cada día del viaje: los días se reparten en bloques
/// consecutivos entre las ciudades efectivas.
pub(crate) fn city_for_day(cities: &[String], day_index: usize, total_days: usize) -> String {
    if cities.is_empty() {
        return "Tokyo".to_string();
    }
    let per_city = total_days.div_ceil(cities.len()).max(1);
    let idx = (day_index / per_city).min(cities.len() - 1);
    cities[idx].clone()
}

/// Decodifica una upstream obligatoria; su ausencia o corrupción es un error
/// interno (el DAG garantiza que las obligatorias siempre están DONE).
pub(crate) fn decode_required<T: ArtifactSpec>(ctx: &StageContext,
                                               stage: &str,
                                               upstream_id: &str)
                                               -> Result<T, PipelineError> {
    match ctx.decode_upstream::<T>(upstream_id) {
        Ok(Some(t)) => Ok(t),
        Ok(None) => Err(PipelineError::Internal(format!("etapa {stage}: upstream obligatoria ausente: {upstream_id}"))),
        Err(e) => Err(PipelineError::Internal(format!("etapa {stage}: upstream {upstream_id} indecodificable: {e}"))),
    }
}

/// Decodifica una upstream opcional (gated): `None` si fue SKIPPED.
pub(crate) fn decode_optional<T: ArtifactSpec>(ctx: &StageContext,
                                               stage: &str,
                                               upstream_id: &str)
                                               -> Result<Option<T>, PipelineError> {
    ctx.decode_upstream::<T>(upstream_id)
       .map_err(|e| PipelineError::Internal(format!("etapa {stage}: upstream {upstream_id} indecodificable: {e}")))
}

/// Envuelve un artifact tipado en un resultado exitoso.
pub(crate) fn success<T: ArtifactSpec>(artifact: T) -> StageRunResult {
    StageRunResult::success(artifact.into_artifact())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trip_dates_follow_departure_date() {
        let cfg = RunConfig::from_value(&json!({"departureDate": "2026-04-02", "duration": 3})).unwrap();
        assert_eq!(trip_dates(&cfg), vec!["2026-04-02", "2026-04-03", "2026-04-04"]);
    }

    #[test]
    fn city_for_day_splits_in_blocks() {
        let cities = vec!["Tokyo".to_string(), "Kyoto".to_string()];
        assert_eq!(city_for_day(&cities, 0, 4), "Tokyo");
        assert_eq!(city_for_day(&cities, 1, 4), "Tokyo");
        assert_eq!(city_for_day(&cities, 2, 4), "Kyoto");
        assert_eq!(city_for_day(&cities, 3, 4), "Kyoto");
    }

    #[test]
    fn city_for_day_never_overflows() {
        let cities = vec!["Tokyo".to_string()];
        assert_eq!(city_for_day(&cities, 9, 10), "Tokyo");
    }
}
