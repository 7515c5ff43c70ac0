//! Artifacts tipados de cada etapa del pipeline.
//!
//! Cada esquema vive UNA sola vez acá como struct serde que implementa
//! `ArtifactSpec` (forma + `validate()`); el Schema Registry los registra
//! bajo su nombre canónico. Los tipos comparten las piezas transversales de
//! tabi-domain (`SourceRef`, `Money`, `FxMeta`, `GenerationInfo`) en lugar
//! de redefinirlas por esquema.
//!
//! Invariante transversal: toda hoja factual (actividad, segmento, opción de
//! alojamiento, comida, ítem de coste) lleva al menos una fuente datada. Se
//! valida dentro de cada `validate()`, no en una pasada aparte.

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

pub use activities::{Activity, AltActivity, Compliance, DailyActivitiesPlan, DayPlan, Exposure, PlanningContext, Timeslot};
pub use audit::{AuditCompliance, AuditMetrics, AuditStatus, AuditSummary, Inconsistency, MissingElement,
                QualityAuditOutput, Severity};
pub use budget::{BudgetAggregationOutput, BudgetCategory, BudgetDelta, BudgetStatus, CategoryBreakdown, CostItem,
                 Scenario};
pub use dining::{DiningPlan, MealEntry, MealType, PriceRange};
pub use lodging::{AccommodationOption, CityAccommodations, LodgingOptionsByCity, LodgingType};
pub use news::{CityNewsEvents, LiveNewsOutput, NewsEvent};
pub use profile::TripProfile;
pub use synthesis::{BudgetOverview, CitySection, ComplianceFlags, DaySection, ItineraryMeta, ItinerarySynthesis};
pub use transport::{PassRecommendation, TransportCityPlan, TransportMode, TransportPlanByCity, TransportSegment};
pub use weather::{CityMeteoInfo, ConsultedSource, DailyForecast, WeatherSummary};

use tabi_core::FieldViolation;
use tabi_domain::timefmt::{is_hhmm, is_iso_date, is_money};
use tabi_domain::SourceRef;

/// Al menos una fuente datada y todas válidas. `field` nombra la lista.
pub(crate) fn check_sources(field: &str, sources: &[SourceRef]) -> Result<(), FieldViolation> {
    if sources.is_empty() {
        return Err(FieldViolation::new(field, "se requiere al menos una fuente datada"));
    }
    for (i, s) in sources.iter().enumerate() {
        s.check()
         .map_err(|e| FieldViolation::new(format!("{field}[{i}]"), e.to_string()))?;
    }
    Ok(())
}

pub(crate) fn check_iso_date(field: &str, value: &str) -> Result<(), FieldViolation> {
    if !is_iso_date(value) {
        return Err(FieldViolation::new(field, format!("no es una fecha YYYY-MM-DD: {value:?}")));
    }
    Ok(())
}

pub(crate) fn check_hhmm(field: &str, value: &str) -> Result<(), FieldViolation> {
    if !is_hhmm(value) {
        return Err(FieldViolation::new(field, format!("no es una hora HH:MM: {value:?}")));
    }
    Ok(())
}

pub(crate) fn check_money(field: &str, value: f64) -> Result<(), FieldViolation> {
    if !is_money(value) {
        return Err(FieldViolation::new(field, format!("monto inválido (negativo o no finito): {value}")));
    }
    Ok(())
}

pub(crate) fn check_non_empty(field: &str, value: &str) -> Result<(), FieldViolation> {
    if value.trim().is_empty() {
        return Err(FieldViolation::new(field, "no puede estar vacío"));
    }
    Ok(())
}
