//! Registro canónico de esquemas del pipeline de itinerario.
//!
//! Única autoridad: cada esquema se registra acá una sola vez bajo su nombre
//! canónico; etapas y tests consultan el mismo registro.

use tabi_core::SchemaRegistry;

use crate::artifacts::{BudgetAggregationOutput, CityMeteoInfo, DailyActivitiesPlan, DiningPlan, ItinerarySynthesis,
                       LiveNewsOutput, LodgingOptionsByCity, QualityAuditOutput, TransportPlanByCity, TripProfile};

pub const TRIP_PROFILE: &str = "trip_profile";
pub const LIVE_NEWS: &str = "live_news";
pub const CITY_METEO: &str = "city_meteo";
pub const TRANSPORT_CITY_PLAN: &str = "transport_city_plan";
pub const LODGING_OPTIONS: &str = "lodging_options";
pub const DAILY_ACTIVITIES: &str = "daily_activities";
pub const DINING_PLAN: &str = "dining_plan";
pub const BUDGET_AGGREGATION: &str = "budget_aggregation";
pub const QUALITY_AUDIT: &str = "quality_audit";
pub const ITINERARY_SYNTHESIS: &str = "itinerary_synthesis";

/// Construye el registro con los diez esquemas del pipeline.
pub fn schema_registry() -> SchemaRegistry {
    let mut reg = SchemaRegistry::new();
    reg.register::<TripProfile>(TRIP_PROFILE);
    reg.register::<LiveNewsOutput>(LIVE_NEWS);
    reg.register::<CityMeteoInfo>(CITY_METEO);
    reg.register::<TransportPlanByCity>(TRANSPORT_CITY_PLAN);
    reg.register::<LodgingOptionsByCity>(LODGING_OPTIONS);
    reg.register::<DailyActivitiesPlan>(DAILY_ACTIVITIES);
    reg.register::<DiningPlan>(DINING_PLAN);
    reg.register::<BudgetAggregationOutput>(BUDGET_AGGREGATION);
    reg.register::<QualityAuditOutput>(QUALITY_AUDIT);
    reg.register::<ItinerarySynthesis>(ITINERARY_SYNTHESIS);
    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_the_ten_schemas() {
        let reg = schema_registry();
        assert_eq!(reg.len(), 10);
        for name in [TRIP_PROFILE, LIVE_NEWS, CITY_METEO, TRANSPORT_CITY_PLAN, LODGING_OPTIONS, DAILY_ACTIVITIES,
                     DINING_PLAN, BUDGET_AGGREGATION, QUALITY_AUDIT, ITINERARY_SYNTHESIS]
        {
            assert!(reg.contains(name), "falta el esquema {name}");
        }
    }
}
