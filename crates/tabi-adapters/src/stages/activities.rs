//! Etapa `daily_activities`: planificación día por día.
//!
//! La densidad diaria sigue el ritmo pedido (`Pace::activities_per_day`).
//! Las ciudades excluidas jamás aparecen en los días: el plan se construye
//! sólo sobre las ciudades efectivas y `compliance` lo refleja.

use std::sync::Arc;

use tabi_core::{StageContext, StageDefinition, StageRunResult, ToolKind};
use tabi_domain::GenerationInfo;

use super::{city_for_day, success, trip_dates, DAILY_ACTIVITIES, LIVE_NEWS, LODGING, PROFILE, TRANSPORT, WEATHER};
use crate::artifacts::{Activity, Compliance, DailyActivitiesPlan, DayPlan, Exposure, PlanningContext, Timeslot};
use crate::collab::SearchTool;
use crate::registry;

/// Catálogo determinista de plantillas de actividad.
const TEMPLATES: &[(&str, &str, Exposure, u32, f64)] = &[("Temple emblématique", "temple", Exposure::Outdoor, 90, 0.0),
                                                         ("Musée local", "musée", Exposure::Indoor, 120, 12.0),
                                                         ("Jardin traditionnel", "jardin", Exposure::Outdoor, 75, 6.0),
                                                         ("Atelier artisanal", "atelier", Exposure::Indoor, 120, 45.0)];

const SLOTS: &[(Timeslot, &str)] = &[(Timeslot::Morning, "09:00"), (Timeslot::Afternoon, "14:00"),
                                     (Timeslot::Evening, "18:30"), (Timeslot::Afternoon, "16:30")];

pub struct DailyActivitiesStage {
    search: Arc<dyn SearchTool>,
}

impl DailyActivitiesStage {
    pub fn new(search: Arc<dyn SearchTool>) -> Self {
        Self { search }
    }
}

impl StageDefinition for DailyActivitiesStage {
    fn id(&self) -> &str {
        DAILY_ACTIVITIES
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE, LIVE_NEWS, WEATHER, TRANSPORT, LODGING]
    }

    fn schema(&self) -> &str {
        registry::DAILY_ACTIVITIES
    }

    fn tools(&self) -> &[ToolKind] {
        &[ToolKind::Search]
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let cfg = ctx.config;
        let cities = cfg.effective_cities();
        let dates = trip_dates(cfg);
        let per_day = cfg.pace.activities_per_day();

        let days = dates.iter()
                        .enumerate()
                        .map(|(di, date)| {
                            let city = city_for_day(&cities, di, dates.len());
                            let sources: Vec<_> = self.search
                                                      .search(&format!("activités incontournables {city}"), 1)
                                                      .into_iter()
                                                      .map(|h| h.as_source())
                                                      .collect();
                            let activities = (0..per_day).map(|ai| {
                                                             let (name, category, expo, dur, cost) =
                                                                 TEMPLATES[(di + ai) % TEMPLATES.len()];
                                                             let (timeslot, start) = SLOTS[ai % SLOTS.len()];
                                                             Activity { timeslot,
                                                                        name: format!("{name} de {city}"),
                                                                        category: category.to_string(),
                                                                        start_time: start.to_string(),
                                                                        duration_minutes: dur,
                                                                        location_name: format!("{name} ({city})"),
                                                                        address: format!("{city}, Japon"),
                                                                        indoor_outdoor: expo,
                                                                        weather_notes: None,
                                                                        cost_eur: cost,
                                                                        travel_to_next_minutes: Some(20),
                                                                        sources: sources.clone() }
                                                         })
                                                         .collect();
                            DayPlan { city,
                                      date: date.clone(),
                                      meal_windows: vec!["12:00-14:00".to_string(), "19:00-21:00".to_string()],
                                      activities,
                                      alt_options: vec![] }
                        })
                        .collect();

        success(DailyActivitiesPlan { planning_context: PlanningContext { interests: cfg.interests.clone(),
                                                                          pace: cfg.pace,
                                                                          cities_to_exclude: cfg.cities_to_exclude.clone(),
                                                                          comments: cfg.comments.clone(),
                                                                          services: cfg.services.0.clone() },
                                      days,
                                      compliance: Compliance { exclusions_respected: true,
                                                               notes: None },
                                      generation_info: GenerationInfo::today() })
    }
}
