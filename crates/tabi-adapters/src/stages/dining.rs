//! Etapa `dining` (gated): tres comidas por día planificado.

use std::sync::Arc;

use tabi_core::{gate, Gate, PipelineError, StageContext, StageDefinition, StageRunResult, ToolKind};

use super::{decode_required, success, DAILY_ACTIVITIES, DINING, LIVE_NEWS, LODGING, PROFILE, TRANSPORT, WEATHER};
use crate::artifacts::{DailyActivitiesPlan, DiningPlan, MealEntry, MealType, PriceRange};
use crate::collab::SearchTool;
use crate::registry;

const MEALS: &[(MealType, &str, &str, f64, f64)] = &[(MealType::PetitDejeuner, "Kissaten du quartier", "café / toast", 5.0, 9.0),
                                                     (MealType::Dejeuner, "Comptoir à ramen", "ramen", 8.0, 14.0),
                                                     (MealType::Diner, "Izakaya de saison", "izakaya", 18.0, 35.0)];

pub struct DiningStage {
    search: Arc<dyn SearchTool>,
    gate: Gate,
}

impl DiningStage {
    pub fn new(search: Arc<dyn SearchTool>) -> Self {
        Self { search,
               gate: Gate::single("has_restaurants", gate::has_restaurants) }
    }
}

impl StageDefinition for DiningStage {
    fn id(&self) -> &str {
        DINING
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE, LIVE_NEWS, WEATHER, TRANSPORT, LODGING, DAILY_ACTIVITIES]
    }

    fn gate(&self) -> Option<&Gate> {
        Some(&self.gate)
    }

    fn schema(&self) -> &str {
        registry::DINING_PLAN
    }

    fn tools(&self) -> &[ToolKind] {
        &[ToolKind::Search, ToolKind::WebsiteSearch]
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let plan: DailyActivitiesPlan = match decode_required(ctx, DINING, DAILY_ACTIVITIES) {
            Ok(p) => p,
            Err(error) => return StageRunResult::failure(error),
        };

        let mut meals = Vec::with_capacity(plan.days.len() * MEALS.len());
        for day in &plan.days {
            let hit = self.search
                          .search(&format!("restaurants recommandés {}", day.city), 1)
                          .into_iter()
                          .next();
            let source = match hit {
                Some(h) => h.as_source(),
                None => {
                    log::warn!("dining: búsqueda sin resultados para {}", day.city);
                    return StageRunResult::failure(PipelineError::Collaborator { stage: DINING.to_string(),
                                                                                 message: "búsqueda sin resultados".into() })
                }
            };
            for (meal_type, restaurant, cuisine, lo, hi) in MEALS {
                meals.push(MealEntry { day: day.date.clone(),
                                       meal_type: *meal_type,
                                       restaurant: format!("{restaurant} ({})", day.city),
                                       cuisine: (*cuisine).to_string(),
                                       price_range: PriceRange { eur_min: *lo, eur_max: *hi },
                                       dish_recommendation: "spécialité maison".to_string(),
                                       address: format!("{}, Japon", day.city),
                                       reservation_needed: matches!(meal_type, MealType::Diner),
                                       source: source.clone() });
            }
        }

        success(DiningPlan { meals })
    }
}
