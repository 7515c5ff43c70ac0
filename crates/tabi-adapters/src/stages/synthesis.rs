//! Etapa terminal `itinerary_synthesis`: fusiona todos los upstreams en el
//! documento final día-por-día agrupado por ciudad.
//!
//! Las secciones gated ausentes (transport, lodging, dining) producen listas
//! vacías u opciones `None`, jamás un error. La bibliografía se arma
//! recorriendo recursivamente los payloads upstream y deduplicando cada par
//! url/fecha encontrado.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use tabi_core::{PipelineError, StageContext, StageDefinition, StageRunResult};
use tabi_domain::{round_cents, GenerationInfo, SourceRef};

use super::{decode_optional, decode_required, success, BUDGET_AGGREGATION, DAILY_ACTIVITIES, DINING,
            ITINERARY_SYNTHESIS, LIVE_NEWS, LODGING, PROFILE, QUALITY_AUDIT, TRANSPORT, WEATHER};
use crate::artifacts::{BudgetAggregationOutput, BudgetOverview, CityMeteoInfo, CitySection, ComplianceFlags,
                       DailyActivitiesPlan, DaySection, DiningPlan, ItineraryMeta, ItinerarySynthesis,
                       LodgingOptionsByCity, QualityAuditOutput, TransportPlanByCity};
use crate::collab::Reasoner;
use crate::registry;

pub struct ItinerarySynthesisStage {
    reasoner: Arc<dyn Reasoner>,
}

impl ItinerarySynthesisStage {
    pub fn new(reasoner: Arc<dyn Reasoner>) -> Self {
        Self { reasoner }
    }
}

/// Pares campo-url / campo-fecha que cuentan como fuente datada en cualquier
/// payload upstream.
const SOURCE_FIELD_PAIRS: &[(&str, &str)] = &[("url", "date"),
                                              ("source_url", "source_date"),
                                              ("link", "source_date"),
                                              ("url", "date_consultation")];

/// Recorre un payload JSON y acumula todo par url/fecha encontrado.
pub(crate) fn collect_source_pairs(value: &Value, acc: &mut BTreeSet<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (url_key, date_key) in SOURCE_FIELD_PAIRS {
                if let (Some(Value::String(url)), Some(Value::String(date))) = (map.get(*url_key), map.get(*date_key))
                {
                    acc.insert((url.clone(), date.clone()));
                }
            }
            for v in map.values() {
                collect_source_pairs(v, acc);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_source_pairs(v, acc);
            }
        }
        _ => {}
    }
}

/// Agrupa los días planificados por ciudad, preservando el orden de primera
/// aparición.
pub(crate) fn cities_in_order(plan: &DailyActivitiesPlan) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for day in &plan.days {
        if !out.iter().any(|c| c == &day.city) {
            out.push(day.city.clone());
        }
    }
    out
}

fn build_city_section(city: &str,
                      plan: &DailyActivitiesPlan,
                      meteo: &CityMeteoInfo,
                      transport: Option<&TransportPlanByCity>,
                      lodging: Option<&LodgingOptionsByCity>,
                      dining: Option<&DiningPlan>,
                      overview: String)
                      -> CitySection {
    let mut days = Vec::new();
    let mut first_day_of_city = true;
    for day in plan.days.iter().filter(|d| d.city == city) {
        let weather = meteo.daily_forecast
                           .iter()
                           .find(|f| f.date == day.date)
                           .map(|f| f.weather_summary.clone());

        // Los segmentos y el alojamiento de la ciudad se presentan en su
        // primer día; los días siguientes heredan el mismo plan.
        let transport_segments = if first_day_of_city {
            transport.and_then(|t| t.cities.iter().find(|c| c.city == city))
                     .map(|c| c.segments.clone())
                     .unwrap_or_default()
        } else {
            Vec::new()
        };
        let lodging_pick = if first_day_of_city {
            lodging.and_then(|l| l.cities.iter().find(|c| c.city == city))
                   .and_then(|c| c.accommodations.first().cloned())
        } else {
            None
        };
        let meals: Vec<_> = dining.map(|d| d.meals.iter().filter(|m| m.day == day.date).cloned().collect())
                                  .unwrap_or_default();

        let mut costs: f64 = day.activities.iter().map(|a| a.cost_eur).sum();
        costs += meals.iter()
                      .map(|m| (m.price_range.eur_min + m.price_range.eur_max) / 2.0)
                      .sum::<f64>();

        let mut day_sources: Vec<SourceRef> = day.activities.iter().flat_map(|a| a.sources.clone()).collect();
        day_sources.extend(meals.iter().map(|m| m.source.clone()));

        days.push(DaySection { date: day.date.clone(),
                               weather,
                               transport: transport_segments,
                               lodging: lodging_pick,
                               activities: day.activities.clone(),
                               dining: meals,
                               daily_costs_eur: round_cents(costs),
                               day_sources });
        first_day_of_city = false;
    }
    CitySection { city: city.to_string(),
                  overview,
                  days }
}

impl StageDefinition for ItinerarySynthesisStage {
    fn id(&self) -> &str {
        ITINERARY_SYNTHESIS
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE, LIVE_NEWS, WEATHER, TRANSPORT, LODGING, DAILY_ACTIVITIES, DINING, BUDGET_AGGREGATION,
          QUALITY_AUDIT]
    }

    fn schema(&self) -> &str {
        registry::ITINERARY_SYNTHESIS
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let plan: DailyActivitiesPlan = match decode_required(ctx, ITINERARY_SYNTHESIS, DAILY_ACTIVITIES) {
            Ok(p) => p,
            Err(e) => return StageRunResult::failure(e),
        };
        let meteo: CityMeteoInfo = match decode_required(ctx, ITINERARY_SYNTHESIS, WEATHER) {
            Ok(m) => m,
            Err(e) => return StageRunResult::failure(e),
        };
        let budget: BudgetAggregationOutput = match decode_required(ctx, ITINERARY_SYNTHESIS, BUDGET_AGGREGATION) {
            Ok(b) => b,
            Err(e) => return StageRunResult::failure(e),
        };
        let audit: QualityAuditOutput = match decode_required(ctx, ITINERARY_SYNTHESIS, QUALITY_AUDIT) {
            Ok(a) => a,
            Err(e) => return StageRunResult::failure(e),
        };
        let transport = match decode_optional::<TransportPlanByCity>(ctx, ITINERARY_SYNTHESIS, TRANSPORT) {
            Ok(t) => t,
            Err(e) => return StageRunResult::failure(e),
        };
        let lodging = match decode_optional::<LodgingOptionsByCity>(ctx, ITINERARY_SYNTHESIS, LODGING) {
            Ok(l) => l,
            Err(e) => return StageRunResult::failure(e),
        };
        let dining = match decode_optional::<DiningPlan>(ctx, ITINERARY_SYNTHESIS, DINING) {
            Ok(d) => d,
            Err(e) => return StageRunResult::failure(e),
        };

        let mut itinerary = Vec::new();
        for city in cities_in_order(&plan) {
            let day_count = plan.days.iter().filter(|d| d.city == city).count();
            let brief = format!("{day_count} jour(s) à {city}, rythme {:?}.", plan.planning_context.pace);
            let overview = match self.reasoner.compose(ITINERARY_SYNTHESIS, &brief) {
                Ok(text) => text,
                Err(message) => {
                    return StageRunResult::failure(PipelineError::Collaborator { stage:
                                                                                    ITINERARY_SYNTHESIS.to_string(),
                                                                                message })
                }
            };
            itinerary.push(build_city_section(&city,
                                              &plan,
                                              &meteo,
                                              transport.as_ref(),
                                              lodging.as_ref(),
                                              dining.as_ref(),
                                              overview));
        }

        let mut pairs = BTreeSet::new();
        for artifact in ctx.upstream.values() {
            collect_source_pairs(&artifact.payload, &mut pairs);
        }
        let bibliography = pairs.into_iter()
                                .map(|(url, date)| SourceRef::new(url, date))
                                .collect();

        let by_category = budget.breakdown
                                .iter()
                                .map(|g| (g.category.as_str().to_string(), g.subtotal_eur))
                                .collect();
        let delta = &budget.difference_from_budget;
        let budget_overview = Some(BudgetOverview { total_eur: budget.total_eur,
                                                    difference_from_budget_eur: delta.difference_from_budget_eur,
                                                    status: delta.status,
                                                    by_category });

        let cfg = ctx.config;
        let meta = ItineraryMeta { first_name: cfg.first_name.clone(),
                                   departure_date: cfg.departure_date.clone(),
                                   duration_days: Some(cfg.duration_days()),
                                   cities: cfg.effective_cities(),
                                   interests: cfg.interests.clone(),
                                   pace: Some(cfg.pace),
                                   services: cfg.services.0.clone(),
                                   cities_to_exclude: cfg.cities_to_exclude.clone(),
                                   comments: cfg.comments.clone() };

        success(ItinerarySynthesis { version: 1,
                                     meta,
                                     itinerary,
                                     budget_overview,
                                     scenarios: budget.scenarios.clone(),
                                     bibliography,
                                     compliance: ComplianceFlags { audit_status: audit.audit_summary.status,
                                                                   budget_respected:
                                                                       audit.compliance.budget_respected,
                                                                   pace_respected: audit.compliance.pace_respected,
                                                                   exclusions_respected:
                                                                       audit.compliance.exclusions_respected,
                                                                   sources_dated: audit.compliance.sources_dated,
                                                                   units_consistent:
                                                                       audit.compliance.units_consistent,
                                                                   timezone_consistent:
                                                                       audit.compliance.timezone_consistent },
                                     generation_info: GenerationInfo::today() })
    }
}
