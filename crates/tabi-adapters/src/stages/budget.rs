//! Etapa `budget_aggregation`: suma real de costes por categoría.
//!
//! A diferencia de las etapas narrativas, acá la aritmética es del sistema:
//! los subtotales salen de los artifacts upstream (segmentos de transporte,
//! estimaciones de alojamiento, fourchettes de comida, costes de actividad)
//! y la posición frente al budget se calcula, no se redacta.

use tabi_core::{StageContext, StageDefinition, StageRunResult};
use tabi_domain::money::round_cents;
use tabi_domain::{FxMeta, SourceRef};

use super::{decode_optional, decode_required, success, BUDGET_AGGREGATION, DAILY_ACTIVITIES, DINING, LIVE_NEWS,
            LODGING, PROFILE, TRANSPORT, WEATHER};
use crate::artifacts::{BudgetAggregationOutput, BudgetCategory, BudgetDelta, BudgetStatus, CategoryBreakdown,
                       CostItem, DailyActivitiesPlan, DiningPlan, LodgingOptionsByCity, Scenario,
                       TransportPlanByCity};
use crate::registry;

/// Taux de repli JPY→EUR cuando lodging (y su FxMeta) fue SKIPPED.
const FALLBACK_EUR_JPY: f64 = 165.0;

/// Suma de subtotales redondeada a céntimos.
pub fn aggregate_total(subtotals: &[f64]) -> f64 {
    round_cents(subtotals.iter().sum())
}

/// Posición del total frente al budget del usuario.
pub fn budget_delta(total_eur: f64, budget_input_eur: f64) -> BudgetDelta {
    let diff = round_cents(total_eur - budget_input_eur);
    let status = if diff.abs() < 0.005 {
        BudgetStatus::OnTarget
    } else if diff < 0.0 {
        BudgetStatus::Under
    } else {
        BudgetStatus::Over
    };
    BudgetDelta { budget_input_eur,
                  difference_from_budget_eur: diff,
                  status }
}

fn breakdown(category: BudgetCategory, items: Vec<CostItem>) -> Option<CategoryBreakdown> {
    if items.is_empty() {
        return None;
    }
    let subtotal_eur = round_cents(items.iter().map(|i| i.total_cost_eur).sum());
    Some(CategoryBreakdown { category, items, subtotal_eur })
}

fn item(label: String, category: BudgetCategory, qty: f64, unit: f64, sources: Vec<SourceRef>) -> CostItem {
    CostItem { label,
               category,
               qty,
               unit_cost_eur: round_cents(unit),
               total_cost_eur: round_cents(qty * unit),
               notes: None,
               sources }
}

pub struct BudgetAggregationStage;

impl StageDefinition for BudgetAggregationStage {
    fn id(&self) -> &str {
        BUDGET_AGGREGATION
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE, LIVE_NEWS, WEATHER, TRANSPORT, LODGING, DAILY_ACTIVITIES, DINING]
    }

    fn schema(&self) -> &str {
        registry::BUDGET_AGGREGATION
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let activities: DailyActivitiesPlan = match decode_required(ctx, BUDGET_AGGREGATION, DAILY_ACTIVITIES) {
            Ok(p) => p,
            Err(e) => return StageRunResult::failure(e),
        };
        let transport = match decode_optional::<TransportPlanByCity>(ctx, BUDGET_AGGREGATION, TRANSPORT) {
            Ok(t) => t,
            Err(e) => return StageRunResult::failure(e),
        };
        let lodging = match decode_optional::<LodgingOptionsByCity>(ctx, BUDGET_AGGREGATION, LODGING) {
            Ok(l) => l,
            Err(e) => return StageRunResult::failure(e),
        };
        let dining = match decode_optional::<DiningPlan>(ctx, BUDGET_AGGREGATION, DINING) {
            Ok(d) => d,
            Err(e) => return StageRunResult::failure(e),
        };

        let fx = lodging.as_ref().and_then(|l| l.fx.clone());
        let rate = fx.as_ref().map(|f| f.rate).unwrap_or(FALLBACK_EUR_JPY);

        let mut groups: Vec<CategoryBreakdown> = Vec::with_capacity(4);

        if let Some(t) = &transport {
            let items = t.cities
                         .iter()
                         .flat_map(|c| {
                             c.segments.iter().map(|s| {
                                          item(format!("{} -> {} ({})", s.from_point, s.to_point, c.city),
                                               BudgetCategory::Transport,
                                               1.0,
                                               s.cost_estimate_yen as f64 / rate,
                                               s.sources.clone())
                                      })
                         })
                         .collect();
            groups.extend(breakdown(BudgetCategory::Transport, items));
        }

        if let Some(l) = &lodging {
            // Se presupuesta la opción más barata de cada ciudad.
            let items = l.cities
                         .iter()
                         .filter_map(|c| {
                             c.accommodations
                              .iter()
                              .min_by(|a, b| a.total_estimate
                                              .eur
                                              .total_cmp(&b.total_estimate.eur))
                              .map(|a| {
                                  item(format!("{} ({})", a.name, c.city),
                                       BudgetCategory::Lodging,
                                       1.0,
                                       a.total_estimate.eur,
                                       vec![SourceRef::new(a.link.clone(), a.source_date.clone())])
                              })
                         })
                         .collect();
            groups.extend(breakdown(BudgetCategory::Lodging, items));
        }

        if let Some(d) = &dining {
            let items = d.meals
                         .iter()
                         .map(|m| {
                             let mid = (m.price_range.eur_min + m.price_range.eur_max) / 2.0;
                             item(format!("{} {}", m.day, m.restaurant),
                                  BudgetCategory::Dining,
                                  1.0,
                                  mid,
                                  vec![m.source.clone()])
                         })
                         .collect();
            groups.extend(breakdown(BudgetCategory::Dining, items));
        }

        let activity_items = activities.days
                                       .iter()
                                       .flat_map(|day| {
                                           day.activities.iter().map(|a| {
                                                             item(format!("{} ({})", a.name, day.date),
                                                                  BudgetCategory::Activities,
                                                                  1.0,
                                                                  a.cost_eur,
                                                                  a.sources.clone())
                                                         })
                                       })
                                       .collect();
        groups.extend(breakdown(BudgetCategory::Activities, activity_items));

        let subtotals: Vec<f64> = groups.iter().map(|g| g.subtotal_eur).collect();
        let total_eur = aggregate_total(&subtotals);
        let budget_input = ctx.config.budget.unwrap_or(0.0);
        let delta = budget_delta(total_eur, budget_input);

        let scenarios = lodging_scenario(&groups, total_eur);

        success(BudgetAggregationOutput { breakdown: groups,
                                          total_eur,
                                          difference_from_budget: delta,
                                          scenarios,
                                          fx: fx.or_else(|| Some(FxMeta::eur_jpy(FALLBACK_EUR_JPY, "2026-01-01"))),
                                          assumptions: vec!["prix TTC, une personne".to_string(),
                                                            "option d'hébergement la moins chère par ville".to_string()] })
    }
}

/// Escenario económico: -15% sur le poste hébergement, si existe.
fn lodging_scenario(groups: &[CategoryBreakdown], total_eur: f64) -> Vec<Scenario> {
    groups.iter()
          .find(|g| g.category == BudgetCategory::Lodging)
          .map(|g| {
              let delta = round_cents(-0.15 * g.subtotal_eur);
              Scenario { name: "Hébergement économique".to_string(),
                         description: "Guesthouses/hostels à la place des hôtels (-15% hébergement)".to_string(),
                         delta_eur: delta,
                         new_total_eur: round_cents(total_eur + delta),
                         pros: vec!["économie directe".to_string()],
                         cons: vec!["confort réduit".to_string()],
                         sources: vec![] }
          })
          .into_iter()
          .collect()
}
