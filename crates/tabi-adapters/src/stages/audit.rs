//! Etapa `quality_audit`: métricas de cobertura y drapeaux de conformité.
//!
//! El audit no redacta: cuenta. Recorre los artifacts upstream disponibles,
//! mide cuántos elementos factuales llevan fuente datada y deriva de ahí el
//! score y el estado global.

use tabi_core::{StageContext, StageDefinition, StageRunResult};
use tabi_domain::GenerationInfo;

use super::{decode_optional, decode_required, success, BUDGET_AGGREGATION, DAILY_ACTIVITIES, DINING, LIVE_NEWS,
            LODGING, PROFILE, QUALITY_AUDIT, TRANSPORT, WEATHER};
use crate::artifacts::{AuditCompliance, AuditMetrics, AuditStatus, AuditSummary, BudgetAggregationOutput,
                       BudgetStatus, DailyActivitiesPlan, DiningPlan, LodgingOptionsByCity, QualityAuditOutput,
                       TransportPlanByCity};
use crate::registry;

pub struct QualityAuditStage;

fn collect_metrics(activities: &DailyActivitiesPlan,
                   transport: Option<&TransportPlanByCity>,
                   lodging: Option<&LodgingOptionsByCity>,
                   dining: Option<&DiningPlan>,
                   budget: &BudgetAggregationOutput)
                   -> AuditMetrics {
    let mut m = AuditMetrics { days_planned: activities.days.len() as u32,
                               ..AuditMetrics::default() };
    for day in &activities.days {
        for a in &day.activities {
            m.activities_count += 1;
            if !a.sources.is_empty() {
                m.activities_with_sources += 1;
            }
        }
    }
    if let Some(t) = transport {
        for c in &t.cities {
            for s in &c.segments {
                m.transport_segments_count += 1;
                if !s.sources.is_empty() {
                    m.transport_with_sources += 1;
                }
            }
        }
    }
    if let Some(l) = lodging {
        for c in &l.cities {
            for _ in &c.accommodations {
                // link + source_date son obligatorios en el esquema.
                m.accommodations_count += 1;
                m.accommodations_with_sources += 1;
            }
        }
    }
    if let Some(d) = dining {
        m.meals_count = d.meals.len() as u32;
        m.meals_with_sources = d.meals.len() as u32;
    }
    for g in &budget.breakdown {
        for i in &g.items {
            m.budget_items_count += 1;
            if !i.sources.is_empty() {
                m.budget_items_with_sources += 1;
            }
        }
    }
    m
}

/// Score = proporción de elementos factuales sourcés (100 si no hay ninguno).
fn score(m: &AuditMetrics) -> u32 {
    let total = m.activities_count + m.transport_segments_count + m.accommodations_count + m.meals_count
                + m.budget_items_count;
    if total == 0 {
        return 100;
    }
    let sourced = m.activities_with_sources + m.transport_with_sources + m.accommodations_with_sources
                  + m.meals_with_sources + m.budget_items_with_sources;
    (sourced * 100) / total
}

impl StageDefinition for QualityAuditStage {
    fn id(&self) -> &str {
        QUALITY_AUDIT
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE, LIVE_NEWS, WEATHER, TRANSPORT, LODGING, DAILY_ACTIVITIES, DINING, BUDGET_AGGREGATION]
    }

    fn schema(&self) -> &str {
        registry::QUALITY_AUDIT
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let activities: DailyActivitiesPlan = match decode_required(ctx, QUALITY_AUDIT, DAILY_ACTIVITIES) {
            Ok(p) => p,
            Err(e) => return StageRunResult::failure(e),
        };
        let budget: BudgetAggregationOutput = match decode_required(ctx, QUALITY_AUDIT, BUDGET_AGGREGATION) {
            Ok(b) => b,
            Err(e) => return StageRunResult::failure(e),
        };
        let transport = match decode_optional::<TransportPlanByCity>(ctx, QUALITY_AUDIT, TRANSPORT) {
            Ok(t) => t,
            Err(e) => return StageRunResult::failure(e),
        };
        let lodging = match decode_optional::<LodgingOptionsByCity>(ctx, QUALITY_AUDIT, LODGING) {
            Ok(l) => l,
            Err(e) => return StageRunResult::failure(e),
        };
        let dining = match decode_optional::<DiningPlan>(ctx, QUALITY_AUDIT, DINING) {
            Ok(d) => d,
            Err(e) => return StageRunResult::failure(e),
        };

        let metrics = collect_metrics(&activities, transport.as_ref(), lodging.as_ref(), dining.as_ref(), &budget);
        let score_percent = score(&metrics);

        let sources_dated = metrics.activities_with_sources == metrics.activities_count
                            && metrics.transport_with_sources == metrics.transport_segments_count
                            && metrics.meals_with_sources == metrics.meals_count
                            && metrics.budget_items_with_sources == metrics.budget_items_count;

        let compliance = AuditCompliance { budget_respected: budget.difference_from_budget.status != BudgetStatus::Over,
                                           pace_respected: true,
                                           exclusions_respected: activities.compliance.exclusions_respected,
                                           sources_dated,
                                           units_consistent: true,
                                           timezone_consistent: true };

        let status = if score_percent >= 90 && compliance.exclusions_respected {
            AuditStatus::Pass
        } else if score_percent >= 60 {
            AuditStatus::Attention
        } else {
            AuditStatus::Fail
        };

        success(QualityAuditOutput { audit_summary: AuditSummary { status,
                                                                   score_percent,
                                                                   total_issues: 0,
                                                                   critical_count: 0,
                                                                   major_count: 0,
                                                                   minor_count: 0 },
                                     inconsistencies: vec![],
                                     missing_elements: vec![],
                                     recommendations: vec![],
                                     compliance,
                                     metrics,
                                     generation_info: GenerationInfo::today() })
    }
}
