//! Esquema `itinerary_synthesis`: el documento final de itinerario.
//!
//! Estructura día-por-día agrupada por ciudad, con aperçu presupuestario,
//! escenarios alternativos y bibliografía fusionada de todas las fuentes
//! datadas vistas a lo largo del run. Producido exactamente una vez por la
//! etapa terminal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::{GenerationInfo, Pace, SourceRef};

use super::activities::Activity;
use super::audit::AuditStatus;
use super::budget::{BudgetStatus, Scenario};
use super::check_iso_date;
use super::check_money;
use super::check_non_empty;
use super::dining::MealEntry;
use super::lodging::AccommodationOption;
use super::transport::TransportSegment;
use super::weather::WeatherSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub total_eur: f64,
    pub difference_from_budget_eur: f64,
    pub status: BudgetStatus,
    #[serde(default)]
    pub by_category: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceFlags {
    pub audit_status: AuditStatus,
    pub budget_respected: bool,
    pub pace_respected: bool,
    pub exclusions_respected: bool,
    pub sources_dated: bool,
    pub units_consistent: bool,
    pub timezone_consistent: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItineraryMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<Pace>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub cities_to_exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Una jornada dentro de una sección de ciudad. Las secciones gated
/// (transport, lodging, dining) quedan vacías/absentes cuando la etapa fue
/// SKIPPED, nunca provocan error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySection {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSummary>,
    #[serde(default)]
    pub transport: Vec<TransportSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lodging: Option<AccommodationOption>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub dining: Vec<MealEntry>,
    pub daily_costs_eur: f64,
    #[serde(default)]
    pub day_sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySection {
    pub city: String,
    pub overview: String,
    pub days: Vec<DaySection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItinerarySynthesis {
    pub version: u32,
    pub meta: ItineraryMeta,
    pub itinerary: Vec<CitySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_overview: Option<BudgetOverview>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(default)]
    pub bibliography: Vec<SourceRef>,
    pub compliance: ComplianceFlags,
    pub generation_info: GenerationInfo,
}

impl ArtifactSpec for ItinerarySynthesis {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.itinerary.is_empty() {
            return Err(FieldViolation::new("itinerary", "se requiere al menos una ciudad"));
        }
        for (ci, c) in self.itinerary.iter().enumerate() {
            check_non_empty(&format!("itinerary[{ci}].city"), &c.city)?;
            if c.days.is_empty() {
                return Err(FieldViolation::new(format!("itinerary[{ci}].days"),
                                               "se requiere al menos un día por ciudad"));
            }
            for (di, d) in c.days.iter().enumerate() {
                check_iso_date(&format!("itinerary[{ci}].days[{di}].date"), &d.date)?;
                check_money(&format!("itinerary[{ci}].days[{di}].daily_costs_eur"), d.daily_costs_eur)?;
            }
        }
        if let Some(b) = &self.budget_overview {
            check_money("budget_overview.total_eur", b.total_eur)?;
        }
        for (bi, s) in self.bibliography.iter().enumerate() {
            s.check()
             .map_err(|e| FieldViolation::new(format!("bibliography[{bi}]"), e.to_string()))?;
        }
        self.generation_info
            .check()
            .map_err(|e| FieldViolation::new("generation_info", e.to_string()))?;
        Ok(())
    }
}
