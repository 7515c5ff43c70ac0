//! Esquema `daily_activities`: planificación día por día de actividades.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::{GenerationInfo, Pace, SourceRef};

use super::{check_hhmm, check_iso_date, check_money, check_non_empty, check_sources};

/// Créneaux de la journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeslot {
    Morning,
    Afternoon,
    Evening,
}

/// Exposición a las condiciones meteorológicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    Indoor,
    Outdoor,
    Mixed,
}

/// Preferencias y contraintes del usuario replicadas en el plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningContext {
    #[serde(default)]
    pub interests: Vec<String>,
    pub pace: Pace,
    #[serde(default)]
    pub cities_to_exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub timeslot: Timeslot,
    pub name: String,
    pub category: String,
    pub start_time: String,
    /// Duración en minutos, acotada a [15, 480].
    pub duration_minutes: u32,
    pub location_name: String,
    pub address: String,
    pub indoor_outdoor: Exposure,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_notes: Option<String>,
    pub cost_eur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_to_next_minutes: Option<u32>,
    pub sources: Vec<SourceRef>,
}

/// Alternativa por créneau (pluie, fermeture, surcharge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltActivity {
    pub timeslot: Timeslot,
    pub name: String,
    pub category: String,
    pub indoor_outdoor: Exposure,
    pub reason: String,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    /// Ciudad del día; nunca una ciudad excluida.
    pub city: String,
    pub date: String,
    #[serde(default)]
    pub meal_windows: Vec<String>,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub alt_options: Vec<AltActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compliance {
    pub exclusions_respected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivitiesPlan {
    pub planning_context: PlanningContext,
    pub days: Vec<DayPlan>,
    pub compliance: Compliance,
    pub generation_info: GenerationInfo,
}

impl ArtifactSpec for DailyActivitiesPlan {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.days.is_empty() {
            return Err(FieldViolation::new("days", "se requiere al menos un día planificado"));
        }
        let excluded: Vec<String> = self.planning_context
                                        .cities_to_exclude
                                        .iter()
                                        .map(|c| c.to_lowercase())
                                        .collect();
        for (di, d) in self.days.iter().enumerate() {
            check_non_empty(&format!("days[{di}].city"), &d.city)?;
            if excluded.contains(&d.city.to_lowercase()) {
                return Err(FieldViolation::new(format!("days[{di}].city"),
                                               format!("ciudad excluida presente en el plan: {:?}", d.city)));
            }
            check_iso_date(&format!("days[{di}].date"), &d.date)?;
            if d.activities.is_empty() {
                return Err(FieldViolation::new(format!("days[{di}].activities"),
                                               "se requiere al menos una actividad por día"));
            }
            for (ai, a) in d.activities.iter().enumerate() {
                let at = |f: &str| format!("days[{di}].activities[{ai}].{f}");
                check_non_empty(&at("name"), &a.name)?;
                check_hhmm(&at("start_time"), &a.start_time)?;
                if !(15..=480).contains(&a.duration_minutes) {
                    return Err(FieldViolation::new(at("duration_minutes"),
                                                   format!("fuera de rango [15, 480]: {}", a.duration_minutes)));
                }
                check_money(&at("cost_eur"), a.cost_eur)?;
                if let Some(t) = a.travel_to_next_minutes {
                    if t > 120 {
                        return Err(FieldViolation::new(at("travel_to_next_minutes"),
                                                       format!("fuera de rango [0, 120]: {t}")));
                    }
                }
                check_sources(&at("sources"), &a.sources)?;
            }
            for (ai, a) in d.alt_options.iter().enumerate() {
                let at = |f: &str| format!("days[{di}].alt_options[{ai}].{f}");
                check_non_empty(&at("name"), &a.name)?;
                check_non_empty(&at("reason"), &a.reason)?;
                check_sources(&at("sources"), &a.sources)?;
            }
        }
        self.generation_info
            .check()
            .map_err(|e| FieldViolation::new("generation_info", e.to_string()))?;
        Ok(())
    }
}
