//! Esquema `transport_city_plan`: planes de transporte intra-ciudad.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::{GenerationInfo, SourceRef};

use super::{check_hhmm, check_non_empty, check_sources};

/// Modos de transporte urbano soportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    Metro,
    #[serde(rename = "JR Urban")]
    JrUrban,
    Bus,
    Tram,
    Taxi,
    Walk,
    Ferry,
}

/// Segmento intra-ciudad, ordenado dentro del plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSegment {
    pub from_point: String,
    pub to_point: String,
    pub mode: TransportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_or_service: Option<String>,
    #[serde(default)]
    pub transfers: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    pub duration_minutes: u32,
    pub cost_estimate_yen: u64,
    pub reservation_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sources: Vec<SourceRef>,
}

/// Pass urbano recomendado con justificación de rentabilidad.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassRecommendation {
    pub pass_name: String,
    pub coverage: String,
    pub validity_days: u32,
    pub cost_yen: u64,
    pub conditions: String,
    pub break_even_explanation: String,
    pub purchase_options: String,
    pub sources: Vec<SourceRef>,
}

/// Plan de una ciudad: segmentos ordenados + passes + hipótesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportCityPlan {
    pub city: String,
    pub segments: Vec<TransportSegment>,
    #[serde(default)]
    pub passes: Vec<PassRecommendation>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// Artifact de la etapa: planes agrupados por ciudad (mismo patrón que
/// lodging).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportPlanByCity {
    pub cities: Vec<TransportCityPlan>,
    pub generation_info: GenerationInfo,
}

impl TransportCityPlan {
    fn validate_at(&self, prefix: &str) -> Result<(), FieldViolation> {
        check_non_empty(&format!("{prefix}.city"), &self.city)?;
        if self.segments.is_empty() {
            return Err(FieldViolation::new(format!("{prefix}.segments"), "se requiere al menos un segmento"));
        }
        for (i, s) in self.segments.iter().enumerate() {
            let at = |f: &str| format!("{prefix}.segments[{i}].{f}");
            check_non_empty(&at("from_point"), &s.from_point)?;
            check_non_empty(&at("to_point"), &s.to_point)?;
            if let Some(t) = &s.departure_time {
                check_hhmm(&at("departure_time"), t)?;
            }
            if let Some(t) = &s.arrival_time {
                check_hhmm(&at("arrival_time"), t)?;
            }
            check_sources(&at("sources"), &s.sources)?;
        }
        for (i, p) in self.passes.iter().enumerate() {
            let at = |f: &str| format!("{prefix}.passes[{i}].{f}");
            check_non_empty(&at("pass_name"), &p.pass_name)?;
            if p.validity_days == 0 {
                return Err(FieldViolation::new(at("validity_days"), "debe ser >= 1"));
            }
            check_sources(&at("sources"), &p.sources)?;
        }
        Ok(())
    }
}

impl ArtifactSpec for TransportPlanByCity {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.cities.is_empty() {
            return Err(FieldViolation::new("cities", "se requiere al menos una ciudad"));
        }
        for (i, c) in self.cities.iter().enumerate() {
            c.validate_at(&format!("cities[{i}]"))?;
        }
        self.generation_info
            .check()
            .map_err(|e| FieldViolation::new("generation_info", e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> TransportSegment {
        TransportSegment { from_point: "Kyoto Station".into(),
                           to_point: "Gion-Shijo".into(),
                           mode: TransportMode::Bus,
                           operator: Some("Kyoto City Bus".into()),
                           line_or_service: Some("206".into()),
                           transfers: 0,
                           frequency: Some("every 10 min".into()),
                           departure_time: Some("09:10".into()),
                           arrival_time: Some("09:35".into()),
                           duration_minutes: 25,
                           cost_estimate_yen: 230,
                           reservation_required: false,
                           notes: None,
                           sources: vec![SourceRef::new("https://www.city.kyoto.lg.jp", "2026-04-01")] }
    }

    fn sample() -> TransportPlanByCity {
        TransportPlanByCity { cities: vec![TransportCityPlan { city: "Kyoto".into(),
                                                               segments: vec![segment()],
                                                               passes: vec![],
                                                               assumptions: vec!["voyage léger".into()] }],
                              generation_info: GenerationInfo::today() }
    }

    #[test]
    fn valid_plan_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn segment_without_sources_is_rejected() {
        let mut p = sample();
        p.cities[0].segments[0].sources.clear();
        let v = p.validate().unwrap_err();
        assert_eq!(v.field, "cities[0].segments[0].sources");
    }

    #[test]
    fn bad_departure_time_is_rejected() {
        let mut p = sample();
        p.cities[0].segments[0].departure_time = Some("9h10".into());
        let v = p.validate().unwrap_err();
        assert_eq!(v.field, "cities[0].segments[0].departure_time");
    }

    #[test]
    fn jr_urban_serializes_with_space() {
        let s = serde_json::to_value(TransportMode::JrUrban).unwrap();
        assert_eq!(s, "JR Urban");
    }
}
