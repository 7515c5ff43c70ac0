//! Esquema `quality_audit`: auditoría de coherencia del itinerario.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::GenerationInfo;

use super::check_non_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Pass,
    Attention,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub status: AuditStatus,
    /// Score global 0-100.
    pub score_percent: u32,
    pub total_issues: u32,
    pub critical_count: u32,
    pub major_count: u32,
    pub minor_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inconsistency {
    pub id: String,
    pub severity: Severity,
    pub component: String,
    pub json_path: String,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingElement {
    pub component: String,
    pub json_path: String,
    pub description: String,
    pub suggestion: String,
}

/// Cobertura de fuentes y volúmenes por componente.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditMetrics {
    pub days_planned: u32,
    pub activities_count: u32,
    pub activities_with_sources: u32,
    pub transport_segments_count: u32,
    pub transport_with_sources: u32,
    pub accommodations_count: u32,
    pub accommodations_with_sources: u32,
    pub meals_count: u32,
    pub meals_with_sources: u32,
    pub budget_items_count: u32,
    pub budget_items_with_sources: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditCompliance {
    pub budget_respected: bool,
    pub pace_respected: bool,
    pub exclusions_respected: bool,
    pub sources_dated: bool,
    pub units_consistent: bool,
    pub timezone_consistent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAuditOutput {
    pub audit_summary: AuditSummary,
    #[serde(default)]
    pub inconsistencies: Vec<Inconsistency>,
    #[serde(default)]
    pub missing_elements: Vec<MissingElement>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub compliance: AuditCompliance,
    pub metrics: AuditMetrics,
    pub generation_info: GenerationInfo,
}

impl ArtifactSpec for QualityAuditOutput {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.audit_summary.score_percent > 100 {
            return Err(FieldViolation::new("audit_summary.score_percent",
                                           format!("fuera de rango [0, 100]: {}", self.audit_summary.score_percent)));
        }
        let counted = self.audit_summary.critical_count
                      + self.audit_summary.major_count
                      + self.audit_summary.minor_count;
        if counted != self.audit_summary.total_issues {
            return Err(FieldViolation::new("audit_summary.total_issues",
                                           format!("no coincide con la suma por gravedad: {} != {}",
                                                   self.audit_summary.total_issues, counted)));
        }
        for (i, inc) in self.inconsistencies.iter().enumerate() {
            check_non_empty(&format!("inconsistencies[{i}].id"), &inc.id)?;
            check_non_empty(&format!("inconsistencies[{i}].message"), &inc.message)?;
        }
        if self.metrics.activities_with_sources > self.metrics.activities_count {
            return Err(FieldViolation::new("metrics.activities_with_sources",
                                           "no puede superar activities_count"));
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

    fn sample() -> QualityAuditOutput {
        QualityAuditOutput { audit_summary: AuditSummary { status: AuditStatus::Pass,
                                                           score_percent: 96,
                                                           total_issues: 0,
                                                           critical_count: 0,
                                                           major_count: 0,
                                                           minor_count: 0 },
                             inconsistencies: vec![],
                             missing_elements: vec![],
                             recommendations: vec![],
                             compliance: AuditCompliance { budget_respected: true,
                                                           pace_respected: true,
                                                           exclusions_respected: true,
                                                           sources_dated: true,
                                                           units_consistent: true,
                                                           timezone_consistent: true },
                             metrics: AuditMetrics::default(),
                             generation_info: GenerationInfo::today() }
    }

    #[test]
    fn valid_audit_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn score_over_100_rejected() {
        let mut a = sample();
        a.audit_summary.score_percent = 120;
        assert_eq!(a.validate().unwrap_err().field, "audit_summary.score_percent");
    }

    #[test]
    fn issue_counts_must_sum() {
        let mut a = sample();
        a.audit_summary.total_issues = 2;
        assert_eq!(a.validate().unwrap_err().field, "audit_summary.total_issues");
    }
}
