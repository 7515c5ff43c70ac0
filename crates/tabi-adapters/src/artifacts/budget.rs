//! Esquema `budget_aggregation`: agregación de costes por categoría.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};
use tabi_domain::{FxMeta, SourceRef};

use super::{check_money, check_non_empty, check_sources};

/// Categorías presupuestarias cerradas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    Transport,
    Lodging,
    Dining,
    Activities,
}

impl BudgetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetCategory::Transport => "transport",
            BudgetCategory::Lodging => "lodging",
            BudgetCategory::Dining => "dining",
            BudgetCategory::Activities => "activities",
        }
    }
}

/// Posición del total frente al budget del usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Under,
    Over,
    OnTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostItem {
    pub label: String,
    pub category: BudgetCategory,
    pub qty: f64,
    pub unit_cost_eur: f64,
    pub total_cost_eur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: BudgetCategory,
    pub items: Vec<CostItem>,
    pub subtotal_eur: f64,
}

/// Variante presupuestaria propuesta frente a la baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    /// Impacto total frente a la baseline (negativo = ahorro).
    pub delta_eur: f64,
    pub new_total_eur: f64,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDelta {
    pub budget_input_eur: f64,
    /// Total - budget (negativo = bajo el budget).
    pub difference_from_budget_eur: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAggregationOutput {
    pub breakdown: Vec<CategoryBreakdown>,
    pub total_eur: f64,
    pub difference_from_budget: BudgetDelta,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<FxMeta>,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl ArtifactSpec for BudgetAggregationOutput {
    fn validate(&self) -> Result<(), FieldViolation> {
        if self.breakdown.is_empty() {
            return Err(FieldViolation::new("breakdown", "se requiere al menos una categoría"));
        }
        for (bi, b) in self.breakdown.iter().enumerate() {
            if b.items.is_empty() {
                return Err(FieldViolation::new(format!("breakdown[{bi}].items"),
                                               "se requiere al menos un ítem por categoría"));
            }
            for (ii, item) in b.items.iter().enumerate() {
                let at = |f: &str| format!("breakdown[{bi}].items[{ii}].{f}");
                check_non_empty(&at("label"), &item.label)?;
                if !(item.qty.is_finite() && item.qty > 0.0) {
                    return Err(FieldViolation::new(at("qty"), format!("debe ser > 0: {}", item.qty)));
                }
                check_money(&at("unit_cost_eur"), item.unit_cost_eur)?;
                check_money(&at("total_cost_eur"), item.total_cost_eur)?;
                check_sources(&at("sources"), &item.sources)?;
            }
            check_money(&format!("breakdown[{bi}].subtotal_eur"), b.subtotal_eur)?;
        }
        check_money("total_eur", self.total_eur)?;
        check_money("difference_from_budget.budget_input_eur",
                    self.difference_from_budget.budget_input_eur)?;
        for (si, s) in self.scenarios.iter().enumerate() {
            check_non_empty(&format!("scenarios[{si}].name"), &s.name)?;
            check_money(&format!("scenarios[{si}].new_total_eur"), s.new_total_eur)?;
        }
        if let Some(fx) = &self.fx {
            fx.check().map_err(|e| FieldViolation::new("fx", e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: BudgetCategory, total: f64) -> CostItem {
        CostItem { label: "poste".into(),
                   category,
                   qty: 1.0,
                   unit_cost_eur: total,
                   total_cost_eur: total,
                   notes: None,
                   sources: vec![SourceRef::new("https://www.jrpass.com", "2026-04-01")] }
    }

    fn sample() -> BudgetAggregationOutput {
        BudgetAggregationOutput { breakdown: vec![CategoryBreakdown { category: BudgetCategory::Transport,
                                                                      items: vec![item(BudgetCategory::Transport, 500.0)],
                                                                      subtotal_eur: 500.0 }],
                                  total_eur: 500.0,
                                  difference_from_budget: BudgetDelta { budget_input_eur: 2000.0,
                                                                        difference_from_budget_eur: -1500.0,
                                                                        status: BudgetStatus::Under },
                                  scenarios: vec![],
                                  fx: None,
                                  assumptions: vec!["prix TTC".into()] }
    }

    #[test]
    fn valid_budget_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn empty_breakdown_rejected() {
        let mut b = sample();
        b.breakdown.clear();
        assert_eq!(b.validate().unwrap_err().field, "breakdown");
    }

    #[test]
    fn item_without_sources_rejected() {
        let mut b = sample();
        b.breakdown[0].items[0].sources.clear();
        assert_eq!(b.validate().unwrap_err().field, "breakdown[0].items[0].sources");
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(serde_json::to_value(BudgetStatus::OnTarget).unwrap(), "on_target");
    }
}
