//! Gates: predicados booleanos sobre la configuración del run.
//!
//! Un gate decide si una etapa opcional se ejecuta. Los predicados son
//! funciones puras de `RunConfig` (jamás buscan inputs en estado ambiente) y
//! las combinaciones OR se evalúan sobre los *resultados* de cada predicado,
//! no sobre las funciones en sí.

use tabi_domain::RunConfig;

/// Predicado de gating: puro, sin efectos, sin dependencia de outputs
/// de etapas previas.
pub type GatePredicate = fn(&RunConfig) -> bool;

/// Gate de una etapa: un predicado o una disyunción de predicados.
#[derive(Clone)]
pub enum Gate {
    Single { name: &'static str, pred: GatePredicate },
    /// Verdadero si *alguno* de los predicados evalúa verdadero con los
    /// datos del run actual.
    AnyOf { name: &'static str, preds: &'static [GatePredicate] },
}

impl Gate {
    pub fn single(name: &'static str, pred: GatePredicate) -> Self {
        Gate::Single { name, pred }
    }

    pub fn any_of(name: &'static str, preds: &'static [GatePredicate]) -> Self {
        Gate::AnyOf { name, preds }
    }

    /// Nombre estable del gate (aparece en el evento StageSkipped).
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Single { name, .. } | Gate::AnyOf { name, .. } => name,
        }
    }

    pub fn evaluate(&self, cfg: &RunConfig) -> bool {
        match self {
            Gate::Single { pred, .. } => pred(cfg),
            Gate::AnyOf { preds, .. } => preds.iter().any(|p| p(cfg)),
        }
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gate({})", self.name())
    }
}

pub fn has_restaurants(cfg: &RunConfig) -> bool {
    cfg.services.contains("restaurants")
}

pub fn has_lodging(cfg: &RunConfig) -> bool {
    cfg.services.contains("lodging")
}

pub fn has_accommodation(cfg: &RunConfig) -> bool {
    cfg.services.contains("accommodation")
}

pub fn has_transport(cfg: &RunConfig) -> bool {
    cfg.services.contains("transport")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg_with_services(services: &[&str]) -> RunConfig {
        RunConfig::from_value(&json!({ "services": services })).expect("cfg")
    }

    #[test]
    fn single_gate_follows_services() {
        let g = Gate::single("restaurants_requested", has_restaurants);
        assert!(g.evaluate(&cfg_with_services(&["restaurants"])));
        assert!(!g.evaluate(&cfg_with_services(&["transport"])));
    }

    #[test]
    fn any_of_combines_evaluated_results() {
        let g = Gate::any_of("lodging_or_accommodation", &[has_lodging, has_accommodation]);
        assert!(g.evaluate(&cfg_with_services(&["lodging"])));
        assert!(g.evaluate(&cfg_with_services(&["accommodation"])));
        assert!(g.evaluate(&cfg_with_services(&["accommodation", "restaurants"])));
    }

    // Regresión: la disyunción debe ser falsa cuando ningún service está
    // pedido (el original combinaba referencias de función, siempre truthy).
    #[test]
    fn any_of_is_false_when_no_service_requested() {
        let g = Gate::any_of("lodging_or_accommodation", &[has_lodging, has_accommodation]);
        assert!(!g.evaluate(&cfg_with_services(&[])));
        assert!(!g.evaluate(&cfg_with_services(&["restaurants"])));
    }
}
