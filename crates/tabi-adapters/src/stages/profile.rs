//! Etapa `profile`: consolida el perfil del viajero.

use std::sync::Arc;

use tabi_core::{PipelineError, StageContext, StageDefinition, StageRunResult};

use super::{success, PROFILE};
use crate::artifacts::TripProfile;
use crate::collab::Reasoner;
use crate::registry;

pub struct ProfileStage {
    reasoner: Arc<dyn Reasoner>,
}

impl ProfileStage {
    pub fn new(reasoner: Arc<dyn Reasoner>) -> Self {
        Self { reasoner }
    }
}

impl StageDefinition for ProfileStage {
    fn id(&self) -> &str {
        PROFILE
    }

    fn upstreams(&self) -> &[&str] {
        &[]
    }

    fn schema(&self) -> &str {
        registry::TRIP_PROFILE
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let cfg = ctx.config;
        let cities = cfg.effective_cities();
        let nom = cfg.first_name.clone().unwrap_or_else(|| "Voyageur".to_string());
        let destination = if cities.is_empty() { "Japon".to_string() } else { cities.join(", ") };
        let duree = format!("{} jours", cfg.duration_days());
        let budget = match cfg.budget {
            Some(b) => format!("{b} EUR"),
            None => "non précisé".to_string(),
        };
        let type_voyage = cfg.planning_type.clone().unwrap_or_else(|| "découverte".to_string());

        let brief = format!("{nom} part {duree} au Japon ({destination}), budget {budget}, rythme {:?}.",
                            cfg.pace);
        let resume = match self.reasoner.compose(PROFILE, &brief) {
            Ok(text) => text,
            Err(message) => {
                return StageRunResult::failure(PipelineError::Collaborator { stage: PROFILE.to_string(), message })
            }
        };

        success(TripProfile { nom_voyageur: nom,
                              destination_principale: destination,
                              duree_voyage: duree,
                              budget_estime: budget,
                              type_voyage,
                              resume_complet: resume })
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde_json::json;
    use tabi_domain::RunConfig;

    use super::*;
    use crate::collab::MockReasoner;

    #[test]
    fn produces_valid_profile_from_config() {
        let cfg = RunConfig::from_value(&json!({
            "firstName": "Yuna", "citiesToInclude": ["Kyoto"], "budget": "2000", "duration": 2
        })).unwrap();
        let ctx = StageContext { config: &cfg,
                                 upstream: IndexMap::new(),
                                 params: json!({}) };
        let stage = ProfileStage::new(Arc::new(MockReasoner));
        match stage.run(&ctx) {
            StageRunResult::Success { artifact } => {
                assert_eq!(artifact.payload["nom_voyageur"], "Yuna");
                assert_eq!(artifact.payload["destination_principale"], "Kyoto");
                assert_eq!(artifact.payload["duree_voyage"], "2 jours");
            }
            other => panic!("esperaba Success, llegó {other:?}"),
        }
    }

    struct FailingReasoner;
    impl Reasoner for FailingReasoner {
        fn compose(&self, _stage: &str, _brief: &str) -> Result<String, String> {
            Err("proveedor caído".into())
        }
    }

    #[test]
    fn reasoner_error_becomes_collaborator_failure() {
        let cfg = RunConfig::default();
        let ctx = StageContext { config: &cfg,
                                 upstream: IndexMap::new(),
                                 params: json!({}) };
        let stage = ProfileStage::new(Arc::new(FailingReasoner));
        match stage.run(&ctx) {
            StageRunResult::Failure { error: PipelineError::Collaborator { stage, .. } } => {
                assert_eq!(stage, "profile");
            }
            other => panic!("esperaba Collaborator, llegó {other:?}"),
        }
    }
}
