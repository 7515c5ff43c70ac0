//! Armado del pipeline canónico de itinerario.
//!
//! El orden es topológico y fijo: cada etapa sólo declara upstreams que
//! aparecen antes en la lista. `build_pipeline_definition` valida esa
//! propiedad y fija el `definition_hash` del run.

use std::sync::Arc;

use tabi_core::{build_pipeline_definition, PipelineDefinition, PipelineError, StageDefinition};

use crate::collab::{Reasoner, ScrapeTool, SearchTool};
use crate::stages::{BudgetAggregationStage, DailyActivitiesStage, DiningStage, ItinerarySynthesisStage,
                    LiveNewsStage, LodgingStage, ProfileStage, QualityAuditStage, TransportStage, WeatherStage};

/// Pipeline completo de diez etapas, en orden canónico.
pub fn build_itinerary_pipeline(reasoner: Arc<dyn Reasoner>,
                                search: Arc<dyn SearchTool>,
                                scrape: Arc<dyn ScrapeTool>)
                                -> Result<PipelineDefinition, PipelineError> {
    let stages: Vec<Box<dyn StageDefinition>> =
        vec![Box::new(ProfileStage::new(reasoner.clone())) as Box<dyn StageDefinition>,
             Box::new(LiveNewsStage::new(search.clone())),
             Box::new(WeatherStage::new(search.clone())),
             Box::new(TransportStage::new(search.clone(), scrape)),
             Box::new(LodgingStage::new(search.clone())),
             Box::new(DailyActivitiesStage::new(search.clone())),
             Box::new(DiningStage::new(search.clone())),
             Box::new(BudgetAggregationStage),
             Box::new(QualityAuditStage),
             Box::new(ItinerarySynthesisStage::new(reasoner))];
    build_pipeline_definition(stages)
}
