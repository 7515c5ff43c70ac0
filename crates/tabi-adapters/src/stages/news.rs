//! Etapa `live_news`: actualidades y eventos por ciudad efectiva.

use std::sync::Arc;

use tabi_core::{StageContext, StageDefinition, StageRunResult, ToolKind};

use super::{success, LIVE_NEWS, PROFILE};
use crate::artifacts::{CityNewsEvents, LiveNewsOutput, NewsEvent};
use crate::collab::SearchTool;
use crate::registry;

pub struct LiveNewsStage {
    search: Arc<dyn SearchTool>,
}

impl LiveNewsStage {
    pub fn new(search: Arc<dyn SearchTool>) -> Self {
        Self { search }
    }
}

impl StageDefinition for LiveNewsStage {
    fn id(&self) -> &str {
        LIVE_NEWS
    }

    fn upstreams(&self) -> &[&str] {
        &[PROFILE]
    }

    fn schema(&self) -> &str {
        registry::LIVE_NEWS
    }

    fn tools(&self) -> &[ToolKind] {
        &[ToolKind::Search]
    }

    fn run(&self, ctx: &StageContext) -> StageRunResult {
        let cities = ctx.config.effective_cities();
        let mut out = Vec::with_capacity(cities.len());
        for city in cities {
            let hits = self.search.search(&format!("actualités événements {city} Japon"), 2);
            let events = hits.into_iter()
                             .map(|h| NewsEvent { title: h.title.clone(),
                                                  description: format!("Actualité locale à {city}: {}", h.title),
                                                  category: "événement".to_string(),
                                                  date: h.date.clone(),
                                                  source_url: h.url,
                                                  source_date: h.date })
                             .collect();
            out.push(CityNewsEvents { city, events });
        }
        success(LiveNewsOutput { cities: out })
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde_json::json;
    use tabi_core::ArtifactSpec;
    use tabi_domain::RunConfig;

    use super::*;
    use crate::artifacts::LiveNewsOutput;
    use crate::collab::MockSearch;

    #[test]
    fn one_group_per_effective_city() {
        let cfg = RunConfig::from_value(&json!({"citiesToInclude": ["Tokyo", "Kyoto"], "citiesToExclude": ["Tokyo"]}))
            .unwrap();
        let ctx = StageContext { config: &cfg,
                                 upstream: IndexMap::new(),
                                 params: json!({}) };
        let stage = LiveNewsStage::new(Arc::new(MockSearch::new("2026-04-01")));
        match stage.run(&ctx) {
            StageRunResult::Success { artifact } => {
                let news = LiveNewsOutput::from_artifact(&artifact).unwrap();
                assert_eq!(news.cities.len(), 1);
                assert_eq!(news.cities[0].city, "Kyoto");
                assert!(!news.cities[0].events.is_empty());
            }
            other => panic!("esperaba Success, llegó {other:?}"),
        }
    }
}
