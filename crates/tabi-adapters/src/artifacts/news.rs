//! Esquema `live_news`: actualidades y eventos por ciudad.

use serde::{Deserialize, Serialize};
use tabi_core::{ArtifactSpec, FieldViolation};

use super::{check_iso_date, check_non_empty};

/// Un evento o actualidad con su fuente datada.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsEvent {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Fecha o período del evento (YYYY-MM-DD o texto descriptivo).
    pub date: String,
    pub source_url: String,
    /// Fecha de publicación de la fuente (YYYY-MM-DD, estricta).
    pub source_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityNewsEvents {
    pub city: String,
    pub events: Vec<NewsEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveNewsOutput {
    pub cities: Vec<CityNewsEvents>,
}

impl ArtifactSpec for LiveNewsOutput {
    fn validate(&self) -> Result<(), FieldViolation> {
        for (ci, c) in self.cities.iter().enumerate() {
            check_non_empty(&format!("cities[{ci}].city"), &c.city)?;
            for (ei, e) in c.events.iter().enumerate() {
                let at = |f: &str| format!("cities[{ci}].events[{ei}].{f}");
                check_non_empty(&at("title"), &e.title)?;
                check_non_empty(&at("description"), &e.description)?;
                if !(e.source_url.starts_with("http://") || e.source_url.starts_with("https://")) {
                    return Err(FieldViolation::new(at("source_url"),
                                                   format!("url inválida: {:?}", e.source_url)));
                }
                check_iso_date(&at("source_date"), &e.source_date)?;
            }
        }
        Ok(())
    }
}
