//! tabi-adapters: capa de adaptación Dominio <-> Core.
//!
//! Este crate provee:
//! - Los artifacts tipados de cada etapa del pipeline (forma serde +
//!   `validate()` de contrato, registrados en el Schema Registry).
//! - Los colaboradores externos (`Reasoner`, `SearchTool`, `ScrapeTool`) con
//!   implementaciones mock deterministas.
//! - Las implementaciones concretas de `StageDefinition` para las diez
//!   etapas del pipeline de itinerario.
//! - El armado del pipeline canónico (`build_itinerary_pipeline`) y del
//!   registry canónico (`schema_registry`).
//!
//! Nota: el core sólo conoce `Artifact { kind, hash, payload, metadata }`.
//! Toda la semántica de viaje vive acá y en tabi-domain.

pub mod artifacts;
pub mod collab;
pub mod pipeline;
pub mod registry;
pub mod stages;

pub use collab::{MockReasoner, MockScrape, MockSearch, Reasoner, ScrapeTool, SearchHit, SearchTool};
pub use pipeline::build_itinerary_pipeline;
pub use registry::schema_registry;
