//! tabi-core: motor de pipeline por etapas con contratos de esquema.
//!
//! Un run ejecuta una cadena acíclica de etapas (`StageDefinition`); cada
//! etapa declara sus upstreams por nombre, un gate opcional sobre la
//! configuración del run y el esquema que su artifact debe satisfacer. El
//! scheduler es event-sourced: emite eventos append-only y reconstruye el
//! estado por replay.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod gate;
pub mod hashing;
pub mod model;
pub mod registry;
pub mod repo;
pub mod stage;

pub use engine::{PipelineEngine, StageOutcome};
pub use errors::PipelineError;
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use gate::{has_accommodation, has_lodging, has_restaurants, has_transport, Gate, GatePredicate};
pub use model::{Artifact, ArtifactDecodeError, ArtifactKind, ArtifactSpec, FieldViolation, StageContext};
pub use registry::SchemaRegistry;
pub use repo::{build_pipeline_definition, InMemoryRunRepository, PipelineDefinition, RunRepository};
pub use stage::{StageDefinition, StageRunResult, StageStatus, ToolKind};
