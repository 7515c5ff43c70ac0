pub mod types;
pub use types::{build_pipeline_definition, InMemoryRunRepository};
pub use types::{PipelineDefinition, RunInstance, RunRepository, StageSlot};
