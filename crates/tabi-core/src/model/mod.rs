//! Modelos neutrales (Artifact, StageContext, tipado fuerte opcional).

pub mod artifact;
pub mod context;
pub mod typed_artifact;

pub use artifact::{Artifact, ArtifactKind};
pub use context::StageContext;
pub use typed_artifact::{ArtifactDecodeError, ArtifactSpec, FieldViolation};
