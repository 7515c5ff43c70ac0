// tabi-domain library entry point
pub mod error;
pub mod money;
pub mod run_config;
pub mod source_ref;
pub mod timefmt;

pub use error::DomainError;
pub use money::{round_cents, FxMeta, Money};
pub use run_config::{Pace, RunConfig, Services};
pub use source_ref::{GenerationInfo, SourceRef};
