//! TabiFlow Rust Library
//!
//! Este crate es la cara de la aplicación: expone la superficie HTTP
//! (`api`), el driver de ejecución (`driver`), el registro de jobs (`jobs`)
//! y la configuración (`config`). La lógica de pipeline vive en los crates
//! del workspace (tabi-domain, tabi-core, tabi-adapters, tabi-persistence).

pub mod api;
pub mod config;
pub mod driver;
pub mod jobs;

pub use api::{router, AppState};
pub use driver::{run_once, DriverError};
pub use jobs::{JobStatus, RunRegistry};
