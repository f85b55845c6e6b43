pub mod backend;
pub mod config_service;
pub mod logging;
pub mod paths;

pub use crate::backend::{JsonLinesBackend, ProcessSearchBackend};
pub use crate::config_service::ConfigService;
pub use crate::paths::ClipvaultPaths;
