//! Adapters for the external search backend.
//!
//! - `wire`: JSON-lines message types
//! - `json_lines`: protocol client over any async byte stream
//! - `process`: spawns the backend executable and talks over its stdio

pub mod json_lines;
pub mod process;
pub mod wire;

pub use json_lines::JsonLinesBackend;
pub use process::ProcessSearchBackend;
