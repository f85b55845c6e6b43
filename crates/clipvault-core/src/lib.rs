//! Domain layer of the Clipvault search client.

pub mod clip;
pub mod config;
pub mod error;
pub mod search;

// Re-export common error type
pub use error::{ClipvaultError, Result};
