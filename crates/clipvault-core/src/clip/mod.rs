//! Clipboard history records as delivered by the backend.

pub mod model;

pub use model::{ClipRecord, ClipType};
