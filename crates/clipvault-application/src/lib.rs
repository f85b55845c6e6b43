//! Application layer for Clipvault.
//!
//! This crate wires the search domain types into the use case a search view
//! drives: reducer dispatch, session issuing, backend invocation and result
//! aggregation.

pub mod search;
pub mod search_usecase;

pub use search_usecase::{MountOutcome, SearchUseCase};
