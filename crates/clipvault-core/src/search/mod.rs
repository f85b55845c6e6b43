//! Incremental clip search.
//!
//! - `constraint`: the user's query and its reducer transitions
//! - `predicate`: backend predicates and the constraint compiler
//! - `session`: session ids and the issuer
//! - `aggregator`: the result store fed by streamed fragments
//! - `backend`: the trait the external backend is reached through

pub mod aggregator;
pub mod backend;
pub mod constraint;
pub mod model;
pub mod predicate;
pub mod session;

pub use aggregator::{InsertOutcome, SearchAggregator};
pub use backend::{ClipSearchBackend, ResultSender};
pub use constraint::{ConstraintAction, MatchMode, QueryConstraint};
pub use model::{RebuildToken, ResultFragment, SearchStatus};
pub use predicate::{Predicate, SearchPolicy, compile, compile_with};
pub use session::{SessionId, SessionIssuer};
