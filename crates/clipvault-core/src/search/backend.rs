//! Boundary to the external search backend.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::search::model::ResultFragment;
use crate::search::predicate::Predicate;
use crate::search::session::SessionId;

/// Push channel a backend delivers result fragments on.
///
/// The backend may send fragments for a session long after a newer session
/// started; dropping the sender ends that session's stream.
pub type ResultSender = mpsc::UnboundedSender<ResultFragment>;

/// The process that stores clips and executes searches.
#[async_trait]
pub trait ClipSearchBackend: Send + Sync {
    /// Starts a search for `session_id`.
    ///
    /// Returns once the backend accepted the request; results arrive later on
    /// `results`. The predicate list is a conjunction.
    async fn search(
        &self,
        session_id: SessionId,
        predicates: Vec<Predicate>,
        results: ResultSender,
    ) -> Result<()>;

    /// Lists every label known to the backend.
    async fn list_labels(&self) -> Result<Vec<String>>;
}
