//! Search use case implementation.
//!
//! `SearchUseCase` is the entry point a search view talks to. It turns
//! reducer actions into search sessions, invokes the backend, and exposes the
//! aggregated results together with a change-notification token.

use std::sync::Arc;

use clipvault_core::clip::ClipRecord;
use clipvault_core::error::Result;
use clipvault_core::search::{
    ClipSearchBackend, ConstraintAction, Predicate, QueryConstraint, RebuildToken,
    SearchAggregator, SearchPolicy, SearchStatus, SessionId, SessionIssuer, compile_with,
};
use tokio::sync::{Mutex, watch};

use crate::search::{ResultChannelListener, SearchStatusTracker};

/// State a freshly mounted view starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOutcome {
    /// Labels for the filter chips; empty when enumeration failed.
    pub labels: Vec<String>,
    /// Session issued for the initial search.
    pub session: SessionId,
}

/// Use case backing one search view.
///
/// # Responsibilities
///
/// - Holding the view's [`QueryConstraint`] and applying reducer actions
/// - Issuing exactly one session per distinct constraint
/// - Compiling predicates and invoking the backend with a fresh result channel
/// - Degrading to an empty result when the backend cannot be reached
///
/// The aggregator and status tracker are per instance, so two views never
/// share results.
pub struct SearchUseCase {
    backend: Arc<dyn ClipSearchBackend>,
    policy: SearchPolicy,
    /// Extra predicates appended to every compiled query
    additional: Vec<Predicate>,
    issuer: SessionIssuer,
    aggregator: Arc<SearchAggregator>,
    status: Arc<SearchStatusTracker>,
    constraint: Mutex<QueryConstraint>,
}

impl SearchUseCase {
    /// Creates a new `SearchUseCase` with an empty query.
    ///
    /// # Arguments
    ///
    /// * `backend` - The external backend searches are delegated to
    /// * `policy` - Fixed constraints (result cap) added to every search
    pub fn new(backend: Arc<dyn ClipSearchBackend>, policy: SearchPolicy) -> Self {
        Self::with_constraint(backend, policy, QueryConstraint::default())
    }

    /// Creates a `SearchUseCase` starting from `constraint`.
    pub fn with_constraint(
        backend: Arc<dyn ClipSearchBackend>,
        policy: SearchPolicy,
        constraint: QueryConstraint,
    ) -> Self {
        Self {
            backend,
            policy,
            additional: Vec::new(),
            issuer: SessionIssuer::new(),
            aggregator: Arc::new(SearchAggregator::new()),
            status: Arc::new(SearchStatusTracker::new()),
            constraint: Mutex::new(constraint),
        }
    }

    /// Adds predicates (e.g. a time window) sent with every search.
    pub fn with_additional_predicates(mut self, predicates: Vec<Predicate>) -> Self {
        self.additional = predicates;
        self
    }

    /// Loads the label list and runs the initial search.
    pub async fn mount(&self) -> MountOutcome {
        let labels = self.list_labels().await;

        let constraint = self.constraint.lock().await;
        let session = self.issuer.mint();
        let predicates = self.compile(&constraint);
        drop(constraint);

        self.start_search(session, predicates).await;
        MountOutcome { labels, session }
    }

    /// Applies `action` to the query.
    ///
    /// Returns the session started for the new query, or `None` when the
    /// action left the query unchanged.
    pub async fn dispatch(&self, action: ConstraintAction) -> Option<SessionId> {
        let mut constraint = self.constraint.lock().await;
        let next = constraint.reduce(action);
        if next == *constraint {
            return None;
        }

        // Minted under the lock so session order follows constraint order.
        let session = self.issuer.mint();
        let predicates = self.compile(&next);
        *constraint = next;
        drop(constraint);

        self.start_search(session, predicates).await;
        Some(session)
    }

    /// Labels known to the backend, or an empty list if they cannot be read.
    pub async fn list_labels(&self) -> Vec<String> {
        match self.backend.list_labels().await {
            Ok(labels) => labels,
            Err(e) => {
                tracing::warn!(error = %e, "label enumeration failed; showing no labels");
                Vec::new()
            }
        }
    }

    pub async fn constraint(&self) -> QueryConstraint {
        self.constraint.lock().await.clone()
    }

    pub async fn current_items(&self) -> Vec<ClipRecord> {
        self.aggregator.current_items().await
    }

    pub async fn current_session(&self) -> Option<SessionId> {
        self.aggregator.current_session().await
    }

    pub fn rebuild_token(&self) -> RebuildToken {
        self.aggregator.rebuild_token()
    }

    pub fn subscribe_rebuild(&self) -> watch::Receiver<RebuildToken> {
        self.aggregator.subscribe()
    }

    pub fn status(&self) -> SearchStatus {
        self.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }

    /// The most recently issued session, whether or not results arrived.
    pub fn latest_session(&self) -> Option<SessionId> {
        self.issuer.latest()
    }

    fn compile(&self, constraint: &QueryConstraint) -> Vec<Predicate> {
        compile_with(constraint, &self.policy, &self.additional)
    }

    async fn start_search(&self, session: SessionId, predicates: Vec<Predicate>) {
        self.status.begin(session);
        tracing::info!(session_id = %session, predicates = predicates.len(), "starting search");

        if let Err(e) = self.invoke_backend(session, predicates).await {
            tracing::warn!(session_id = %session, error = %e, "search invocation failed; showing no results");
            self.status.fail(session, e.to_string());
            self.aggregator.supersede(session).await;
        }
    }

    async fn invoke_backend(&self, session: SessionId, predicates: Vec<Predicate>) -> Result<()> {
        let (results, _listener) =
            ResultChannelListener::spawn(session, self.aggregator.clone(), self.status.clone());
        self.backend.search(session, predicates, results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clipvault_core::error::ClipvaultError;
    use clipvault_core::search::{MatchMode, ResultFragment, ResultSender};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    // Mock backend that keeps every result channel so tests decide what
    // gets delivered and when.
    #[derive(Default)]
    struct MockBackend {
        requests: StdMutex<Vec<(SessionId, Vec<Predicate>)>>,
        channels: StdMutex<HashMap<SessionId, ResultSender>>,
        labels: Option<Vec<String>>,
        fail_search: bool,
    }

    impl MockBackend {
        fn with_labels(labels: &[&str]) -> Self {
            Self {
                labels: Some(labels.iter().map(|s| s.to_string()).collect()),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail_search: true,
                ..Self::default()
            }
        }

        fn push(&self, session: SessionId, id: u64) {
            let channels = self.channels.lock().unwrap();
            let tx = channels.get(&session).expect("no channel for session");
            tx.send(ResultFragment::new(session, ClipRecord::text(id, format!("clip {id}"), 0)))
                .unwrap();
        }

        fn close(&self, session: SessionId) {
            self.channels.lock().unwrap().remove(&session);
        }

        fn requests(&self) -> Vec<(SessionId, Vec<Predicate>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ClipSearchBackend for MockBackend {
        async fn search(
            &self,
            session_id: SessionId,
            predicates: Vec<Predicate>,
            results: ResultSender,
        ) -> Result<()> {
            self.requests.lock().unwrap().push((session_id, predicates));
            if self.fail_search {
                return Err(ClipvaultError::backend("backend process not running"));
            }
            self.channels.lock().unwrap().insert(session_id, results);
            Ok(())
        }

        async fn list_labels(&self) -> Result<Vec<String>> {
            self.labels
                .clone()
                .ok_or_else(|| ClipvaultError::backend("labels unavailable"))
        }
    }

    async fn wait_for_items(usecase: &SearchUseCase, expected: &[u64]) {
        let mut rx = usecase.subscribe_rebuild();
        for _ in 0..50 {
            let ids: Vec<u64> = usecase.current_items().await.iter().map(|c| c.id).collect();
            if ids == expected {
                return;
            }
            let _ = tokio::time::timeout(Duration::from_millis(20), rx.changed()).await;
        }
        let ids: Vec<u64> = usecase.current_items().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_mount_issues_first_session_and_loads_labels() {
        let backend = Arc::new(MockBackend::with_labels(&["pinned", "favourite"]));
        let usecase = SearchUseCase::new(backend.clone(), SearchPolicy::default());

        let mounted = usecase.mount().await;

        assert_eq!(mounted.session, SessionId(1));
        assert_eq!(mounted.labels, vec!["pinned".to_string(), "favourite".to_string()]);
        assert_eq!(backend.requests(), vec![(SessionId(1), vec![Predicate::Limit(30)])]);
        assert_eq!(usecase.status(), SearchStatus::Searching { session: SessionId(1) });
    }

    #[tokio::test]
    async fn test_label_failure_degrades_to_empty_list() {
        let backend = Arc::new(MockBackend::default());
        let usecase = SearchUseCase::new(backend, SearchPolicy::default());

        let mounted = usecase.mount().await;
        assert!(mounted.labels.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_issues_new_session_with_compiled_predicates() {
        let backend = Arc::new(MockBackend::with_labels(&[]));
        let usecase = SearchUseCase::new(backend.clone(), SearchPolicy { result_limit: 10 });
        usecase.mount().await;

        let session = usecase
            .dispatch(ConstraintAction::SetMatchMode(MatchMode::Fuzzy))
            .await;
        assert_eq!(session, Some(SessionId(2)));
        let session = usecase
            .dispatch(ConstraintAction::SetSearchText("rust".into()))
            .await;
        assert_eq!(session, Some(SessionId(3)));

        let requests = backend.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[2],
            (
                SessionId(3),
                vec![Predicate::Limit(10), Predicate::TextFuzzy("rust".into())]
            )
        );
    }

    #[tokio::test]
    async fn test_unchanged_constraint_issues_no_session() {
        let backend = Arc::new(MockBackend::with_labels(&[]));
        let usecase = SearchUseCase::new(backend.clone(), SearchPolicy::default());
        usecase.mount().await;

        let session = usecase.dispatch(ConstraintAction::SetSearchText(String::new())).await;

        assert_eq!(session, None);
        assert_eq!(backend.requests().len(), 1);
        assert_eq!(usecase.latest_session(), Some(SessionId(1)));
    }

    #[tokio::test]
    async fn test_results_of_superseded_session_are_dropped() {
        let backend = Arc::new(MockBackend::with_labels(&[]));
        let usecase = SearchUseCase::new(backend.clone(), SearchPolicy::default());
        let first = usecase.mount().await.session;

        backend.push(first, 1);
        backend.push(first, 2);
        wait_for_items(&usecase, &[1, 2]).await;

        let second = usecase
            .dispatch(ConstraintAction::SetSearchText("x".into()))
            .await
            .unwrap();
        backend.push(second, 10);
        wait_for_items(&usecase, &[10]).await;

        // The old stream keeps draining in the background.
        backend.push(first, 3);
        backend.push(second, 11);
        wait_for_items(&usecase, &[10, 11]).await;
        assert_eq!(usecase.current_session().await, Some(second));
    }

    #[tokio::test]
    async fn test_stream_end_marks_latest_session_finished() {
        let backend = Arc::new(MockBackend::with_labels(&[]));
        let usecase = SearchUseCase::new(backend.clone(), SearchPolicy::default());
        let first = usecase.mount().await.session;
        let second = usecase
            .dispatch(ConstraintAction::InsertIncludedLabel("pinned".into()))
            .await
            .unwrap();

        let mut status = usecase.subscribe_status();
        backend.close(first);
        backend.close(second);

        let settled = tokio::time::timeout(
            Duration::from_secs(1),
            status.wait_for(|s| s.is_settled()),
        )
        .await
        .expect("status never settled")
        .unwrap()
        .clone();
        assert_eq!(settled, SearchStatus::Finished { session: second });
    }

    #[tokio::test]
    async fn test_invocation_failure_degrades_to_no_results() {
        let backend = Arc::new(MockBackend::failing());
        let usecase = SearchUseCase::new(backend, SearchPolicy::default());

        let mounted = usecase.mount().await;

        assert!(usecase.current_items().await.is_empty());
        assert_eq!(usecase.current_session().await, Some(mounted.session));
        assert!(matches!(
            usecase.status(),
            SearchStatus::Failed { session, .. } if session == mounted.session
        ));
    }

    #[tokio::test]
    async fn test_additional_predicates_are_sent() {
        let backend = Arc::new(MockBackend::with_labels(&[]));
        let usecase = SearchUseCase::new(backend.clone(), SearchPolicy::default())
            .with_additional_predicates(vec![Predicate::TimestampLessThan(1_000)]);

        usecase.mount().await;

        assert_eq!(
            backend.requests()[0].1,
            vec![Predicate::Limit(30), Predicate::TimestampLessThan(1_000)]
        );
    }
}
