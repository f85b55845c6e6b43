use clipvault_core::search::{SearchStatus, SessionId};
use tokio::sync::watch;

/// Publishes the [`SearchStatus`] of the latest session.
///
/// Updates coming from a session older than the one currently shown are
/// ignored, so a slow stream ending in the background cannot mark a newer
/// search as finished.
pub struct SearchStatusTracker {
    status: watch::Sender<SearchStatus>,
}

impl SearchStatusTracker {
    pub fn new() -> Self {
        let (status, _) = watch::channel(SearchStatus::NotStarted);
        Self { status }
    }

    /// Marks `session` as searching unless a newer session is already shown.
    pub fn begin(&self, session: SessionId) -> bool {
        self.status.send_if_modified(|status| {
            if status.session().is_some_and(|current| current > session) {
                return false;
            }
            *status = SearchStatus::Searching { session };
            true
        })
    }

    /// Marks `session` as finished if it is the one currently searching.
    pub fn finish(&self, session: SessionId) -> bool {
        self.status.send_if_modified(|status| {
            if *status != (SearchStatus::Searching { session }) {
                return false;
            }
            *status = SearchStatus::Finished { session };
            true
        })
    }

    /// Marks `session` as failed. Overrides a `Finished` of the same session,
    /// since the result stream closes before the invocation error is seen.
    pub fn fail(&self, session: SessionId, message: impl Into<String>) -> bool {
        let message = message.into();
        self.status.send_if_modified(|status| {
            if status.session().is_some_and(|current| current > session) {
                return false;
            }
            *status = SearchStatus::Failed { session, message };
            true
        })
    }

    pub fn current(&self) -> SearchStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchStatus> {
        self.status.subscribe()
    }
}

impl Default for SearchStatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_of_single_session() {
        let tracker = SearchStatusTracker::new();
        assert_eq!(tracker.current(), SearchStatus::NotStarted);

        assert!(tracker.begin(SessionId(1)));
        assert_eq!(tracker.current(), SearchStatus::Searching { session: SessionId(1) });

        assert!(tracker.finish(SessionId(1)));
        assert_eq!(tracker.current(), SearchStatus::Finished { session: SessionId(1) });
    }

    #[test]
    fn test_older_session_cannot_touch_newer_status() {
        let tracker = SearchStatusTracker::new();
        tracker.begin(SessionId(1));
        tracker.begin(SessionId(2));

        assert!(!tracker.finish(SessionId(1)));
        assert!(!tracker.fail(SessionId(1), "late"));
        assert!(!tracker.begin(SessionId(1)));
        assert_eq!(tracker.current(), SearchStatus::Searching { session: SessionId(2) });
    }

    #[test]
    fn test_fail_overrides_finish_of_same_session() {
        let tracker = SearchStatusTracker::new();
        tracker.begin(SessionId(3));
        tracker.finish(SessionId(3));

        assert!(tracker.fail(SessionId(3), "backend unreachable"));
        assert_eq!(
            tracker.current(),
            SearchStatus::Failed {
                session: SessionId(3),
                message: "backend unreachable".into()
            }
        );
        assert!(!tracker.finish(SessionId(3)));
    }
}
