use std::sync::Arc;

use clipvault_core::search::{InsertOutcome, ResultSender, SearchAggregator, SessionId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::SearchStatusTracker;

/// Per-session subscription to the backend's push channel.
///
/// Every fragment received is handed to the aggregator as-is; filtering stale
/// sessions is the aggregator's job. A listener is never cancelled. Once its
/// session is superseded its fragments are simply discarded, and the task
/// ends when the backend drops the sender.
pub struct ResultChannelListener;

impl ResultChannelListener {
    /// Opens the channel for `session_id` and spawns the forwarding task.
    ///
    /// The returned sender goes to the backend. The task resolves to the
    /// number of fragments the aggregator accepted.
    pub fn spawn(
        session_id: SessionId,
        aggregator: Arc<SearchAggregator>,
        status: Arc<SearchStatusTracker>,
    ) -> (ResultSender, JoinHandle<usize>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut accepted = 0usize;
            while let Some(fragment) = rx.recv().await {
                if aggregator.insert(fragment).await != InsertOutcome::Discarded {
                    accepted += 1;
                }
            }

            tracing::info!(session_id = %session_id, accepted, "search result stream ended");
            status.finish(session_id);
            accepted
        });

        (tx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipvault_core::clip::ClipRecord;
    use clipvault_core::search::{ResultFragment, SearchStatus};

    #[tokio::test]
    async fn test_forwards_fragments_of_any_session() {
        let aggregator = Arc::new(SearchAggregator::new());
        let status = Arc::new(SearchStatusTracker::new());
        status.begin(SessionId(2));

        let (tx, handle) =
            ResultChannelListener::spawn(SessionId(2), aggregator.clone(), status.clone());
        tx.send(ResultFragment::new(SessionId(2), ClipRecord::text(1, "a", 1))).unwrap();
        // Tagged with another session; forwarded anyway and discarded as stale.
        tx.send(ResultFragment::new(SessionId(1), ClipRecord::text(2, "b", 2))).unwrap();
        tx.send(ResultFragment::new(SessionId(2), ClipRecord::text(3, "c", 3))).unwrap();
        drop(tx);

        assert_eq!(handle.await.unwrap(), 2);
        let ids: Vec<u64> = aggregator.current_items().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(status.current(), SearchStatus::Finished { session: SessionId(2) });
    }
}
