//! Incremental aggregation of streamed search results.

use std::collections::BTreeMap;

use tokio::sync::{Mutex, watch};

use crate::clip::ClipRecord;
use crate::search::model::{RebuildToken, ResultFragment};
use crate::search::session::SessionId;

/// What [`SearchAggregator::insert`] did with a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The fragment opened a newer session; older sessions were evicted.
    Started,
    /// The fragment was appended to the live session.
    Appended,
    /// The fragment belongs to a superseded session and was dropped.
    Discarded,
}

/// Owns the result store of one search view.
///
/// The store maps session ids to the records received for them, in arrival
/// order. It holds at most one session: the greatest id seen so far. All
/// writes go through one async mutex so concurrently delivered fragments are
/// applied one at a time, and every accepted write bumps the rebuild token.
pub struct SearchAggregator {
    store: Mutex<BTreeMap<SessionId, Vec<ClipRecord>>>,
    rebuild: watch::Sender<RebuildToken>,
}

impl SearchAggregator {
    /// Creates an aggregator with an empty store.
    pub fn new() -> Self {
        let (rebuild, _) = watch::channel(RebuildToken::default());
        Self {
            store: Mutex::new(BTreeMap::new()),
            rebuild,
        }
    }

    /// Folds `fragment` into the store.
    ///
    /// - newer than every stored session: starts that session with this item
    ///   and removes all other sessions
    /// - older than the live session: dropped without touching the store
    /// - same as the live session: appended
    ///
    /// A rebuild signal is emitted for every fragment that was not dropped.
    pub async fn insert(&self, fragment: ResultFragment) -> InsertOutcome {
        let ResultFragment { item, session_id } = fragment;

        let outcome = {
            let mut store = self.store.lock().await;
            let last_key = store.keys().next_back().copied();

            match last_key {
                Some(last) if session_id < last => InsertOutcome::Discarded,
                Some(last) if session_id == last => {
                    if let Some(items) = store.get_mut(&last) {
                        items.push(item);
                    }
                    InsertOutcome::Appended
                }
                _ => {
                    store.clear();
                    store.insert(session_id, vec![item]);
                    InsertOutcome::Started
                }
            }
        };

        tracing::debug!(session_id = %session_id, outcome = ?outcome, "search fragment processed");

        if outcome != InsertOutcome::Discarded {
            self.signal_rebuild();
        }
        outcome
    }

    /// Makes `session_id` the live session with no results.
    ///
    /// Used when a search could not be started so the view shows an empty
    /// result instead of the previous query's. Ignored unless `session_id` is
    /// newer than every stored session. Returns whether the store changed.
    pub async fn supersede(&self, session_id: SessionId) -> bool {
        let changed = {
            let mut store = self.store.lock().await;
            match store.keys().next_back() {
                Some(last) if *last >= session_id => false,
                _ => {
                    store.clear();
                    store.insert(session_id, Vec::new());
                    true
                }
            }
        };

        if changed {
            self.signal_rebuild();
        }
        changed
    }

    /// Records of the live session, or an empty list when nothing arrived yet.
    pub async fn current_items(&self) -> Vec<ClipRecord> {
        let store = self.store.lock().await;
        store.values().next_back().cloned().unwrap_or_default()
    }

    /// The live session id, if any fragment has been accepted.
    pub async fn current_session(&self) -> Option<SessionId> {
        self.store.lock().await.keys().next_back().copied()
    }

    /// Number of sessions currently held; never more than one.
    pub async fn session_count(&self) -> usize {
        self.store.lock().await.len()
    }

    pub fn rebuild_token(&self) -> RebuildToken {
        *self.rebuild.borrow()
    }

    /// Receives a new token after every accepted write.
    pub fn subscribe(&self) -> watch::Receiver<RebuildToken> {
        self.rebuild.subscribe()
    }

    fn signal_rebuild(&self) {
        self.rebuild.send_modify(|token| token.0 += 1);
    }
}

impl Default for SearchAggregator {
    fn default() -> Self {
        Self::new()
    }
}
