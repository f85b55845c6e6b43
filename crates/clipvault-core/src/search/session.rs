//! Search session identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifies one search request and its result stream.
///
/// Ids are minted by a [`SessionIssuer`], strictly increasing and never
/// reused; a larger id always supersedes a smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mints session ids. One issuer exists per search view.
#[derive(Debug, Default)]
pub struct SessionIssuer {
    counter: AtomicU64,
}

impl SessionIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter and returns the new id. The first id is `1`.
    pub fn mint(&self) -> SessionId {
        SessionId(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently minted id, `None` before the first search.
    pub fn latest(&self) -> Option<SessionId> {
        match self.counter.load(Ordering::SeqCst) {
            0 => None,
            n => Some(SessionId(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_mint_starts_at_one_and_increases() {
        let issuer = SessionIssuer::new();
        assert_eq!(issuer.latest(), None);
        assert_eq!(issuer.mint(), SessionId(1));
        assert_eq!(issuer.mint(), SessionId(2));
        assert_eq!(issuer.latest(), Some(SessionId(2)));
    }

    #[test]
    fn test_concurrent_mints_are_unique() {
        let issuer = Arc::new(SessionIssuer::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let issuer = issuer.clone();
                std::thread::spawn(move || (0..250).map(|_| issuer.mint()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "session id {id} minted twice");
            }
        }
        assert_eq!(seen.len(), 2000);
        assert_eq!(issuer.latest(), Some(SessionId(2000)));
    }

    #[test]
    fn test_session_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&SessionId(42)).unwrap(), "42");
    }
}
