//! Values flowing between the backend, the aggregator and the view.

use serde::{Deserialize, Serialize};

use crate::clip::ClipRecord;
use crate::search::session::SessionId;

/// One incrementally delivered search result tagged with its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFragment {
    #[serde(rename = "clip")]
    pub item: ClipRecord,
    pub session_id: SessionId,
}

impl ResultFragment {
    pub fn new(session_id: SessionId, item: ClipRecord) -> Self {
        Self { item, session_id }
    }
}

/// Change-notification value handed to the view. Only its changes matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct RebuildToken(pub u64);

/// Progress of the latest search session, as shown next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    NotStarted,
    Searching { session: SessionId },
    Finished { session: SessionId },
    Failed { session: SessionId, message: String },
}

impl SearchStatus {
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::NotStarted => None,
            Self::Searching { session }
            | Self::Finished { session }
            | Self::Failed { session, .. } => Some(*session),
        }
    }

    /// True once the session has no more results coming.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fragment_wire_shape() {
        let fragment: ResultFragment = serde_json::from_value(json!({
            "clip": {
                "id": 3,
                "data": "abc",
                "searchText": "abc",
                "clipType": "text",
                "timestamp": 10,
                "labels": [],
            },
            "sessionId": 9,
        }))
        .unwrap();

        assert_eq!(fragment.session_id, SessionId(9));
        assert_eq!(fragment.item.id, 3);
    }

    #[test]
    fn test_status_session_and_settled() {
        assert_eq!(SearchStatus::NotStarted.session(), None);
        let searching = SearchStatus::Searching {
            session: SessionId(2),
        };
        assert_eq!(searching.session(), Some(SessionId(2)));
        assert!(!searching.is_settled());
        assert!(
            SearchStatus::Failed {
                session: SessionId(2),
                message: "down".into()
            }
            .is_settled()
        );
    }
}
