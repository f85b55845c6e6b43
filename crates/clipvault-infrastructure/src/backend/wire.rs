//! JSON-lines messages exchanged with the search backend.
//!
//! Each message is one JSON object on its own line, tagged by `type`.
//!
//! Client to backend:
//! ```text
//! {"type":"search","sessionId":4,"constraints":[{"type":"limit","data":30}]}
//! {"type":"listLabels","requestId":1}
//! ```
//!
//! Backend to client:
//! ```text
//! {"type":"fragment","sessionId":4,"clip":{...}}
//! {"type":"sessionEnd","sessionId":4}
//! {"type":"labels","requestId":1,"labels":["pinned","favourite"]}
//! {"type":"error","sessionId":4,"message":"invalid regex"}
//! ```

use clipvault_core::clip::ClipRecord;
use clipvault_core::error::{ClipvaultError, Result};
use clipvault_core::search::{Predicate, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackendRequest {
    #[serde(rename_all = "camelCase")]
    Search {
        session_id: SessionId,
        constraints: Vec<Predicate>,
    },
    #[serde(rename_all = "camelCase")]
    ListLabels { request_id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BackendMessage {
    #[serde(rename_all = "camelCase")]
    Fragment { session_id: SessionId, clip: ClipRecord },
    #[serde(rename_all = "camelCase")]
    SessionEnd { session_id: SessionId },
    #[serde(rename_all = "camelCase")]
    Labels { request_id: u64, labels: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Error {
        #[serde(default)]
        session_id: Option<SessionId>,
        message: String,
    },
}

/// Serializes `request` as one newline-terminated line.
pub fn encode_request(request: &BackendRequest) -> Result<String> {
    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    Ok(line)
}

/// Parses one line received from the backend. Trailing whitespace and the
/// line terminator are allowed; bytes that are not UTF-8 are a protocol error.
pub fn decode_message(line: &[u8]) -> Result<BackendMessage> {
    serde_json::from_slice(line.trim_ascii_end())
        .map_err(|e| ClipvaultError::protocol(format!("malformed backend message: {e}")))
}
