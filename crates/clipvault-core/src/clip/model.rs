//! Clip domain models.

use serde::{Deserialize, Serialize};

/// The kind of content a clip was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClipType {
    #[default]
    Text,
    Image,
    /// JSON encoded list of file URIs
    File,
    Html,
    Rtf,
}

impl std::fmt::Display for ClipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::File => write!(f, "file"),
            Self::Html => write!(f, "html"),
            Self::Rtf => write!(f, "rtf"),
        }
    }
}

/// A single clipboard history entry.
///
/// Records are immutable once the backend has created them; the client never
/// edits one, it only accumulates and displays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    pub id: u64,
    /// Raw clip content.
    pub data: String,
    /// Plain-text rendition the backend matches against.
    pub search_text: String,
    pub clip_type: ClipType,
    /// Capture time in seconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub timestamp_seconds: i64,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ClipRecord {
    /// Creates a text clip with no labels.
    pub fn text(id: u64, data: impl Into<String>, timestamp_seconds: i64) -> Self {
        let data = data.into();
        Self {
            id,
            search_text: data.clone(),
            data,
            clip_type: ClipType::Text,
            timestamp_seconds,
            labels: Vec::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clip_record_wire_shape() {
        let clip = ClipRecord::text(7, "hello", 1_700_000_000).with_labels(["pinned"]);
        let value = serde_json::to_value(&clip).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "data": "hello",
                "searchText": "hello",
                "clipType": "text",
                "timestamp": 1_700_000_000,
                "labels": ["pinned"],
            })
        );
    }

    #[test]
    fn test_clip_record_labels_default_to_empty() {
        let clip: ClipRecord = serde_json::from_value(json!({
            "id": 1,
            "data": "<b>x</b>",
            "searchText": "x",
            "clipType": "html",
            "timestamp": 5,
        }))
        .unwrap();

        assert_eq!(clip.clip_type, ClipType::Html);
        assert!(clip.labels.is_empty());
    }
}
