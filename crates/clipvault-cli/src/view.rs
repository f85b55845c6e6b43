//! Plain-text rendering of search results and status.

use chrono::DateTime;
use clipvault_core::clip::ClipRecord;
use clipvault_core::search::{QueryConstraint, SearchStatus};

const PREVIEW_WIDTH: usize = 72;

/// One result line: `#id  YYYY-mm-dd HH:MM  preview  [labels]`.
pub fn format_clip(clip: &ClipRecord) -> String {
    let when = DateTime::from_timestamp(clip.timestamp_seconds, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!("#{:<6} {}  {}", clip.id, when, preview(&clip.search_text));
    if !clip.labels.is_empty() {
        line.push_str(&format!("  [{}]", clip.labels.join(", ")));
    }
    line
}

/// First line of `text`, whitespace-trimmed and cut to the preview width.
pub fn preview(text: &str) -> String {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    let multiline = text.trim().lines().count() > 1;

    let mut out: String = first.chars().take(PREVIEW_WIDTH).collect();
    if first.chars().count() > PREVIEW_WIDTH || multiline {
        out.push_str("...");
    }
    out
}

pub fn format_status(status: &SearchStatus) -> String {
    match status {
        SearchStatus::NotStarted => "idle".to_string(),
        SearchStatus::Searching { session } => format!("searching (session {session})"),
        SearchStatus::Finished { session } => format!("done (session {session})"),
        SearchStatus::Failed { session, message } => {
            format!("failed (session {session}): {message}")
        }
    }
}

/// Compact description of the query, e.g. `fuzzy "foo" +pinned -work`.
pub fn format_constraint(constraint: &QueryConstraint) -> String {
    let mut parts = vec![format!(
        "{} {:?}",
        constraint.match_mode, constraint.search_text
    )];
    parts.extend(constraint.included_labels.iter().map(|l| format!("+{l}")));
    parts.extend(constraint.excluded_labels.iter().map(|l| format!("!{l}")));
    parts.join(" ")
}
