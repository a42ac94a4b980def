use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

/// One photo or video unit of a story, exactly as the catalog supplied it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorySegment {
    pub id: String,
    pub author_id: String,
    pub media_ref: String,
    pub media_kind: MediaKind,
    pub created_at: DateTime<Utc>,
}

impl StorySegment {
    pub fn is_video(&self) -> bool {
        self.media_kind == MediaKind::Video
    }

    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        format_age(self.created_at, now)
    }
}

/// Relative age shown next to the author name: `now`, `{h}h`, or `{d}d`.
pub fn format_age(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created_at).num_hours();

    if hours < 1 {
        "now".to_string()
    } else if hours < 24 {
        format!("{hours}h")
    } else {
        format!("{}d", hours / 24)
    }
}
