pub mod segment;

pub use segment::{format_age, MediaKind, StorySegment};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Ordered segments of one author for one viewing session.
///
/// Order is the catalog order; nothing here re-sorts. An empty timeline is
/// valid and is what puts a viewer into its not-found state.
#[derive(Debug, Clone, Default)]
pub struct SegmentTimeline {
    author_id: String,
    segments: Vec<StorySegment>,
}

impl SegmentTimeline {
    pub fn from_catalog(catalog: &[StorySegment], author_id: &str) -> Self {
        let segments: Vec<StorySegment> = catalog
            .iter()
            .filter(|segment| segment.author_id == author_id)
            .cloned()
            .collect();

        log_info!(
            "timeline for {} built with {} of {} catalog segments",
            author_id,
            segments.len(),
            catalog.len()
        );

        Self {
            author_id: author_id.to_string(),
            segments,
        }
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StorySegment> {
        self.segments.get(index)
    }

    pub fn position_of(&self, segment_id: &str) -> Option<usize> {
        self.segments.iter().position(|segment| segment.id == segment_id)
    }

    pub fn segments(&self) -> &[StorySegment] {
        &self.segments
    }
}
