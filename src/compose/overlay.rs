use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};

pub type OverlayId = Uuid;

pub const DEFAULT_TEXT_SIZE: f64 = 24.0;
pub const DEFAULT_STICKER_SIZE: f64 = 50.0;

/// Glyphs offered by the sticker picker.
pub const STICKER_GLYPHS: [&str; 14] = [
    "😂", "❤️", "🔥", "👏", "🎉", "💯", "✨", "🙌", "😍", "🤔", "📚", "🎓", "☕", "🌟",
];

/// Fixed text palette.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TextColor {
    #[default]
    #[serde(rename = "#FFFFFF")]
    White,
    #[serde(rename = "#000000")]
    Black,
    #[serde(rename = "#FF6B6B")]
    Coral,
    #[serde(rename = "#4ECDC4")]
    Turquoise,
    #[serde(rename = "#45B7D1")]
    Sky,
    #[serde(rename = "#96CEB4")]
    Sage,
    #[serde(rename = "#FFEAA7")]
    Butter,
    #[serde(rename = "#DDA0DD")]
    Plum,
}

impl TextColor {
    pub const PALETTE: [TextColor; 8] = [
        TextColor::White,
        TextColor::Black,
        TextColor::Coral,
        TextColor::Turquoise,
        TextColor::Sky,
        TextColor::Sage,
        TextColor::Butter,
        TextColor::Plum,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            TextColor::White => "#FFFFFF",
            TextColor::Black => "#000000",
            TextColor::Coral => "#FF6B6B",
            TextColor::Turquoise => "#4ECDC4",
            TextColor::Sky => "#45B7D1",
            TextColor::Sage => "#96CEB4",
            TextColor::Butter => "#FFEAA7",
            TextColor::Plum => "#DDA0DD",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    Normal,
    #[default]
    Bold,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OverlayKind {
    Text {
        content: String,
        color: TextColor,
        size: f64,
        weight: FontWeight,
    },
    Sticker {
        glyph: String,
        size: f64,
    },
}

/// A text or sticker annotation placed on a composed media item. `position` is the
/// top-left corner of its bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: OverlayId,
    pub position: Point,
    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl Overlay {
    pub fn text(content: &str, color: TextColor, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            kind: OverlayKind::Text {
                content: content.to_string(),
                color,
                size: DEFAULT_TEXT_SIZE,
                weight: FontWeight::Bold,
            },
        }
    }

    pub fn sticker(glyph: &str, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            kind: OverlayKind::Sticker {
                glyph: glyph.to_string(),
                size: DEFAULT_STICKER_SIZE,
            },
        }
    }

    /// Approximate extent used for hit-testing; text assumes an average glyph width
    /// of 0.6 em per character on the widest line.
    pub fn extent(&self) -> Size {
        match &self.kind {
            OverlayKind::Text { content, size, .. } => {
                let lines = content.lines().count().max(1);
                let widest = content
                    .lines()
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0);
                Size::new(widest as f64 * size * 0.6, lines as f64 * size * 1.2)
            }
            OverlayKind::Sticker { size, .. } => Size::new(*size, *size),
        }
    }

    pub fn bounds_at(&self, position: Point) -> Rect {
        Rect {
            origin: position,
            size: self.extent(),
        }
    }
}
