//! Merged logical text blocks.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{LayoutFragment, Line};
use crate::geometry::Rect;

/// A merged logical unit of text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block index on the page (0-indexed)
    pub number: usize,

    /// Line texts joined by `\n`
    pub text: String,

    /// Union of the bounding boxes of every constituent fragment
    #[serde(rename = "boundingBox", with = "bbox_string")]
    pub bbox: Rect,

    /// Constituent lines in merge order
    #[serde(skip)]
    pub lines: Vec<Line>,
}

impl Block {
    /// Build a block from a (possibly merged) text fragment.
    pub fn from_fragment(number: usize, fragment: LayoutFragment) -> Self {
        let text = fragment
            .lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            number,
            text,
            bbox: fragment.rect,
            lines: fragment.lines,
        }
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of lines in the block.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// `boundingBox` is written as `"x0,y0,x1,y1"`.
mod bbox_string {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(rect: &Rect, serializer: S) -> Result<S::Ok, S::Error> {
        let s = format!("{:?},{:?},{:?},{:?}", rect.x0, rect.y0, rect.x1, rect.y1);
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rect, D::Error> {
        let s = String::deserialize(deserializer)?;
        let coords = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(D::Error::custom)?;
        Rect::from_coords(&coords).map_err(D::Error::custom)
    }
}
