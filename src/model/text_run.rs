//! Per-span and per-image output models.

use serde::{Deserialize, Serialize};

use super::{Line, Span};
use crate::geometry::Rect;

/// One emitted span with its styling and position.
///
/// The position is the bounding box of the *line* holding the span, not the
/// span's own box. All spans on a line therefore report the same box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRunModel {
    /// Index of the block this run belongs to
    #[serde(rename = "parent_block_number")]
    pub block_number: usize,
    /// The span text, unmodified
    pub original_text: String,
    /// Font size in points
    pub font_size: f64,
    /// Font family name
    pub font_family: String,
    /// Packed sRGB color
    pub font_color: u32,
    /// Color as `#RRGGBB`
    pub font_color_hex: String,
    /// Decoded style descriptor (e.g., "sans proportional bold")
    pub font_style: String,
    pub left: f64,
    pub top: f64,
    pub end_left: f64,
    pub end_top: f64,
}

impl TextRunModel {
    /// Build the run for `span`, positioned at its containing `line`.
    pub fn new(block_number: usize, line: &Line, span: &Span) -> Self {
        Self {
            block_number,
            original_text: span.text.clone(),
            font_size: span.size,
            font_family: span.font.clone(),
            font_color: span.color,
            font_color_hex: span.color_hex(),
            font_style: span.style().describe(),
            left: line.bbox.x0,
            top: line.bbox.y0,
            end_left: line.bbox.x1,
            end_top: line.bbox.y1,
        }
    }

    /// Position of the run (the containing line's box).
    pub fn bbox(&self) -> Rect {
        Rect::new(self.left, self.top, self.end_left, self.end_top)
    }
}

/// An image placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageModel {
    pub left: f64,
    pub top: f64,
    pub end_left: f64,
    pub end_top: f64,
    /// Width in pixels
    pub image_width: u32,
    /// Height in pixels
    pub image_height: u32,
}

impl ImageModel {
    pub fn new(bbox: Rect, image_width: u32, image_height: u32) -> Self {
        Self {
            left: bbox.x0,
            top: bbox.y0,
            end_left: bbox.x1,
            end_top: bbox.y1,
            image_width,
            image_height,
        }
    }

    /// Placement of the image on the page.
    pub fn bbox(&self) -> Rect {
        Rect::new(self.left, self.top, self.end_left, self.end_top)
    }
}
