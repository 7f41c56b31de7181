//! Raw layout primitives reported by a content source.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

bitflags! {
    /// Font style bits attached to a span by the text extractor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpanFlags: u32 {
        /// Bit 0: superscripted text
        const SUPERSCRIPT = 1 << 0;
        /// Bit 1: italic face
        const ITALIC = 1 << 1;
        /// Bit 2: serifed face (sans-serif when clear)
        const SERIFED = 1 << 2;
        /// Bit 3: monospaced face (proportional when clear)
        const MONOSPACED = 1 << 3;
        /// Bit 4: bold face
        const BOLD = 1 << 4;
    }
}

impl SpanFlags {
    /// Human-readable style descriptor, e.g. `"italic serifed proportional bold"`.
    pub fn describe(&self) -> String {
        let mut words = Vec::with_capacity(5);
        if self.contains(SpanFlags::SUPERSCRIPT) {
            words.push("superscript");
        }
        if self.contains(SpanFlags::ITALIC) {
            words.push("italic");
        }
        words.push(if self.contains(SpanFlags::SERIFED) {
            "serifed"
        } else {
            "sans"
        });
        words.push(if self.contains(SpanFlags::MONOSPACED) {
            "monospaced"
        } else {
            "proportional"
        });
        if self.contains(SpanFlags::BOLD) {
            words.push("bold");
        }
        words.join(" ")
    }
}

/// Kind of a layout fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// A text block with lines and spans
    Text,
    /// An image or vector-graphic block
    Image,
}

/// The smallest styled unit of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f64,
    /// Font family name (e.g., "Helvetica-Bold")
    pub font: String,
    /// Packed sRGB color (0xRRGGBB)
    pub color: u32,
    /// Raw style bitmask, see [`SpanFlags`]
    pub flags: u32,
    /// Bounding box of the span itself
    pub bbox: Rect,
}

impl Span {
    /// Create a span with default styling.
    pub fn new(text: impl Into<String>, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            size: 12.0,
            font: String::new(),
            color: 0,
            flags: 0,
            bbox,
        }
    }

    /// Set the font family and size.
    pub fn with_font(mut self, font: impl Into<String>, size: f64) -> Self {
        self.font = font.into();
        self.size = size;
        self
    }

    /// Set the packed color.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the raw style bitmask.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Decoded style flags. Unknown bits are ignored.
    pub fn style(&self) -> SpanFlags {
        SpanFlags::from_bits_truncate(self.flags)
    }

    /// Color as an uppercase `#RRGGBB` string.
    pub fn color_hex(&self) -> String {
        format!("#{:06X}", self.color)
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Bounding box of the whole line
    pub bbox: Rect,
    /// Spans in reading order
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(bbox: Rect, spans: Vec<Span>) -> Self {
        Self { bbox, spans }
    }

    /// Spans that carry text. Empty spans never reach the page model.
    pub fn text_spans(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|s| !s.text.is_empty())
    }

    /// Span texts concatenated without separator.
    pub fn text(&self) -> String {
        self.text_spans().map(|s| s.text.as_str()).collect()
    }
}

/// One layout primitive as reported by a content source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFragment {
    /// Text or non-text block
    pub kind: FragmentKind,
    /// Bounding box of the fragment
    pub rect: Rect,
    /// Lines in the fragment (empty for non-text fragments)
    pub lines: Vec<Line>,
}

impl LayoutFragment {
    /// Create a text fragment.
    pub fn text(rect: Rect, lines: Vec<Line>) -> Self {
        Self {
            kind: FragmentKind::Text,
            rect,
            lines,
        }
    }

    /// Create a non-text fragment.
    pub fn image(rect: Rect) -> Self {
        Self {
            kind: FragmentKind::Image,
            rect,
            lines: Vec::new(),
        }
    }

    /// Check if this fragment carries text.
    pub fn is_text(&self) -> bool {
        self.kind == FragmentKind::Text
    }

    /// Fold another fragment into this one: its lines are appended and the
    /// bounding box grows to cover both.
    pub fn absorb(&mut self, other: LayoutFragment) {
        self.rect = self.rect.union(&other.rect);
        self.lines.extend(other.lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_plain() {
        assert_eq!(SpanFlags::empty().describe(), "sans proportional");
    }

    #[test]
    fn test_describe_all_bits() {
        assert_eq!(
            SpanFlags::all().describe(),
            "superscript italic serifed monospaced bold"
        );
        assert_eq!(
            SpanFlags::from_bits_truncate(20).describe(),
            "serifed proportional bold"
        );
    }

    #[test]
    fn test_span_color_hex() {
        let span = Span::new("x", Rect::default()).with_color(0x1A2B3C);
        assert_eq!(span.color_hex(), "#1A2B3C");
        assert_eq!(Span::new("x", Rect::default()).color_hex(), "#000000");
    }

    #[test]
    fn test_span_style_ignores_unknown_bits() {
        let span = Span::new("x", Rect::default()).with_flags(0b10_0010);
        assert_eq!(span.style(), SpanFlags::ITALIC);
    }

    #[test]
    fn test_line_text_skips_empty_spans() {
        let bbox = Rect::new(0.0, 0.0, 50.0, 10.0);
        let line = Line::new(
            bbox,
            vec![
                Span::new("Hello", bbox),
                Span::new("", bbox),
                Span::new(" world", bbox),
            ],
        );
        assert_eq!(line.text(), "Hello world");
        assert_eq!(line.text_spans().count(), 2);
    }

    #[test]
    fn test_absorb() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut a = LayoutFragment::text(bbox, vec![Line::new(bbox, vec![Span::new("a", bbox)])]);
        let other_box = Rect::new(0.0, 12.0, 20.0, 22.0);
        let b = LayoutFragment::text(
            other_box,
            vec![Line::new(other_box, vec![Span::new("b", other_box)])],
        );
        a.absorb(b);
        assert_eq!(a.rect, Rect::new(0.0, 0.0, 20.0, 22.0));
        assert_eq!(a.lines.len(), 2);
        assert_eq!(a.lines[1].text(), "b");
    }
}
