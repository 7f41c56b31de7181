//! In-memory content source loaded from a JSON layout dump.
//!
//! A layout dump is the per-page dictionary output of a text extractor:
//!
//! ```json
//! {"pages": [{"width": 612, "height": 792,
//!             "blocks": [{"type": 0, "bbox": [72, 72, 300, 90],
//!                         "lines": [{"bbox": [72, 72, 300, 90],
//!                                    "spans": [{"text": "Title", "size": 18,
//!                                               "font": "Helvetica-Bold",
//!                                               "color": 0, "flags": 16,
//!                                               "bbox": [72, 72, 140, 90]}]}]}],
//!             "images": [{"bbox": [72, 100, 272, 250], "width": 800, "height": 600}]}]}
//! ```
//!
//! The loosely-shaped records are validated once, when the dump is loaded.
//! After that every query works on typed [`LayoutFragment`]s.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::{ContentSource, ImageRegion, LayoutQuery};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::model::{LayoutFragment, Line, Span};

/// Block `type` value for text blocks.
const TEXT_BLOCK_TYPE: i64 = 0;

/// Letter size, used when a page omits its dimensions.
const DEFAULT_PAGE_WIDTH: f64 = 612.0;
const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// One page of a layout dump.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpPage {
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Fragments in extraction order
    pub fragments: Vec<LayoutFragment>,
    /// Image placements
    pub images: Vec<ImageRegion>,
}

impl DumpPage {
    /// Create an empty page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fragments: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add a fragment.
    pub fn with_fragment(mut self, fragment: LayoutFragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Add an image placement.
    pub fn with_image(mut self, image: ImageRegion) -> Self {
        self.images.push(image);
        self
    }

    fn query(&self, clip: Option<&Rect>, query: &LayoutQuery) -> Vec<LayoutFragment> {
        let mut fragments: Vec<LayoutFragment> = self
            .fragments
            .iter()
            .filter(|f| clip.map_or(true, |c| f.rect.intersects(c)))
            .cloned()
            .collect();
        if query.sort {
            // stable: equal keys keep extraction order
            fragments.sort_by(|a, b| {
                let (a, b) = (a.rect.normalize(), b.rect.normalize());
                a.y1.total_cmp(&b.y1).then(a.x0.total_cmp(&b.x0))
            });
        }
        fragments
    }
}

/// A [`ContentSource`] backed by a parsed layout dump.
///
/// Extractor flags were applied when the dump was produced, so
/// [`LayoutQuery::flags`] is ignored here; `sort` orders fragments by bottom
/// edge, then left edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutDump {
    pages: Vec<DumpPage>,
}

impl LayoutDump {
    /// Create a dump from already-typed pages.
    pub fn new(pages: Vec<DumpPage>) -> Self {
        Self { pages }
    }

    /// Load a dump from a JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dump from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawDump = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    /// Load a dump from JSON bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let raw: RawDump = serde_json::from_slice(data)?;
        Self::from_raw(raw)
    }

    /// Load a dump from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawDump = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Pages in the dump.
    pub fn pages(&self) -> &[DumpPage] {
        &self.pages
    }

    /// Get a page by number (1-indexed).
    pub fn page(&self, page: u32) -> Result<&DumpPage> {
        let count = self.pages.len() as u32;
        if page == 0 || page > count {
            return Err(Error::PageOutOfRange(page, count));
        }
        Ok(&self.pages[(page - 1) as usize])
    }

    fn from_raw(raw: RawDump) -> Result<Self> {
        let pages = raw
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| page.into_page(i as u32 + 1))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("Loaded layout dump with {} pages", pages.len());
        Ok(Self { pages })
    }
}

impl ContentSource for LayoutDump {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, page: u32) -> Result<(f64, f64)> {
        let page = self.page(page)?;
        Ok((page.width, page.height))
    }

    fn layout(&self, page: u32, query: &LayoutQuery) -> Result<Vec<LayoutFragment>> {
        Ok(self.page(page)?.query(None, query))
    }

    fn layout_in(
        &self,
        page: u32,
        clip: &Rect,
        query: &LayoutQuery,
    ) -> Result<Vec<LayoutFragment>> {
        Ok(self.page(page)?.query(Some(&clip.normalize()), query))
    }

    fn image_regions(&self, page: u32) -> Result<Vec<ImageRegion>> {
        Ok(self.page(page)?.images.clone())
    }
}

// ---------------------------------------------------------------------------
// Raw JSON shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawDump {
    #[serde(default)]
    pages: Vec<RawPage>,
}

#[derive(Deserialize)]
struct RawPage {
    width: Option<f64>,
    height: Option<f64>,
    #[serde(default)]
    blocks: Vec<RawBlock>,
    #[serde(default)]
    images: Vec<RawImage>,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(rename = "type", default)]
    kind: i64,
    bbox: Option<Vec<f64>>,
    #[serde(default)]
    lines: Vec<RawLine>,
}

#[derive(Deserialize)]
struct RawLine {
    bbox: Option<Vec<f64>>,
    #[serde(default)]
    spans: Vec<RawSpan>,
}

#[derive(Deserialize)]
struct RawSpan {
    #[serde(default)]
    text: String,
    #[serde(default)]
    size: f64,
    #[serde(default)]
    font: String,
    #[serde(default)]
    color: u32,
    #[serde(default)]
    flags: u32,
    bbox: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawImage {
    bbox: Option<Vec<f64>>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

/// Validate a required `bbox`, naming the offending record on failure.
fn required_bbox(bbox: Option<Vec<f64>>, what: impl Fn() -> String) -> Result<Rect> {
    let coords = bbox.ok_or_else(|| Error::InvalidGeometry(format!("{}: missing bbox", what())))?;
    Rect::from_coords(&coords).map_err(|e| match e {
        Error::InvalidGeometry(msg) => Error::InvalidGeometry(format!("{}: {}", what(), msg)),
        other => other,
    })
}

impl RawPage {
    fn into_page(self, number: u32) -> Result<DumpPage> {
        let width = self.width.unwrap_or(DEFAULT_PAGE_WIDTH);
        let height = self.height.unwrap_or(DEFAULT_PAGE_HEIGHT);
        if !width.is_finite() || !height.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "page {}: non-finite page size",
                number
            )));
        }

        let fragments = self
            .blocks
            .into_iter()
            .enumerate()
            .map(|(b, block)| block.into_fragment(number, b))
            .collect::<Result<Vec<_>>>()?;

        let images = self
            .images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let rect = required_bbox(image.bbox, || format!("page {}, image {}", number, i))?;
                Ok(ImageRegion::new(rect, image.width, image.height))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DumpPage {
            width,
            height,
            fragments,
            images,
        })
    }
}

impl RawBlock {
    fn into_fragment(self, page: u32, index: usize) -> Result<LayoutFragment> {
        let rect = required_bbox(self.bbox, || format!("page {}, block {}", page, index))?;
        if self.kind != TEXT_BLOCK_TYPE {
            return Ok(LayoutFragment::image(rect));
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        for (l, raw_line) in self.lines.into_iter().enumerate() {
            let line_box = required_bbox(raw_line.bbox, || {
                format!("page {}, block {}, line {}", page, index, l)
            })?;
            let spans = raw_line
                .spans
                .into_iter()
                .map(|span| {
                    // spans without their own box sit on the line's box
                    let bbox = match span.bbox {
                        Some(coords) => Rect::from_coords(&coords)?,
                        None => line_box,
                    };
                    Ok(Span {
                        text: span.text,
                        size: span.size,
                        font: span.font,
                        color: span.color,
                        flags: span.flags,
                        bbox,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            lines.push(Line::new(line_box, spans));
        }

        Ok(LayoutFragment::text(rect, lines))
    }
}
