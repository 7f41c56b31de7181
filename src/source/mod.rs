//! Content source abstraction layer.
//!
//! The layout core never decodes documents itself. It asks a
//! [`ContentSource`] for the fragments and image placements on a page, and
//! re-queries it with a clip rectangle when merging clustered regions.

mod dump;

pub use dump::{DumpPage, LayoutDump};

use crate::error::Result;
use crate::geometry::Rect;
use crate::model::LayoutFragment;

/// Extraction parameters forwarded to the content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutQuery {
    /// Extractor-specific flag bits (`None` = source defaults)
    pub flags: Option<u32>,
    /// Request fragments in reading order
    pub sort: bool,
}

impl LayoutQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extractor flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Enable or disable reading-order sorting.
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }
}

impl Default for LayoutQuery {
    fn default() -> Self {
        Self {
            flags: None,
            sort: true,
        }
    }
}

/// Placement of an image on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRegion {
    /// Where the image is drawn
    pub rect: Rect,
    /// Width in pixels
    pub pixel_width: u32,
    /// Height in pixels
    pub pixel_height: u32,
}

impl ImageRegion {
    pub fn new(rect: Rect, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            rect,
            pixel_width,
            pixel_height,
        }
    }
}

/// Abstract interface for page layout access.
///
/// Pages are addressed by 1-indexed page number. A source handle is not
/// required to be usable from several threads at once; parallel extraction
/// opens one source per worker instead.
pub trait ContentSource {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Page (width, height) in points.
    fn page_size(&self, page: u32) -> Result<(f64, f64)>;

    /// Every layout fragment on a page.
    fn layout(&self, page: u32, query: &LayoutQuery) -> Result<Vec<LayoutFragment>>;

    /// Layout fragments intersecting `clip`.
    fn layout_in(&self, page: u32, clip: &Rect, query: &LayoutQuery)
        -> Result<Vec<LayoutFragment>>;

    /// Image placements on a page.
    fn image_regions(&self, page: u32) -> Result<Vec<ImageRegion>>;
}

impl<T: ContentSource + ?Sized> ContentSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_size(&self, page: u32) -> Result<(f64, f64)> {
        (**self).page_size(page)
    }

    fn layout(&self, page: u32, query: &LayoutQuery) -> Result<Vec<LayoutFragment>> {
        (**self).layout(page, query)
    }

    fn layout_in(
        &self,
        page: u32,
        clip: &Rect,
        query: &LayoutQuery,
    ) -> Result<Vec<LayoutFragment>> {
        (**self).layout_in(page, clip, query)
    }

    fn image_regions(&self, page: u32) -> Result<Vec<ImageRegion>> {
        (**self).image_regions(page)
    }
}

impl<T: ContentSource + ?Sized> ContentSource for Box<T> {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn page_size(&self, page: u32) -> Result<(f64, f64)> {
        (**self).page_size(page)
    }

    fn layout(&self, page: u32, query: &LayoutQuery) -> Result<Vec<LayoutFragment>> {
        (**self).layout(page, query)
    }

    fn layout_in(
        &self,
        page: u32,
        clip: &Rect,
        query: &LayoutQuery,
    ) -> Result<Vec<LayoutFragment>> {
        (**self).layout_in(page, clip, query)
    }

    fn image_regions(&self, page: u32) -> Result<Vec<ImageRegion>> {
        (**self).image_regions(page)
    }
}
