//! Folding the fragments of a clustered region into one block.

use crate::error::Result;
use crate::geometry::Rect;
use crate::model::LayoutFragment;
use crate::source::{ContentSource, LayoutQuery};

/// Re-queries a content source per region and merges what it returns.
pub struct BlockAssembler<'a, S: ContentSource + ?Sized> {
    source: &'a S,
    page: u32,
    query: LayoutQuery,
}

impl<'a, S: ContentSource + ?Sized> BlockAssembler<'a, S> {
    /// Create an assembler for one page of `source`.
    pub fn new(source: &'a S, page: u32, query: LayoutQuery) -> Self {
        Self {
            source,
            page,
            query,
        }
    }

    /// Merge the text fragments found in `region`.
    ///
    /// The first fragment returned by the source is the merge target; the
    /// lines of every later fragment are appended to it in query order and its
    /// box grows to cover them. Returns `None` when the region holds no text.
    pub fn assemble(&self, region: &Rect) -> Result<Option<LayoutFragment>> {
        let mut fragments = self
            .source
            .layout_in(self.page, region, &self.query)?
            .into_iter()
            .filter(LayoutFragment::is_text);

        let Some(mut merged) = fragments.next() else {
            log::debug!("Page {}: region {:?} holds no text", self.page, region);
            return Ok(None);
        };
        for other in fragments {
            merged.absorb(other);
        }
        Ok(Some(merged))
    }

    /// Merge every region, skipping the empty ones.
    pub fn assemble_all(&self, regions: &[Rect]) -> Result<Vec<LayoutFragment>> {
        let mut merged = Vec::with_capacity(regions.len());
        for region in regions {
            if let Some(fragment) = self.assemble(region)? {
                merged.push(fragment);
            }
        }
        Ok(merged)
    }
}
