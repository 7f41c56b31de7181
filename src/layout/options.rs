//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::model::ClusteringConfig;
use crate::source::LayoutQuery;

/// Default cap on the number of pages extracted per document.
pub const DEFAULT_MAX_PAGES: u32 = 8;

/// Options for extracting page models.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Merge neighboring text blocks into clustered blocks
    pub use_clustered_blocks: bool,

    /// Horizontal clustering tolerance (`None` = 0)
    pub x_tolerance: Option<f64>,

    /// Vertical clustering tolerance (`None` = 0)
    pub y_tolerance: Option<f64>,

    /// Maximum number of pages to extract (`None` = unlimited)
    pub max_pages: Option<u32>,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,

    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Parameters forwarded to the content source
    pub query: LayoutQuery,

    /// Whether to use parallel processing
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable clustered blocks with the given tolerances.
    pub fn clustered(mut self, x_tolerance: f64, y_tolerance: f64) -> Self {
        self.use_clustered_blocks = true;
        self.x_tolerance = Some(x_tolerance);
        self.y_tolerance = Some(y_tolerance);
        self
    }

    /// Enable or disable clustered blocks.
    pub fn with_clustered_blocks(mut self, enabled: bool) -> Self {
        self.use_clustered_blocks = enabled;
        self
    }

    /// Set the horizontal tolerance.
    pub fn with_x_tolerance(mut self, tolerance: f64) -> Self {
        self.x_tolerance = Some(tolerance);
        self
    }

    /// Set the vertical tolerance.
    pub fn with_y_tolerance(mut self, tolerance: f64) -> Self {
        self.y_tolerance = Some(tolerance);
        self
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip failing pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the content source query.
    pub fn with_query(mut self, query: LayoutQuery) -> Self {
        self.query = query;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The clustering configuration in effect, or `None` when disabled.
    pub fn clustering(&self) -> Option<ClusteringConfig> {
        self.use_clustered_blocks.then(|| {
            ClusteringConfig::new(
                self.x_tolerance.unwrap_or(0.0),
                self.y_tolerance.unwrap_or(0.0),
            )
        })
    }

    /// Reject tolerances that cannot be compared against coordinates.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("x_tolerance", self.x_tolerance),
            ("y_tolerance", self.y_tolerance),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::InvalidOption(format!(
                        "{} must be a finite non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }
        if self.max_pages == Some(0) {
            return Err(Error::InvalidOption(
                "max_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Page numbers to extract from a document with `page_count` pages.
    pub fn page_plan(&self, page_count: u32) -> Vec<u32> {
        let limit = self.max_pages.map_or(usize::MAX, |m| m as usize);
        (1..=page_count)
            .filter(|p| self.pages.includes(*p))
            .take(limit)
            .collect()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            use_clustered_blocks: false,
            x_tolerance: None,
            y_tolerance: None,
            max_pages: Some(DEFAULT_MAX_PAGES),
            pages: PageSelection::All,
            error_mode: ErrorMode::Strict,
            query: LayoutQuery::default(),
            parallel: false,
        }
    }
}

/// Error handling mode across the pages of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the document on the first failing page
    #[default]
    Strict,
    /// Record the failing page and continue
    Lenient,
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Check for simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Parse comma-separated list with possible ranges
        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "'{}' is not a page number",
            s.trim()
        ))),
        Ok(p) => Ok(p),
    }
}
