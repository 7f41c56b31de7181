//! # pdfregions
//!
//! Geometry-aware page models from PDF layout data.
//!
//! This library takes the per-page layout a PDF text extractor produces
//! (blocks, lines and spans with bounding boxes) and turns it into structured
//! page records: one entry per styled text run, one per logical text block and
//! one per placed image. Neighboring blocks can optionally be merged into
//! larger regions with configurable horizontal and vertical tolerances.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfregions::{extract_file_with_options, render, ExtractOptions};
//!
//! fn main() -> pdfregions::Result<()> {
//!     // Merge blocks separated by at most 3pt vertically
//!     let options = ExtractOptions::new().clustered(0.0, 3.0);
//!     let doc = extract_file_with_options("layout.json", options)?;
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Region clustering**: greedy fixed-point merge of neighboring blocks
//! - **Pluggable sources**: anything implementing [`ContentSource`]
//! - **Page policies**: page caps, page selection, strict or lenient errors
//! - **Parallel processing**: Uses Rayon with one source per worker

pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use geometry::Rect;
pub use layout::{
    cluster_rects, BlockAssembler, DocumentExtractor, ErrorMode, ExtractOptions, PageModelBuilder,
    PageSelection, RegionClusterer, Tolerance, DEFAULT_MAX_PAGES,
};
pub use model::{
    Block, ClusteringConfig, DocumentRecord, FragmentKind, ImageModel, LayoutFragment, Line,
    PageFailure, PageRecord, Span, SpanFlags, TextRunModel,
};
pub use render::JsonFormat;
pub use source::{ContentSource, DumpPage, ImageRegion, LayoutDump, LayoutQuery};

use std::io::Read;
use std::path::Path;

/// Extract page records from a layout dump file with default options.
///
/// # Example
///
/// ```no_run
/// use pdfregions::extract_file;
///
/// let doc = extract_file("layout.json").unwrap();
/// println!("Pages: {}", doc.pages.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<DocumentRecord> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Extract page records from a layout dump file with custom options.
///
/// With `parallel` set, every rayon worker loads its own copy of the dump.
///
/// # Example
///
/// ```no_run
/// use pdfregions::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new()
///     .clustered(2.0, 2.0)
///     .lenient();
/// let doc = extract_file_with_options("layout.json", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<DocumentRecord> {
    let path = path.as_ref();
    let parallel = options.parallel;
    let extractor = DocumentExtractor::new(options)?;
    if parallel {
        extractor.extract_parallel(|| LayoutDump::open(path))
    } else {
        extractor.extract(&LayoutDump::open(path)?)
    }
}

/// Extract page records from layout dump bytes.
pub fn extract_bytes(data: &[u8]) -> Result<DocumentRecord> {
    extract_bytes_with_options(data, ExtractOptions::default())
}

/// Extract page records from layout dump bytes with custom options.
pub fn extract_bytes_with_options(data: &[u8], options: ExtractOptions) -> Result<DocumentRecord> {
    let source = LayoutDump::from_bytes(data)?;
    extract_source(&source, options)
}

/// Extract page records from a reader over a layout dump.
pub fn extract_reader<R: Read>(reader: R, options: ExtractOptions) -> Result<DocumentRecord> {
    let source = LayoutDump::from_reader(reader)?;
    extract_source(&source, options)
}

/// Extract page records from any content source, one page after another.
pub fn extract_source<S: ContentSource + ?Sized>(
    source: &S,
    options: ExtractOptions,
) -> Result<DocumentRecord> {
    DocumentExtractor::new(options)?.extract(source)
}

/// Convert a layout dump file to JSON.
///
/// # Example
///
/// ```no_run
/// use pdfregions::{to_json, JsonFormat};
///
/// let json = to_json("layout.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("pages.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let doc = extract_file(path)?;
    render::to_json(&doc, format)
}

/// Extract the block text of a layout dump file.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let doc = extract_file(path)?;
    Ok(render::to_text(&doc))
}

/// Builder for extracting and rendering page records.
///
/// # Example
///
/// ```no_run
/// use pdfregions::PdfRegions;
///
/// let json = PdfRegions::new()
///     .clustered(0.0, 3.0)
///     .all_pages()
///     .lenient()
///     .extract("layout.json")?
///     .to_json(pdfregions::JsonFormat::Compact)?;
/// # Ok::<(), pdfregions::Error>(())
/// ```
pub struct PdfRegions {
    options: ExtractOptions,
}

impl PdfRegions {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Merge neighboring blocks with the given tolerances.
    pub fn clustered(mut self, x_tolerance: f64, y_tolerance: f64) -> Self {
        self.options = self.options.clustered(x_tolerance, y_tolerance);
        self
    }

    /// Enable lenient mode.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Build pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Set the page cap.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.options = self.options.with_max_pages(Some(max_pages));
        self
    }

    /// Remove the page cap.
    pub fn all_pages(mut self) -> Self {
        self.options = self.options.with_max_pages(None);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Extract a layout dump file.
    pub fn extract<P: AsRef<Path>>(self, path: P) -> Result<ExtractResult> {
        let document = extract_file_with_options(path, self.options)?;
        Ok(ExtractResult { document })
    }

    /// Extract layout dump bytes.
    pub fn extract_bytes(self, data: &[u8]) -> Result<ExtractResult> {
        let document = extract_bytes_with_options(data, self.options)?;
        Ok(ExtractResult { document })
    }

    /// Extract from any content source.
    pub fn extract_source<S: ContentSource + ?Sized>(self, source: &S) -> Result<ExtractResult> {
        let document = extract_source(source, self.options)?;
        Ok(ExtractResult { document })
    }
}

impl Default for PdfRegions {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an extraction.
pub struct ExtractResult {
    /// The extracted document
    pub document: DocumentRecord,
}

impl ExtractResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &DocumentRecord {
        &self.document
    }
}
