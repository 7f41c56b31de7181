//! Page and document drivers.

use rayon::prelude::*;

use super::assemble::BlockAssembler;
use super::cluster::{RegionClusterer, Tolerance};
use super::options::{ErrorMode, ExtractOptions};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::model::{
    Block, ClusteringConfig, DocumentRecord, ImageModel, LayoutFragment, PageFailure, PageRecord,
    TextRunModel,
};
use crate::source::ContentSource;

/// Builds the record of a single page.
///
/// The builder holds configuration only, so one instance can serve any
/// number of sources and threads.
#[derive(Debug, Clone, Default)]
pub struct PageModelBuilder {
    options: ExtractOptions,
}

impl PageModelBuilder {
    /// Create a builder, rejecting invalid options.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options in effect.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Build the record for `page` (1-indexed).
    pub fn build_page<S: ContentSource + ?Sized>(
        &self,
        source: &S,
        page: u32,
    ) -> Result<PageRecord> {
        let (width, height) = source.page_size(page)?;
        let mut record = PageRecord::new(page, width, height);

        record.images = source
            .image_regions(page)?
            .into_iter()
            .map(|image| ImageModel::new(image.rect, image.pixel_width, image.pixel_height))
            .collect();

        let fragments: Vec<LayoutFragment> = source
            .layout(page, &self.options.query)?
            .into_iter()
            .filter(LayoutFragment::is_text)
            .collect();
        log::debug!(
            "Page {}: {} text fragments, {} images",
            page,
            fragments.len(),
            record.images.len()
        );

        let clustering = self.options.clustering();
        let fragments = match clustering {
            Some(config) => {
                self.cluster_fragments(source, page, (width, height), &fragments, config)?
            }
            None => fragments,
        };
        record.clustering = clustering;

        record.blocks = fragments
            .into_iter()
            .enumerate()
            .map(|(number, fragment)| Block::from_fragment(number, fragment))
            .collect();

        for block in &record.blocks {
            for line in &block.lines {
                let runs = line
                    .text_spans()
                    .map(|span| TextRunModel::new(block.number, line, span));
                record.text_runs.extend(runs);
            }
        }

        log::debug!(
            "Page {}: {} blocks, {} text runs",
            page,
            record.blocks.len(),
            record.text_runs.len()
        );
        Ok(record)
    }

    fn cluster_fragments<S: ContentSource + ?Sized>(
        &self,
        source: &S,
        page: u32,
        (width, height): (f64, f64),
        fragments: &[LayoutFragment],
        config: ClusteringConfig,
    ) -> Result<Vec<LayoutFragment>> {
        let rects: Vec<Rect> = fragments.iter().map(|f| f.rect).collect();
        let regions = RegionClusterer::new(Tolerance::new(config.x_tolerance, config.y_tolerance))
            .with_clip(Rect::new(0.0, 0.0, width, height))
            .cluster(&rects);
        log::debug!(
            "Page {}: {} fragments clustered into {} regions",
            page,
            rects.len(),
            regions.len()
        );

        BlockAssembler::new(source, page, self.options.query).assemble_all(&regions)
    }
}

/// Drives the page loop over a whole document.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    builder: PageModelBuilder,
}

impl DocumentExtractor {
    /// Create an extractor, rejecting invalid options.
    pub fn new(options: ExtractOptions) -> Result<Self> {
        Ok(Self {
            builder: PageModelBuilder::new(options)?,
        })
    }

    /// The page builder used for every page.
    pub fn builder(&self) -> &PageModelBuilder {
        &self.builder
    }

    /// Extract the selected pages one after another.
    pub fn extract<S: ContentSource + ?Sized>(&self, source: &S) -> Result<DocumentRecord> {
        let page_count = source.page_count();
        let plan = self.builder.options.page_plan(page_count);
        log::debug!("Extracting {} of {} pages", plan.len(), page_count);

        let mut doc = DocumentRecord::new(page_count);
        for page in plan {
            let result = self.builder.build_page(source, page);
            self.collect(&mut doc, page, result)?;
        }
        Ok(doc)
    }

    /// Extract the selected pages in parallel.
    ///
    /// `open` is called once per rayon worker to obtain that worker's own
    /// content source. Pages keep document order in the result.
    pub fn extract_parallel<S, F>(&self, open: F) -> Result<DocumentRecord>
    where
        S: ContentSource,
        F: Fn() -> Result<S> + Sync + Send,
    {
        let page_count = open()?.page_count();
        let plan = self.builder.options.page_plan(page_count);
        log::debug!(
            "Extracting {} of {} pages in parallel",
            plan.len(),
            page_count
        );

        let results: Vec<(u32, Result<PageRecord>)> = plan
            .into_par_iter()
            .map_init(&open, |source, page| {
                let result = match source {
                    Ok(source) => self.builder.build_page(&*source, page),
                    Err(e) => Err(Error::content_source(page, e.to_string())),
                };
                (page, result)
            })
            .collect();

        let mut doc = DocumentRecord::new(page_count);
        for (page, result) in results {
            self.collect(&mut doc, page, result)?;
        }
        Ok(doc)
    }

    fn collect(
        &self,
        doc: &mut DocumentRecord,
        page: u32,
        result: Result<PageRecord>,
    ) -> Result<()> {
        match result {
            Ok(record) => doc.add_page(record),
            Err(e) => {
                if self.builder.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Skipping page {}: {}", page, e);
                doc.failures.push(PageFailure {
                    page_number: page,
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Span};
    use crate::source::{DumpPage, ImageRegion, LayoutDump, LayoutQuery};

    fn r(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    fn line(text: &str, bbox: Rect) -> Line {
        Line::new(
            bbox,
            vec![Span::new(text, bbox)
                .with_font("Helvetica", 11.0)
                .with_flags(16)],
        )
    }

    fn paragraph_page() -> DumpPage {
        DumpPage::new(612.0, 792.0)
            .with_fragment(LayoutFragment::text(
                r(72.0, 72.0, 300.0, 84.0),
                vec![line("First line", r(72.0, 72.0, 300.0, 84.0))],
            ))
            .with_fragment(LayoutFragment::text(
                r(72.0, 86.0, 280.0, 98.0),
                vec![line("Second line", r(72.0, 86.0, 280.0, 98.0))],
            ))
            .with_fragment(LayoutFragment::image(r(72.0, 100.0, 200.0, 200.0)))
            .with_fragment(LayoutFragment::text(
                r(72.0, 300.0, 300.0, 312.0),
                vec![line("Far away", r(72.0, 300.0, 300.0, 312.0))],
            ))
            .with_image(ImageRegion::new(r(72.0, 100.0, 200.0, 200.0), 640, 480))
    }

    /// Fails every query for one page.
    struct FailingSource {
        inner: LayoutDump,
        failing_page: u32,
    }

    impl FailingSource {
        fn check(&self, page: u32) -> Result<()> {
            if page == self.failing_page {
                return Err(Error::content_source(page, "layout unavailable"));
            }
            Ok(())
        }
    }

    impl ContentSource for FailingSource {
        fn page_count(&self) -> u32 {
            self.inner.page_count()
        }

        fn page_size(&self, page: u32) -> Result<(f64, f64)> {
            self.inner.page_size(page)
        }

        fn layout(&self, page: u32, query: &LayoutQuery) -> Result<Vec<LayoutFragment>> {
            self.check(page)?;
            self.inner.layout(page, query)
        }

        fn layout_in(
            &self,
            page: u32,
            clip: &Rect,
            query: &LayoutQuery,
        ) -> Result<Vec<LayoutFragment>> {
            self.check(page)?;
            self.inner.layout_in(page, clip, query)
        }

        fn image_regions(&self, page: u32) -> Result<Vec<ImageRegion>> {
            self.inner.image_regions(page)
        }
    }

    fn failing(pages: u32, failing_page: u32) -> FailingSource {
        FailingSource {
            inner: LayoutDump::new((0..pages).map(|_| paragraph_page()).collect()),
            failing_page,
        }
    }

    #[test]
    fn test_unclustered_block_per_fragment() {
        let dump = LayoutDump::new(vec![paragraph_page()]);
        let builder = PageModelBuilder::default();
        let page = builder.build_page(&dump, 1).unwrap();

        assert_eq!(page.page_number, 1);
        assert_eq!(page.dimensions(), (612.0, 792.0));
        assert_eq!(page.clustering, None);
        let texts: Vec<&str> = page.blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["First line", "Second line", "Far away"]);
        let numbers: Vec<usize> = page.blocks.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
    }

    #[test]
    fn test_images_mapped() {
        let dump = LayoutDump::new(vec![paragraph_page()]);
        let page = PageModelBuilder::default().build_page(&dump, 1).unwrap();
        assert_eq!(page.images.len(), 1);
        assert_eq!(page.images[0].image_width, 640);
        assert_eq!(page.images[0].image_height, 480);
        assert_eq!(page.images[0].bbox(), r(72.0, 100.0, 200.0, 200.0));
    }

    #[test]
    fn test_clustered_blocks_merge_neighbors() {
        let dump = LayoutDump::new(vec![paragraph_page()]);
        let options = ExtractOptions::new().clustered(0.0, 3.0);
        let page = PageModelBuilder::new(options)
            .unwrap()
            .build_page(&dump, 1)
            .unwrap();

        assert_eq!(page.clustering, Some(ClusteringConfig::new(0.0, 3.0)));
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].text, "First line\nSecond line");
        assert_eq!(page.blocks[0].bbox, r(72.0, 72.0, 300.0, 98.0));
        assert_eq!(page.blocks[1].text, "Far away");
        assert_eq!(page.blocks[1].number, 1);
    }

    #[test]
    fn test_text_runs_use_line_box() {
        let bbox = r(10.0, 10.0, 200.0, 22.0);
        let dump = LayoutDump::new(vec![DumpPage::new(612.0, 792.0).with_fragment(
            LayoutFragment::text(
                bbox,
                vec![Line::new(
                    bbox,
                    vec![
                        Span::new("Hello ", r(10.0, 10.0, 50.0, 22.0)),
                        Span::new("", r(50.0, 10.0, 50.0, 22.0)),
                        Span::new("world", r(50.0, 10.0, 90.0, 22.0)).with_flags(16),
                    ],
                )],
            ),
        )]);
        let page = PageModelBuilder::default().build_page(&dump, 1).unwrap();

        assert_eq!(page.blocks[0].text, "Hello world");
        assert_eq!(page.text_runs.len(), 2);
        assert!(page.text_runs.iter().all(|run| run.bbox() == bbox));
        assert_eq!(page.text_runs[1].original_text, "world");
        assert_eq!(page.text_runs[1].block_number, 0);
    }

    #[test]
    fn test_empty_page() {
        let dump = LayoutDump::new(vec![DumpPage::new(612.0, 792.0)]);
        let options = ExtractOptions::new().clustered(2.0, 2.0);
        let page = PageModelBuilder::new(options)
            .unwrap()
            .build_page(&dump, 1)
            .unwrap();
        assert!(page.is_empty());
        assert!(page.text_runs.is_empty());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = ExtractOptions::new().clustered(-1.0, 0.0);
        assert!(matches!(
            PageModelBuilder::new(options),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn test_extract_respects_page_cap() {
        let dump = LayoutDump::new((0..10).map(|_| paragraph_page()).collect());
        let doc = DocumentExtractor::default().extract(&dump).unwrap();
        assert_eq!(doc.page_count, 10);
        assert_eq!(doc.pages.len(), 8);

        let extractor = DocumentExtractor::new(ExtractOptions::new().with_max_pages(None)).unwrap();
        assert_eq!(extractor.extract(&dump).unwrap().pages.len(), 10);
    }

    #[test]
    fn test_strict_mode_aborts() {
        let source = failing(3, 2);
        let result = DocumentExtractor::default().extract(&source);
        assert!(matches!(
            result,
            Err(Error::ContentSource { page: 2, .. })
        ));
    }

    #[test]
    fn test_lenient_mode_records_failures() {
        let source = failing(3, 2);
        let extractor = DocumentExtractor::new(ExtractOptions::new().lenient()).unwrap();
        let doc = extractor.extract(&source).unwrap();

        let numbers: Vec<u32> = doc.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert!(!doc.is_complete());
        assert_eq!(doc.failures[0].page_number, 2);
    }

    #[test]
    fn test_assembler_failure_propagates() {
        // Page 1 fails only when re-queried by region
        struct RegionFailure(LayoutDump);

        impl ContentSource for RegionFailure {
            fn page_count(&self) -> u32 {
                self.0.page_count()
            }
            fn page_size(&self, page: u32) -> Result<(f64, f64)> {
                self.0.page_size(page)
            }
            fn layout(&self, page: u32, query: &LayoutQuery) -> Result<Vec<LayoutFragment>> {
                self.0.layout(page, query)
            }
            fn layout_in(
                &self,
                page: u32,
                _: &Rect,
                _: &LayoutQuery,
            ) -> Result<Vec<LayoutFragment>> {
                Err(Error::content_source(page, "clip query failed"))
            }
            fn image_regions(&self, page: u32) -> Result<Vec<ImageRegion>> {
                self.0.image_regions(page)
            }
        }

        let source = RegionFailure(LayoutDump::new(vec![paragraph_page()]));
        let builder = PageModelBuilder::new(ExtractOptions::new().clustered(0.0, 0.0)).unwrap();
        assert!(builder.build_page(&source, 1).is_err());
        // Unclustered pages never issue clip queries
        assert!(PageModelBuilder::default().build_page(&source, 1).is_ok());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages = || LayoutDump::new((0..6).map(|_| paragraph_page()).collect());
        let extractor =
            DocumentExtractor::new(ExtractOptions::new().clustered(0.0, 3.0).with_parallel(true))
                .unwrap();

        let sequential = extractor.extract(&pages()).unwrap();
        let parallel = extractor.extract_parallel(|| Ok(pages())).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_parallel_lenient_keeps_order() {
        let extractor = DocumentExtractor::new(ExtractOptions::new().lenient()).unwrap();
        let doc = extractor.extract_parallel(|| Ok(failing(5, 3))).unwrap();
        let numbers: Vec<u32> = doc.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 4, 5]);
        assert_eq!(doc.failures.len(), 1);
    }
}
