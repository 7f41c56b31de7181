//! Layout analysis: clustering, block assembly and page building.

mod assemble;
mod builder;
pub mod cluster;
mod options;

pub use assemble::BlockAssembler;
pub use builder::{DocumentExtractor, PageModelBuilder};
pub use cluster::{cluster_rects, RegionClusterer, Tolerance};
pub use options::{ErrorMode, ExtractOptions, PageSelection, DEFAULT_MAX_PAGES};
