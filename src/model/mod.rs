//! Page model types for extracted layout.
//!
//! Raw primitives ([`LayoutFragment`], [`Line`], [`Span`]) come from a
//! content source. The builder turns them into the output records
//! ([`PageRecord`], [`Block`], [`TextRunModel`], [`ImageModel`]), which
//! serialize to the JSON shape consumers expect.

mod block;
mod document;
mod fragment;
mod page;
mod text_run;

pub use block::Block;
pub use document::{DocumentRecord, PageFailure};
pub use fragment::{FragmentKind, LayoutFragment, Line, Span, SpanFlags};
pub use page::{ClusteringConfig, PageRecord};
pub use text_run::{ImageModel, TextRunModel};
