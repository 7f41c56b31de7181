//! Page-level records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Block, ImageModel, TextRunModel};

/// Tolerances used when clustered blocks were requested.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Horizontal neighborhood threshold
    pub x_tolerance: f64,
    /// Vertical neighborhood threshold
    pub y_tolerance: f64,
}

impl ClusteringConfig {
    pub fn new(x_tolerance: f64, y_tolerance: f64) -> Self {
        Self {
            x_tolerance,
            y_tolerance,
        }
    }
}

/// The extracted model of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Page width in points
    pub page_width: f64,

    /// Page height in points
    pub page_height: f64,

    /// One entry per emitted span
    #[serde(rename = "texts_models_list")]
    pub text_runs: Vec<TextRunModel>,

    /// Logical text blocks
    pub blocks: Vec<Block>,

    /// Image placements
    #[serde(rename = "images_models_list")]
    pub images: Vec<ImageModel>,

    /// Clustering tolerances, or `None` when raw blocks were used
    #[serde(rename = "use_clustered_blocks", with = "clustering_flag")]
    pub clustering: Option<ClusteringConfig>,
}

impl PageRecord {
    /// Create an empty record for a page.
    pub fn new(page_number: u32, page_width: f64, page_height: f64) -> Self {
        Self {
            page_number,
            page_width,
            page_height,
            text_runs: Vec::new(),
            blocks: Vec::new(),
            images: Vec::new(),
            clustering: None,
        }
    }

    /// Block texts joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|b| !b.is_empty())
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Check if the page produced no blocks and no images.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.images.is_empty()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }
}

/// `use_clustered_blocks` is `false` when clustering is off, otherwise the
/// tolerance object.
mod clustering_flag {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Flag(bool),
        Config(ClusteringConfig),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<ClusteringConfig>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(config) => Repr::Config(*config),
            None => Repr::Flag(false),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ClusteringConfig>, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => None,
            Repr::Flag(true) => Some(ClusteringConfig::default()),
            Repr::Config(config) => Some(config),
        })
    }
}
