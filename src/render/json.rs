//! JSON rendering for extracted records.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{DocumentRecord, PageRecord};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document record to JSON.
pub fn to_json(doc: &DocumentRecord, format: JsonFormat) -> Result<String> {
    serialize(doc, format)
}

/// Convert the list of page records to JSON, without the document envelope.
pub fn pages_to_json(pages: &[PageRecord], format: JsonFormat) -> Result<String> {
    serialize(pages, format)
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
