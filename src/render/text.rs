//! Plain text rendering for extracted records.

use crate::model::DocumentRecord;

/// Block texts of every page, separated by blank lines.
pub fn to_text(doc: &DocumentRecord) -> String {
    doc.plain_text().trim().to_string()
}
