//! Document-level records.

use serde::{Deserialize, Serialize};

use super::PageRecord;

/// The extracted model of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Extracted pages in page order
    pub pages: Vec<PageRecord>,

    /// Total number of pages in the source
    pub page_count: u32,

    /// Pages skipped in lenient mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PageFailure>,
}

impl DocumentRecord {
    /// Create a new empty record.
    pub fn new(page_count: u32) -> Self {
        Self {
            pages: Vec::new(),
            page_count,
            failures: Vec::new(),
        }
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_number: u32) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Add a page record.
    pub fn add_page(&mut self, page: PageRecord) {
        self.pages.push(page);
    }

    /// Check if no page was extracted.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether every selected page succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Plain text of all pages, separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A page that failed in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Error message
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_page() {
        let mut doc = DocumentRecord::new(3);
        doc.add_page(PageRecord::new(1, 612.0, 792.0));
        doc.add_page(PageRecord::new(3, 612.0, 792.0));
        assert!(doc.get_page(3).is_some());
        assert!(doc.get_page(2).is_none());
        assert!(doc.is_complete());
    }

    #[test]
    fn test_failures_skipped_when_empty() {
        let doc = DocumentRecord::new(0);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("failures").is_none());
        assert_eq!(json["page_count"], 0);
    }
}
