use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Text recovered from a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
}

/// PDF text extraction abstraction
pub trait PdfExtractor {
    /// Per-page text in page order. A PDF that parses but has no text
    /// layer yields pages with empty text, not an error.
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;
}
