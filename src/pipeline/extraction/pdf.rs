use std::panic::{self, AssertUnwindSafe};

use super::types::{PageExtraction, PdfExtractor};
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        // pdf-extract panics on some malformed inputs instead of erroring.
        let page_texts = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }))
        .map_err(|_| ExtractionError::DocumentRead("PDF parser aborted on malformed input".into()))?
        .map_err(|e| ExtractionError::DocumentRead(format!("PDF parsing failed: {e}")))?;

        if page_texts.is_empty() {
            return Err(ExtractionError::DocumentRead("PDF has no pages".into()));
        }

        Ok(page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageExtraction {
                page_number: i + 1,
                text,
            })
            .collect())
    }
}
