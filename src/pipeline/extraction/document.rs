use std::path::Path;

use serde::{Deserialize, Serialize};

use super::pdf::PdfTextExtractor;
use super::types::{PageExtraction, PdfExtractor};
use super::ExtractionError;

/// Formats we can pull text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

/// Detect the format from magic bytes (NOT file extensions).
pub fn detect_format(bytes: &[u8]) -> Result<DocumentFormat, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::DocumentRead("document is empty".into()));
    }
    if bytes.starts_with(b"%PDF") {
        return Ok(DocumentFormat::Pdf);
    }
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.contains('\0') => Ok(DocumentFormat::PlainText),
        _ => Err(ExtractionError::UnsupportedFormat),
    }
}

/// All text recovered from one document, page by page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentText {
    pub format: DocumentFormat,
    pub pages: Vec<PageExtraction>,
}

impl DocumentText {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages joined with newlines, in page order.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True when extraction ran but found no text (e.g. a scan without a text layer).
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Converts a source document into plain text.
pub struct DocumentTextExtractor {
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
}

impl DocumentTextExtractor {
    pub fn new(pdf_extractor: Box<dyn PdfExtractor + Send + Sync>) -> Self {
        Self { pdf_extractor }
    }

    pub fn extract(&self, bytes: &[u8]) -> Result<DocumentText, ExtractionError> {
        let format = detect_format(bytes)?;
        let pages = match format {
            DocumentFormat::Pdf => self.pdf_extractor.extract_text(bytes)?,
            DocumentFormat::PlainText => vec![PageExtraction {
                page_number: 1,
                text: String::from_utf8_lossy(bytes).into_owned(),
            }],
        };

        if pages.is_empty() {
            return Err(ExtractionError::DocumentRead("document has no pages".into()));
        }

        tracing::debug!(
            format = ?format,
            page_count = pages.len(),
            "Document text extracted"
        );
        Ok(DocumentText { format, pages })
    }

    pub fn extract_file(&self, path: &Path) -> Result<DocumentText, ExtractionError> {
        let bytes = std::fs::read(path)?;
        self.extract(&bytes)
    }

    /// Convenience: full text only. Empty string is a valid result.
    pub fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.extract(bytes)?.full_text())
    }
}

impl Default for DocumentTextExtractor {
    fn default() -> Self {
        Self::new(Box::new(PdfTextExtractor))
    }
}
