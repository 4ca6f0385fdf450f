pub mod document;
pub mod pdf;
pub mod types;

pub use document::*;
pub use pdf::*;
pub use types::*;

use thiserror::Error;

/// Failures that make a document unreadable. Fatal for that document only.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document could not be read: {0}")]
    DocumentRead(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
