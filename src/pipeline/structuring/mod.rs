pub mod extractor;
pub mod ollama;
pub mod parser;
pub mod prompt;
pub mod types;

pub use extractor::*;
pub use ollama::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuringError {
    #[error("Ollama is not running at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("No preferred extraction model is installed")]
    NoModelAvailable,

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model request timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl StructuringError {
    /// The model answered, but not with usable structured data.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            StructuringError::MalformedResponse(_)
                | StructuringError::JsonParsing(_)
                | StructuringError::ResponseParsing(_)
        )
    }
}
