use std::sync::Arc;

use super::StructuringError;
use crate::pipeline::normalize::ExtractedValues;
use crate::pipeline::types::PatientInfo;

/// Text-generation service abstraction (allows mocking).
pub trait LlmClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, StructuringError>;

    fn list_models(&self) -> Result<Vec<String>, StructuringError>;
}

/// A shared client is still a client.
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, StructuringError> {
        (**self).generate(model, prompt, system)
    }

    fn list_models(&self) -> Result<Vec<String>, StructuringError> {
        (**self).list_models()
    }
}

/// What the model path yields once its response parses.
/// Names and units are as the model wrote them; normalization comes later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelExtraction {
    pub extracted: ExtractedValues,
    pub patient_info: PatientInfo,
    /// One line per payload entry that could not be used.
    pub warnings: Vec<String>,
}
