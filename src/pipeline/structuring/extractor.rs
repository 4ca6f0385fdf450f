use super::ollama::select_model;
use super::parser::parse_model_response;
use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::types::{LlmClient, ModelExtraction};
use super::StructuringError;

/// Model calls per document when the answer does not parse.
const MAX_MODEL_ATTEMPTS: usize = 2;

/// Extraction through a text-generation model:
/// select model → prompt → generate → clean → parse.
pub struct ModelExtractor {
    llm: Box<dyn LlmClient + Send + Sync>,
    model: Option<String>,
}

impl ModelExtractor {
    /// `model: None` picks the first preferred model the server lists.
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, model: Option<String>) -> Self {
        Self { llm, model }
    }

    /// Run the model over `report_text`. Connection, status and timeout
    /// errors return immediately; unparseable answers are retried once.
    pub fn extract(
        &self,
        report_text: &str,
        doc_id: &str,
    ) -> Result<ModelExtraction, StructuringError> {
        let model = select_model(self.llm.as_ref(), self.model.as_deref())?;
        let prompt = build_extraction_prompt(report_text);

        let mut last_error = StructuringError::MalformedResponse("Model was not called".into());
        for attempt in 1..=MAX_MODEL_ATTEMPTS {
            let response = self
                .llm
                .generate(&model, &prompt, EXTRACTION_SYSTEM_PROMPT)?;

            match parse_model_response(&response) {
                Ok(extraction) => {
                    tracing::info!(
                        doc_id = %doc_id,
                        model = %model,
                        attempt,
                        value_count = extraction.extracted.values.len(),
                        "Model extraction succeeded"
                    );
                    return Ok(extraction);
                }
                Err(e) if e.is_parse_error() => {
                    tracing::warn!(
                        doc_id = %doc_id,
                        attempt,
                        max_attempts = MAX_MODEL_ATTEMPTS,
                        error = %e,
                        "Model response unusable"
                    );
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error)
    }
}
