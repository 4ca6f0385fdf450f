//! Blood report processing pipeline.
//!
//! Single entry point that drives one document end to end:
//! text extraction → model or pattern extraction → normalization →
//! plausibility validation. Classification runs on demand over the result.
//!
//! Uses trait-based DI for the PDF extractor and the model client so the
//! pipeline stays testable with mock implementations.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::models::enums::ExtractionMethod;
use crate::pipeline::classify::{
    assess_emergency, classify_all, quick_summary, ClassificationResult, EmergencyIndicators,
    QuickSummary,
};
use crate::pipeline::extraction::{DocumentTextExtractor, ExtractionError};
use crate::pipeline::normalize::{normalize, ExtractedValues};
use crate::pipeline::patterns::{extract_patient_info, parse_readings};
use crate::pipeline::structuring::{LlmClient, ModelExtractor, OllamaClient};
use crate::pipeline::types::{ExtractionResult, PatientInfo};
use crate::pipeline::validation::validate;
use crate::reference::ReferenceData;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Clinical annotation of an extraction result.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAssessment {
    pub classifications: Vec<ClassificationResult>,
    pub emergency: EmergencyIndicators,
    pub summary: QuickSummary,
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

/// Processes blood test reports, one document per call. Holds no
/// per-document state, so one processor can serve many documents.
pub struct BloodReportProcessor {
    config: PipelineConfig,
    reference: ReferenceData,
    text_extractor: DocumentTextExtractor,
    model: Option<ModelExtractor>,
}

impl BloodReportProcessor {
    /// Processor using a local Ollama server when the config enables the
    /// language model. A client that cannot be built leaves pattern
    /// extraction only.
    pub fn new(config: PipelineConfig) -> Self {
        let llm: Option<Box<dyn LlmClient + Send + Sync>> = if config.use_language_model {
            match OllamaClient::new(&config.ollama_url, config.llm_timeout_secs) {
                Ok(client) => Some(Box::new(client)),
                Err(e) => {
                    tracing::warn!(error = %e, "Model client unavailable, using patterns only");
                    None
                }
            }
        } else {
            None
        };
        Self::build(config, llm)
    }

    /// Processor with an injected model client (ignored when the config
    /// disables the language model).
    pub fn with_llm(config: PipelineConfig, llm: Box<dyn LlmClient + Send + Sync>) -> Self {
        let llm = config.use_language_model.then_some(llm);
        Self::build(config, llm)
    }

    /// Processor that only uses pattern extraction.
    pub fn pattern_only(config: PipelineConfig) -> Self {
        Self::build(config, None)
    }

    pub fn with_text_extractor(mut self, text_extractor: DocumentTextExtractor) -> Self {
        self.text_extractor = text_extractor;
        self
    }

    fn build(config: PipelineConfig, llm: Option<Box<dyn LlmClient + Send + Sync>>) -> Self {
        let model = llm.map(|llm| ModelExtractor::new(llm, config.model.clone()));
        Self {
            config,
            reference: ReferenceData::standard(),
            text_extractor: DocumentTextExtractor::default(),
            model,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Full pipeline from a file on disk.
    pub fn process_file(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let bytes = std::fs::read(path)?;
        self.process_bytes(&bytes)
    }

    /// Full pipeline from document bytes (PDF or plain text).
    ///
    /// Only an unreadable document is an error. Everything else, including
    /// "no values found", is a result with `success` and `warnings` set.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        let document_id = Uuid::new_v4();
        let span = tracing::info_span!("process_document", doc_id = %document_id);
        let _guard = span.enter();

        // Step 1: Document → text
        let document = self.text_extractor.extract(bytes)?;
        let mut warnings = Vec::new();
        let page_count = document.page_count();
        let pages = if page_count > self.config.max_pages {
            warnings.push(format!(
                "Document has {page_count} pages; only the first {} were processed",
                self.config.max_pages
            ));
            &document.pages[..self.config.max_pages]
        } else {
            &document.pages[..]
        };
        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::info!(page_count, text_length = text.len(), "Document text extracted");
        Ok(self.run(document_id, text, warnings))
    }

    /// Pipeline from already-extracted report text. Never fails.
    pub fn process_text(&self, text: &str) -> ExtractionResult {
        let document_id = Uuid::new_v4();
        let span = tracing::info_span!("process_document", doc_id = %document_id);
        let _guard = span.enter();
        self.run(document_id, text.to_string(), Vec::new())
    }

    /// Classify every value, assess emergency indicators and summarise.
    /// Recomputed from the result's values on every call.
    pub fn assess(&self, result: &ExtractionResult) -> ReportAssessment {
        let gender = result.patient_info.gender;
        ReportAssessment {
            classifications: classify_all(&self.reference, &result.blood_values, gender),
            emergency: assess_emergency(&self.reference, &result.blood_values),
            summary: quick_summary(&self.reference, &result.blood_values, gender),
        }
    }

    fn run(&self, document_id: Uuid, mut text: String, mut warnings: Vec<String>) -> ExtractionResult {
        let doc_id = document_id.to_string();

        // Step 2: Bound the input
        if let Some((cut, _)) = text.char_indices().nth(self.config.max_text_length) {
            text.truncate(cut);
            warnings.push(format!(
                "Text truncated to the first {} characters",
                self.config.max_text_length
            ));
        }
        let raw_text_preview = preview(&text, self.config.preview_chars);

        if text.trim().is_empty() {
            tracing::warn!(doc_id = %doc_id, "No readable text in document");
            warnings.push("No readable text found".to_string());
            warnings.push("PDF appears to be empty or contains only images".to_string());
            return ExtractionResult {
                document_id,
                blood_values: BTreeMap::new(),
                patient_info: PatientInfo::default(),
                units: BTreeMap::new(),
                reference_ranges: BTreeMap::new(),
                warnings,
                success: false,
                method: ExtractionMethod::Pattern,
                raw_text_preview,
            };
        }

        // Step 3: Model extraction, or patterns (total fallback on any model failure)
        let (raw, patient_info, method) = match &self.model {
            Some(model) => match model.extract(&text, &doc_id) {
                Ok(extraction) => {
                    warnings.extend(extraction.warnings);
                    (
                        extraction.extracted,
                        extraction.patient_info,
                        ExtractionMethod::LanguageModel,
                    )
                }
                Err(e) => {
                    tracing::warn!(
                        doc_id = %doc_id,
                        error = %e,
                        "Model extraction failed, falling back to pattern extraction"
                    );
                    warnings.push(format!(
                        "Language model extraction failed ({e}); used pattern extraction"
                    ));
                    let (raw, info) = pattern_extract(&text);
                    (raw, info, ExtractionMethod::PatternFallback)
                }
            },
            None => {
                let (raw, info) = pattern_extract(&text);
                (raw, info, ExtractionMethod::Pattern)
            }
        };

        // Step 4: Canonical names, units and count scales
        let normalized = normalize(raw);
        warnings.extend(normalized.warnings);
        let ExtractedValues {
            values,
            mut units,
            mut reference_ranges,
        } = normalized.extracted;

        // Step 5: Plausibility
        let validated = validate(values, Some(&doc_id));
        warnings.extend(validated.warnings);
        let blood_values = validated.values;
        units.retain(|k, _| blood_values.contains_key(k));
        reference_ranges.retain(|k, _| blood_values.contains_key(k));

        let success = !blood_values.is_empty();
        if !success {
            warnings.push("No blood values could be extracted from the document".to_string());
        }

        tracing::info!(
            doc_id = %doc_id,
            method = %method,
            value_count = blood_values.len(),
            warning_count = warnings.len(),
            success,
            "Document processed"
        );

        ExtractionResult {
            document_id,
            blood_values,
            patient_info,
            units,
            reference_ranges,
            warnings,
            success,
            method,
            raw_text_preview,
        }
    }
}

/// Values and patient details re-derived from text alone.
fn pattern_extract(text: &str) -> (ExtractedValues, PatientInfo) {
    let mut extracted = ExtractedValues::default();
    for reading in parse_readings(text) {
        if let Some(unit) = reading.unit {
            extracted.units.insert(reading.name.clone(), unit);
        }
        extracted.values.insert(reading.name, reading.value);
    }
    (extracted, extract_patient_info(text))
}

/// First `max_chars` characters, with `...` when cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{EmergencyLevel, Gender};
    use crate::pipeline::extraction::{PageExtraction, PdfExtractor};
    use crate::pipeline::structuring::{FailingLlmClient, MockLlmClient, StructuringError};

    const REPORT: &str = "\
Patient Name: Jane Doe
Age: 34 Years    Sex: Female
Hemoglobin (Hb)      11.2   g/dL
Platelet Count       150000 /cumm
Total WBC Count      7,800  /cumm
";

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    struct MockPdfExtractor {
        pages: Vec<String>,
    }

    impl PdfExtractor for MockPdfExtractor {
        fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
            Ok(self
                .pages
                .iter()
                .enumerate()
                .map(|(i, text)| PageExtraction {
                    page_number: i + 1,
                    text: text.clone(),
                })
                .collect())
        }
    }

    fn with_pdf_pages(processor: BloodReportProcessor, pages: Vec<String>) -> BloodReportProcessor {
        processor.with_text_extractor(DocumentTextExtractor::new(Box::new(MockPdfExtractor {
            pages,
        })))
    }

    #[test]
    fn pattern_only_pipeline() {
        let result = BloodReportProcessor::pattern_only(config()).process_text(REPORT);
        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::Pattern);
        assert_eq!(result.blood_values["hemoglobin"], 11.2);
        assert_eq!(result.blood_values["platelets"], 150_000.0);
        assert_eq!(result.blood_values["white_blood_cells"], 7800.0);
        assert_eq!(result.units["hemoglobin"], "g/dL");
        assert_eq!(result.patient_info.gender, Some(Gender::Female));
        assert_eq!(result.patient_info.age, Some(34));
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn model_result_is_used_when_it_parses() {
        let llm = MockLlmClient::new(
            "Here is the data: ```json\n{\"blood_values\":{\"Hb\":12.1,\"PLT\":\"210\"},\"patient_info\":{\"gender\":\"male\"},\"units\":{\"PLT\":\"10^3/uL\"}}\n```",
        );
        let processor = BloodReportProcessor::with_llm(config(), Box::new(llm));
        let result = processor.process_text(REPORT);

        assert_eq!(result.method, ExtractionMethod::LanguageModel);
        assert_eq!(result.blood_values["hemoglobin"], 12.1);
        assert_eq!(result.blood_values["platelets"], 210_000.0);
        assert_eq!(result.units["platelets"], "/uL");
        assert_eq!(result.patient_info.gender, Some(Gender::Male));
        // Nothing from the text leaks into a successful model result.
        assert!(!result.blood_values.contains_key("white_blood_cells"));
        assert_eq!(result.patient_info.name, None);
    }

    #[test]
    fn unparseable_model_answer_falls_back_to_patterns_in_full() {
        let llm = MockLlmClient::new("I am unable to help with that request.");
        let processor = BloodReportProcessor::with_llm(config(), Box::new(llm));
        let result = processor.process_text(REPORT);

        assert_eq!(result.method, ExtractionMethod::PatternFallback);
        assert!(result.success);
        assert_eq!(result.blood_values["hemoglobin"], 11.2);
        assert_eq!(result.patient_info.name.as_deref(), Some("Jane Doe"));
        assert!(result.warnings[0].starts_with("Language model extraction failed"));
    }

    #[test]
    fn unreachable_model_server_falls_back() {
        let processor =
            BloodReportProcessor::with_llm(config(), Box::new(FailingLlmClient::unreachable()));
        let result = processor.process_text(REPORT);
        assert_eq!(result.method, ExtractionMethod::PatternFallback);
        assert_eq!(result.blood_values.len(), 3);
    }

    #[test]
    fn model_timeout_falls_back() {
        let processor = BloodReportProcessor::with_llm(
            config(),
            Box::new(FailingLlmClient::new(StructuringError::Timeout(30))),
        );
        let result = processor.process_text(REPORT);
        assert_eq!(result.method, ExtractionMethod::PatternFallback);
        assert!(result.warnings[0].contains("timed out after 30s"));
    }

    #[test]
    fn disabled_model_is_never_called() {
        let config = PipelineConfig {
            use_language_model: false,
            ..config()
        };
        let processor = BloodReportProcessor::with_llm(config, Box::new(FailingLlmClient::unreachable()));
        assert_eq!(processor.process_text(REPORT).method, ExtractionMethod::Pattern);
    }

    #[test]
    fn implausible_value_is_dropped_but_record_survives() {
        let text = "Hemoglobin 150 g/dL\nPlatelet Count 250000";
        let result = BloodReportProcessor::pattern_only(config()).process_text(text);
        assert!(result.success);
        assert!(!result.blood_values.contains_key("hemoglobin"));
        assert!(!result.units.contains_key("hemoglobin"));
        assert_eq!(
            result.warnings,
            vec!["Unusual value for hemoglobin: 150 (expected range: 5-25)".to_string()]
        );
    }

    #[test]
    fn nothing_found_is_an_unsuccessful_result_not_an_error() {
        let result = BloodReportProcessor::pattern_only(config())
            .process_text("Thank you for visiting. Results will be mailed.");
        assert!(!result.success);
        assert!(result.blood_values.is_empty());
        assert_eq!(
            result.warnings,
            vec!["No blood values could be extracted from the document".to_string()]
        );
    }

    #[test]
    fn image_only_pdf_reports_no_readable_text() {
        let processor = with_pdf_pages(
            BloodReportProcessor::pattern_only(config()),
            vec!["".into(), "  \n".into()],
        );
        let result = processor.process_bytes(b"%PDF-1.4").unwrap();
        assert!(!result.success);
        assert_eq!(
            result.warnings,
            vec![
                "No readable text found".to_string(),
                "PDF appears to be empty or contains only images".to_string(),
            ]
        );
    }

    #[test]
    fn unreadable_document_is_an_error() {
        let processor = BloodReportProcessor::pattern_only(config());
        assert!(matches!(
            processor.process_bytes(&[0x00, 0xFF, 0x00]),
            Err(ExtractionError::UnsupportedFormat)
        ));
        assert!(matches!(
            processor.process_bytes(b"%PDF-1.4 garbage"),
            Err(ExtractionError::DocumentRead(_))
        ));
    }

    #[test]
    fn pages_beyond_limit_are_ignored() {
        let config = PipelineConfig {
            max_pages: 1,
            ..config()
        };
        let processor = with_pdf_pages(
            BloodReportProcessor::pattern_only(config),
            vec!["Hemoglobin (Hb) 13.1".into(), "Platelet Count 250000".into()],
        );
        let result = processor.process_bytes(b"%PDF-1.4").unwrap();
        assert!(result.blood_values.contains_key("hemoglobin"));
        assert!(!result.blood_values.contains_key("platelets"));
        assert!(result.warnings[0].contains("only the first 1 were processed"));
    }

    #[test]
    fn long_text_is_truncated_on_char_boundary() {
        let config = PipelineConfig {
            max_text_length: 25,
            ..config()
        };
        let text = "Hémoglobine (Hb) 13.1 g/dL\nPlatelet Count 250000";
        let result = BloodReportProcessor::pattern_only(config).process_text(text);
        assert!(!result.blood_values.contains_key("platelets"));
        assert!(result.warnings[0].starts_with("Text truncated"));
    }

    #[test]
    fn preview_is_cut_with_ellipsis() {
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
        assert_eq!(preview("ééé", 2), "éé...");
    }

    #[test]
    fn each_document_gets_its_own_id() {
        let processor = BloodReportProcessor::pattern_only(config());
        let a = processor.process_text(REPORT);
        let b = processor.process_text(REPORT);
        assert_ne!(a.document_id, b.document_id);
        assert_eq!(a.blood_values, b.blood_values);
    }

    #[test]
    fn assessment_flags_borderline_platelets() {
        let processor = BloodReportProcessor::pattern_only(config());
        let result = processor.process_text("Platelet Count 150000");
        let assessment = processor.assess(&result);
        assert_eq!(assessment.emergency.emergency_level, EmergencyLevel::Urgent);
        assert!(assessment.emergency.critical_values.is_empty());
        assert_eq!(assessment.summary.normal_count, 1);
    }
}
