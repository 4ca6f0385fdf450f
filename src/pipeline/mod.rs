pub mod classify;
pub mod extraction;
pub mod normalize;
pub mod patterns;
pub mod processor;
pub mod structuring;
pub mod types;
pub mod validation;

pub use processor::{BloodReportProcessor, ReportAssessment};
pub use types::{ExtractionResult, ParameterReading, PatientInfo};
