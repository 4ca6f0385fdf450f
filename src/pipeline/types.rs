use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::{ExtractionMethod, Gender};

/// One measured clinical parameter as located in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReading {
    /// Canonical identifier, e.g. `hemoglobin`.
    pub name: String,
    pub value: f64,
    /// Unit as printed in the source. Display only.
    pub unit: Option<String>,
}

/// Partial patient record. Every field is optional and absence is
/// distinct from an empty or zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_name: Option<String>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self == &PatientInfo::default()
    }

    /// Interpret the free-form test date, if it follows a common layout.
    pub fn parsed_test_date(&self) -> Option<NaiveDate> {
        self.test_date.as_deref().and_then(parse_report_date)
    }
}

/// Parse a report date: ISO, then day-first, then US month-first.
/// Two-digit years are accepted for the delimited layouts.
pub fn parse_report_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%d/%m/%y", "%d-%m-%y", "%m/%d/%y",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Output of one pipeline run over one document. Built fresh per document
/// and never mutated after it is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub document_id: Uuid,
    pub blood_values: BTreeMap<String, f64>,
    pub patient_info: PatientInfo,
    /// Units as printed in the source, keyed by parameter.
    pub units: BTreeMap<String, String>,
    /// Reference ranges as printed in the source, keyed by parameter.
    pub reference_ranges: BTreeMap<String, String>,
    pub warnings: Vec<String>,
    pub success: bool,
    pub method: ExtractionMethod,
    pub raw_text_preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_iso_and_delimited_dates() {
        assert_eq!(
            parse_report_date("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_report_date("15/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_report_date("15-03-2024"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
    }

    #[test]
    fn parse_us_date_when_day_first_is_impossible() {
        assert_eq!(
            parse_report_date("03/25/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 25)
        );
    }

    #[test]
    fn unparseable_dates_are_none() {
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("null"), None);
        assert_eq!(parse_report_date("next tuesday"), None);
    }

    #[test]
    fn absent_patient_fields_are_not_serialized() {
        let info = PatientInfo {
            age: Some(0),
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({"age": 0}));
        assert!(!info.is_empty());
        assert!(PatientInfo::default().is_empty());
    }

    #[test]
    fn parsed_test_date_uses_free_form_field() {
        let info = PatientInfo {
            test_date: Some("01/02/2025".into()),
            ..Default::default()
        };
        assert_eq!(info.parsed_test_date(), NaiveDate::from_ymd_opt(2025, 2, 1));
    }
}
