use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::ModelExtraction;
use super::StructuringError;
use crate::models::enums::Gender;
use crate::pipeline::normalize::ExtractedValues;
use crate::pipeline::types::PatientInfo;

/// Isolate the JSON object in a model response: trim, drop markdown code
/// fences, then take everything from the first `{` to the last `}`.
pub fn clean_response(response: &str) -> Result<String, StructuringError> {
    let unfenced = response.trim().replace("```json", "").replace("```", "");
    let start = unfenced.find('{');
    let end = unfenced.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(unfenced[start..=end].to_string()),
        _ => Err(StructuringError::MalformedResponse(
            "No JSON object found in model response".into(),
        )),
    }
}

/// Parse a model response into values and patient details.
///
/// Lenient per entry: nulls are skipped, numeric strings are accepted,
/// anything else is skipped with a warning. A response with no usable
/// blood value at all is an error so the caller falls back.
pub fn parse_model_response(response: &str) -> Result<ModelExtraction, StructuringError> {
    #[derive(Deserialize)]
    struct RawPayload {
        blood_values: Option<Map<String, Value>>,
        patient_info: Option<Map<String, Value>>,
        units: Option<Map<String, Value>>,
        reference_ranges: Option<Map<String, Value>>,
    }

    let json_str = clean_response(response)?;
    let raw: RawPayload = serde_json::from_str(&json_str)
        .map_err(|e| StructuringError::JsonParsing(e.to_string()))?;

    let mut warnings = Vec::new();
    let mut extracted = ExtractedValues::default();

    for (name, value) in raw.blood_values.unwrap_or_default() {
        match value_as_number(&value) {
            Some(number) => {
                extracted.values.insert(name, number);
            }
            None if value.is_null() => {}
            None => warnings.push(format!("Ignored non-numeric value for {name}: {value}")),
        }
    }
    if extracted.values.is_empty() {
        return Err(StructuringError::MalformedResponse(
            "Model response contains no blood values".into(),
        ));
    }

    extracted.units = string_map(raw.units.unwrap_or_default());
    extracted.reference_ranges = string_map(raw.reference_ranges.unwrap_or_default());
    let patient_info = parse_patient_info(&raw.patient_info.unwrap_or_default());

    Ok(ModelExtraction {
        extracted,
        patient_info,
        warnings,
    })
}

/// JSON number, or a string starting with one (`"11.2"`, `"150,000 /uL"`).
fn value_as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .split_whitespace()
            .next()
            .and_then(|token| token.replace(',', "").parse::<f64>().ok()),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Text content of a field, with the usual "nothing here" spellings removed.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match map.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let lowered = text.to_lowercase();
    if text.is_empty() || matches!(lowered.as_str(), "null" | "none" | "n/a" | "unknown") {
        None
    } else {
        Some(text)
    }
}

fn parse_patient_info(map: &Map<String, Value>) -> PatientInfo {
    let age = match map.get("age") {
        Some(Value::Number(n)) => n.as_u64().and_then(|a| u32::try_from(a).ok()),
        Some(Value::String(s)) => s
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<u32>().ok()),
        _ => None,
    };

    PatientInfo {
        name: text_field(map, "name"),
        age,
        gender: text_field(map, "gender").and_then(|g| Gender::parse_loose(&g)),
        test_date: text_field(map, "test_date"),
        patient_id: text_field(map, "patient_id"),
        lab_name: text_field(map, "lab_name"),
    }
}

fn string_map(map: Map<String, Value>) -> std::collections::BTreeMap<String, String> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) if !s.trim().is_empty() => Some((key, s.trim().to_string())),
            Value::Number(n) => Some((key, n.to_string())),
            _ => None,
        })
        .collect()
}
