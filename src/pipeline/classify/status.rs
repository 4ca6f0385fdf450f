use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::enums::{CriticalLevel, Gender, ValueStatus};
use crate::reference::{Bounds, ReferenceData};

/// Status of `value` against the normal range of `parameter`, resolved for
/// `gender`. Parameters without a range are `Unknown`.
pub fn classify(
    reference: &ReferenceData,
    value: f64,
    parameter: &str,
    gender: Option<Gender>,
) -> ValueStatus {
    match reference.get_normal_range(parameter, gender) {
        Ok(bounds) if value < bounds.low => ValueStatus::Low,
        Ok(bounds) if value > bounds.high => ValueStatus::High,
        Ok(_) => ValueStatus::Normal,
        Err(_) => ValueStatus::Unknown,
    }
}

/// Full annotation for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub parameter: String,
    pub value: f64,
    pub status: ValueStatus,
    pub is_critical: bool,
    pub critical_level: CriticalLevel,
    /// Range the status was judged against, if the parameter has one.
    pub normal_range: Option<Bounds>,
    pub message: String,
}

pub fn classify_value(
    reference: &ReferenceData,
    parameter: &str,
    value: f64,
    gender: Option<Gender>,
) -> ClassificationResult {
    let normal_range = reference.get_normal_range(parameter, gender).ok();
    let status = classify(reference, value, parameter, gender);
    let critical = reference.is_critical_value(parameter, value);

    let message = if critical.is_critical {
        critical.message
    } else {
        match (status, normal_range) {
            (ValueStatus::Unknown, _) | (_, None) => {
                format!("No reference range for {parameter}")
            }
            (status, Some(range)) => {
                format!("{parameter} {value} is {status} (normal: {range})")
            }
        }
    };

    ClassificationResult {
        parameter: parameter.to_string(),
        value,
        status,
        is_critical: critical.is_critical,
        critical_level: critical.level,
        normal_range,
        message,
    }
}

/// Classify every value. One unknown parameter never affects the others.
pub fn classify_all(
    reference: &ReferenceData,
    values: &BTreeMap<String, f64>,
    gender: Option<Gender>,
) -> Vec<ClassificationResult> {
    values
        .iter()
        .map(|(parameter, value)| classify_value(reference, parameter, *value, gender))
        .collect()
}
