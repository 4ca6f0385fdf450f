use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::enums::{CriticalLevel, EmergencyLevel};
use crate::reference::ReferenceData;

/// How an urgent rule compares the value with its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Below,
    AtOrBelow,
    Above,
}

impl Comparison {
    fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Below => value < threshold,
            Comparison::AtOrBelow => value <= threshold,
            Comparison::Above => value > threshold,
        }
    }
}

/// A named clinical rule that warrants consultation even when the value
/// is not critical, and sometimes not even outside its normal range.
#[derive(Debug, Clone, Copy)]
pub struct UrgentRule {
    pub parameter: &'static str,
    pub comparison: Comparison,
    pub threshold: f64,
    pub message: &'static str,
}

pub static URGENT_RULES: &[UrgentRule] = &[
    UrgentRule {
        parameter: "hemoglobin",
        comparison: Comparison::Below,
        threshold: 13.0,
        message: "Low hemoglobin suggests anemia - requires medical evaluation",
    },
    // Borderline counts included: 150000 sits on the lower normal bound.
    UrgentRule {
        parameter: "platelets",
        comparison: Comparison::AtOrBelow,
        threshold: 150_000.0,
        message: "Low/borderline platelets - requires monitoring and medical consultation",
    },
    UrgentRule {
        parameter: "hematocrit",
        comparison: Comparison::Above,
        threshold: 55.0,
        message: "High hematocrit - may indicate polycythemia or dehydration",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalFinding {
    pub parameter: String,
    pub value: f64,
    pub level: CriticalLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrgentFinding {
    pub parameter: String,
    pub value: f64,
    pub message: String,
}

/// Report-wide risk picture, recomputed from the values on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyIndicators {
    pub emergency_level: EmergencyLevel,
    pub critical_values: Vec<CriticalFinding>,
    pub urgent_consultation: Vec<UrgentFinding>,
}

/// Critical values make the report `Critical`; otherwise any urgent rule
/// that fires makes it `Urgent`. Rules only ever raise the level.
pub fn assess_emergency(
    reference: &ReferenceData,
    values: &BTreeMap<String, f64>,
) -> EmergencyIndicators {
    let mut level = EmergencyLevel::Normal;
    let mut critical_values = Vec::new();
    let mut urgent_consultation = Vec::new();

    for (parameter, value) in values {
        let check = reference.is_critical_value(parameter, *value);
        if check.is_critical {
            critical_values.push(CriticalFinding {
                parameter: parameter.clone(),
                value: *value,
                level: check.level,
                message: check.message,
            });
            level = EmergencyLevel::Critical;
        }
    }

    for rule in URGENT_RULES {
        let Some(value) = values.get(rule.parameter).copied() else {
            continue;
        };
        if rule.comparison.holds(value, rule.threshold) {
            urgent_consultation.push(UrgentFinding {
                parameter: rule.parameter.to_string(),
                value,
                message: rule.message.to_string(),
            });
            level = level.max(EmergencyLevel::Urgent);
        }
    }

    if level != EmergencyLevel::Normal {
        tracing::info!(
            level = %level,
            critical = critical_values.len(),
            urgent = urgent_consultation.len(),
            "Emergency indicators raised"
        );
    }

    EmergencyIndicators {
        emergency_level: level,
        critical_values,
        urgent_consultation,
    }
}

pub fn aggregate_emergency_level(
    reference: &ReferenceData,
    values: &BTreeMap<String, f64>,
) -> EmergencyLevel {
    assess_emergency(reference, values).emergency_level
}
