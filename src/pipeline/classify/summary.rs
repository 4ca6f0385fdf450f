use std::collections::BTreeMap;

use serde::Serialize;

use super::emergency::assess_emergency;
use super::status::classify_all;
use crate::models::enums::{EmergencyLevel, Gender, ValueStatus};
use crate::reference::{category, ReferenceData};

/// At-a-glance view of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickSummary {
    pub parameter_status: BTreeMap<String, ValueStatus>,
    pub normal_count: usize,
    pub abnormal_count: usize,
    pub critical_count: usize,
    /// Out-of-range values per panel (`lipid_panel`, ..., `other`).
    pub abnormal_by_panel: BTreeMap<String, usize>,
    pub emergency_level: EmergencyLevel,
    pub insights: Vec<String>,
}

/// Counts per status plus a few short insight lines. Critical values are
/// counted both as abnormal and as critical when outside the normal range.
pub fn quick_summary(
    reference: &ReferenceData,
    values: &BTreeMap<String, f64>,
    gender: Option<Gender>,
) -> QuickSummary {
    let classifications = classify_all(reference, values, gender);
    let indicators = assess_emergency(reference, values);

    let mut normal_count = 0;
    let mut abnormal_count = 0;
    let mut critical_count = 0;
    let mut critical_messages = Vec::new();
    let mut parameter_status = BTreeMap::new();
    let mut abnormal_by_panel: BTreeMap<String, usize> = BTreeMap::new();

    for c in &classifications {
        match c.status {
            ValueStatus::Normal => normal_count += 1,
            ValueStatus::Low | ValueStatus::High => {
                abnormal_count += 1;
                *abnormal_by_panel
                    .entry(category(&c.parameter).to_string())
                    .or_default() += 1;
            }
            ValueStatus::Unknown => {}
        }
        if c.is_critical {
            critical_count += 1;
            critical_messages.push(c.message.clone());
        }
        parameter_status.insert(c.parameter.clone(), c.status);
    }

    let mut insights = Vec::new();
    if critical_count > 0 {
        insights.push(format!(
            "{critical_count} critical values detected - seek immediate medical attention"
        ));
        insights.extend(critical_messages);
    } else if abnormal_count > normal_count {
        insights.push(format!(
            "{abnormal_count} parameters outside normal range - consider medical consultation"
        ));
    } else if !classifications.is_empty() {
        insights.push("Most parameters within normal ranges".to_string());
    }
    insights.extend(
        indicators
            .urgent_consultation
            .iter()
            .map(|finding| finding.message.clone()),
    );

    QuickSummary {
        parameter_status,
        normal_count,
        abnormal_count,
        critical_count,
        abnormal_by_panel,
        emergency_level: indicators.emergency_level,
        insights,
    }
}
