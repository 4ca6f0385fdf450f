// Plausibility filter for extracted blood values.
// Applied after extraction and normalization, before classification.
// Drops values no real patient could have; these are misreads (a reference
// bound or a lab number taken as the result), not abnormal results.

use std::collections::BTreeMap;

use crate::reference::Bounds;

/// Wide bounds in canonical units. Much broader than the normal ranges and
/// wide enough that every critical value still passes.
pub static SANITY_RANGES: &[(&str, Bounds)] = &[
    ("hemoglobin", Bounds::new(5.0, 25.0)),
    ("white_blood_cells", Bounds::new(500.0, 100_000.0)),
    ("red_blood_cells", Bounds::new(2.0, 8.0)),
    ("platelets", Bounds::new(10_000.0, 1_500_000.0)),
    ("hematocrit", Bounds::new(10.0, 75.0)),
    ("glucose", Bounds::new(30.0, 500.0)),
    ("cholesterol", Bounds::new(50.0, 500.0)),
    ("hdl", Bounds::new(10.0, 150.0)),
    ("ldl", Bounds::new(10.0, 300.0)),
    ("triglycerides", Bounds::new(20.0, 1_000.0)),
    ("creatinine", Bounds::new(0.1, 15.0)),
    ("urea", Bounds::new(5.0, 150.0)),
    ("hba1c", Bounds::new(3.0, 20.0)),
    ("tsh", Bounds::new(0.1, 50.0)),
    ("vitamin_d", Bounds::new(5.0, 200.0)),
    ("vitamin_b12", Bounds::new(100.0, 2_000.0)),
];

pub fn sanity_range(parameter: &str) -> Option<Bounds> {
    SANITY_RANGES
        .iter()
        .find(|(name, _)| *name == parameter)
        .map(|(_, bounds)| *bounds)
}

/// Result of plausibility validation: surviving values + one warning per drop.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub values: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
}

/// Drop values outside their sanity range. Parameters without a sanity
/// range pass through unchecked. Never rejects the record as a whole.
pub fn validate(values: BTreeMap<String, f64>, doc_id: Option<&str>) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut kept = BTreeMap::new();

    for (parameter, value) in values {
        match sanity_range(&parameter) {
            Some(bounds) if !bounds.contains(value) => {
                tracing::debug!(parameter = %parameter, value, "Implausible value dropped");
                warnings.push(format!(
                    "Unusual value for {parameter}: {value} (expected range: {}-{})",
                    bounds.low, bounds.high
                ));
            }
            _ => {
                kept.insert(parameter, value);
            }
        }
    }

    if !warnings.is_empty() {
        let id = doc_id.unwrap_or("unknown");
        tracing::warn!(
            doc_id = %id,
            dropped = warnings.len(),
            "Implausible values dropped"
        );
    }

    ValidationResult {
        values: kept,
        warnings,
    }
}
