//! Bring extracted values into canonical form before validation:
//! canonical parameter names, canonical units, and per-microlitre counts.

use std::collections::BTreeMap;

use crate::reference::{to_canonical, unit_key};

/// Raw names seen in reports and model payloads, after lowercasing and
/// replacing spaces/dashes with underscores.
static ALIASES: &[(&str, &str)] = &[
    ("hb", "hemoglobin"),
    ("hgb", "hemoglobin"),
    ("haemoglobin", "hemoglobin"),
    ("wbc", "white_blood_cells"),
    ("wbc_count", "white_blood_cells"),
    ("tlc", "white_blood_cells"),
    ("total_wbc_count", "white_blood_cells"),
    ("total_leukocyte_count", "white_blood_cells"),
    ("white_blood_cell_count", "white_blood_cells"),
    ("leukocytes", "white_blood_cells"),
    ("rbc", "red_blood_cells"),
    ("rbc_count", "red_blood_cells"),
    ("red_blood_cell_count", "red_blood_cells"),
    ("plt", "platelets"),
    ("platelet", "platelets"),
    ("platelet_count", "platelets"),
    ("pcv", "hematocrit"),
    ("hct", "hematocrit"),
    ("haematocrit", "hematocrit"),
    ("packed_cell_volume", "hematocrit"),
    ("total_cholesterol", "cholesterol"),
    ("cholesterol_total", "cholesterol"),
    ("hdl_cholesterol", "hdl"),
    ("ldl_cholesterol", "ldl"),
    ("tg", "triglycerides"),
    ("blood_sugar", "glucose"),
    ("blood_glucose", "glucose"),
    ("fasting_glucose", "glucose"),
    ("fasting_blood_sugar", "glucose"),
    ("fbs", "glucose"),
    ("serum_creatinine", "creatinine"),
    ("bun", "urea"),
    ("blood_urea", "urea"),
    ("blood_urea_nitrogen", "urea"),
    ("hb_a1c", "hba1c"),
    ("glycated_hemoglobin", "hba1c"),
    ("vit_d", "vitamin_d"),
    ("25_oh_vitamin_d", "vitamin_d"),
    ("vit_b12", "vitamin_b12"),
    ("vitamin_b_12", "vitamin_b12"),
    ("b12", "vitamin_b12"),
];

/// Canonical identifier for a raw parameter name. Unknown names keep
/// their normalised spelling.
pub fn canonical_name(raw: &str) -> String {
    let key = raw
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

/// Count parameters some labs report per 10^3 uL. A value inside the
/// window is read as thousands; counts per uL never fall inside it.
static COUNT_SCALES: &[(&str, f64, f64)] = &[
    ("white_blood_cells", 1.0, 50.0),
    ("platelets", 10.0, 1_500.0),
];

/// Values with their printed units and ranges, keyed by parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedValues {
    pub values: BTreeMap<String, f64>,
    pub units: BTreeMap<String, String>,
    pub reference_ranges: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizationResult {
    pub extracted: ExtractedValues,
    pub warnings: Vec<String>,
}

pub fn normalize(raw: ExtractedValues) -> NormalizationResult {
    let mut warnings = Vec::new();
    let mut out = ExtractedValues::default();

    for (name, value) in raw.values {
        let canonical = canonical_name(&name);
        if out.values.contains_key(&canonical) {
            warnings.push(format!("Duplicate value for {canonical} ({name}) ignored"));
            continue;
        }
        if let Some(unit) = raw.units.get(&name) {
            out.units.insert(canonical.clone(), unit.clone());
        }
        if let Some(range) = raw.reference_ranges.get(&name) {
            out.reference_ranges.insert(canonical.clone(), range.clone());
        }
        out.values.insert(canonical, value);
    }

    let parameters: Vec<String> = out.values.keys().cloned().collect();
    for parameter in parameters {
        convert_unit(&parameter, &mut out, &mut warnings);
        rescale_count(&parameter, &mut out, &mut warnings);
    }

    NormalizationResult {
        extracted: out,
        warnings,
    }
}

fn convert_unit(parameter: &str, out: &mut ExtractedValues, warnings: &mut Vec<String>) {
    let (Some(value), Some(unit)) = (out.values.get(parameter).copied(), out.units.get(parameter))
    else {
        return;
    };
    let Some(converted) = to_canonical(parameter, value, unit) else {
        return;
    };
    let rounded = round2(converted.value);
    warnings.push(format!(
        "Converted {parameter} from {value} {unit} to {rounded} {}",
        converted.unit
    ));
    tracing::debug!(parameter, from = value, to = rounded, "Unit converted");
    out.values.insert(parameter.to_string(), rounded);
    out.units.insert(parameter.to_string(), converted.unit.to_string());
}

fn rescale_count(parameter: &str, out: &mut ExtractedValues, warnings: &mut Vec<String>) {
    let Some(value) = out.values.get(parameter).copied() else {
        return;
    };
    let Some((_, min, max)) = COUNT_SCALES.iter().find(|(p, _, _)| *p == parameter) else {
        return;
    };

    let in_lakhs = out
        .units
        .get(parameter)
        .is_some_and(|u| unit_key(u).contains("lakh"));
    let (factor, scale) = if in_lakhs {
        (100_000.0, "lakhs")
    } else if (*min..=*max).contains(&value) {
        (1_000.0, "thousands")
    } else {
        return;
    };

    let rescaled = (value * factor).round();
    warnings.push(format!(
        "Rescaled {parameter} from {value} to {rescaled} (reported in {scale})"
    ));
    tracing::debug!(parameter, from = value, to = rescaled, "Count rescaled to per uL");
    out.values.insert(parameter.to_string(), rescaled);
    out.units.insert(parameter.to_string(), "/uL".to_string());
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(values: &[(&str, f64)], units: &[(&str, &str)]) -> ExtractedValues {
        ExtractedValues {
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            units: units
                .iter()
                .map(|(k, u)| (k.to_string(), u.to_string()))
                .collect(),
            reference_ranges: BTreeMap::new(),
        }
    }

    #[test]
    fn aliases_map_to_canonical_names() {
        assert_eq!(canonical_name("Hb"), "hemoglobin");
        assert_eq!(canonical_name("WBC"), "white_blood_cells");
        assert_eq!(canonical_name("plt"), "platelets");
        assert_eq!(canonical_name("PCV"), "hematocrit");
        assert_eq!(canonical_name("Total Cholesterol"), "cholesterol");
        assert_eq!(canonical_name("blood sugar"), "glucose");
        assert_eq!(canonical_name("Vitamin-B12"), "vitamin_b12");
    }

    #[test]
    fn unknown_names_are_kept_normalised() {
        assert_eq!(canonical_name("  Lipoprotein (a) "), "lipoprotein_(a)");
        assert_eq!(canonical_name("ferritin"), "ferritin");
    }

    #[test]
    fn renamed_keys_carry_units_and_ranges() {
        let mut raw = extracted(&[("Hb", 11.2)], &[("Hb", "g/dL")]);
        raw.reference_ranges.insert("Hb".into(), "12-15.5".into());
        let result = normalize(raw);
        assert_eq!(result.extracted.values["hemoglobin"], 11.2);
        assert_eq!(result.extracted.units["hemoglobin"], "g/dL");
        assert_eq!(result.extracted.reference_ranges["hemoglobin"], "12-15.5");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_after_aliasing_keeps_first() {
        let result = normalize(extracted(&[("hb", 11.0), ("hemoglobin", 12.0)], &[]));
        assert_eq!(result.extracted.values["hemoglobin"], 11.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn mmol_glucose_is_converted() {
        let result = normalize(extracted(&[("glucose", 5.5)], &[("glucose", "mmol/L")]));
        assert_eq!(result.extracted.values["glucose"], 99.1);
        assert_eq!(result.extracted.units["glucose"], "mg/dL");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn counts_in_thousands_are_rescaled() {
        let result = normalize(extracted(
            &[("white_blood_cells", 9.1), ("platelets", 250.0)],
            &[("platelets", "10^3/uL")],
        ));
        assert_eq!(result.extracted.values["white_blood_cells"], 9100.0);
        assert_eq!(result.extracted.values["platelets"], 250_000.0);
        assert_eq!(result.extracted.units["platelets"], "/uL");
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn platelets_in_lakhs_are_rescaled() {
        let result = normalize(extracted(&[("platelets", 1.5)], &[("platelets", "lakhs/cumm")]));
        assert_eq!(result.extracted.values["platelets"], 150_000.0);
    }

    #[test]
    fn counts_per_microlitre_are_untouched() {
        let result = normalize(extracted(&[("white_blood_cells", 7800.0), ("platelets", 150_000.0)], &[]));
        assert_eq!(result.extracted.values["white_blood_cells"], 7800.0);
        assert_eq!(result.extracted.values["platelets"], 150_000.0);
        assert!(result.warnings.is_empty());
    }
}
