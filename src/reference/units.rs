/// Multiplicative conversion from a non-canonical unit into the
/// parameter's canonical unit.
#[derive(Debug, Clone, Copy)]
pub struct UnitConversion {
    pub parameter: &'static str,
    /// Normalised unit key, see [`unit_key`].
    pub unit: &'static str,
    pub factor: f64,
    pub canonical_unit: &'static str,
}

pub static UNIT_CONVERSIONS: &[UnitConversion] = &[
    UnitConversion { parameter: "glucose", unit: "mmol/l", factor: 18.0182, canonical_unit: "mg/dL" },
    UnitConversion { parameter: "cholesterol", unit: "mmol/l", factor: 38.67, canonical_unit: "mg/dL" },
    UnitConversion { parameter: "creatinine", unit: "umol/l", factor: 0.0113, canonical_unit: "mg/dL" },
    UnitConversion { parameter: "hemoglobin", unit: "g/l", factor: 0.1, canonical_unit: "g/dL" },
];

/// Lowercase, whitespace-free, with both micro signs folded to `u`.
pub fn unit_key(unit: &str) -> String {
    unit.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'µ' | 'μ' => 'u',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Converted value plus the unit it is now expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted {
    pub value: f64,
    pub unit: &'static str,
}

/// Convert `value` reported in `unit` to the canonical unit.
/// `None` when the unit is already canonical or has no known conversion.
pub fn to_canonical(parameter: &str, value: f64, unit: &str) -> Option<Converted> {
    let key = unit_key(unit);
    UNIT_CONVERSIONS
        .iter()
        .find(|c| c.parameter == parameter && c.unit == key)
        .map(|c| Converted {
            value: c.factor * value,
            unit: c.canonical_unit,
        })
}
