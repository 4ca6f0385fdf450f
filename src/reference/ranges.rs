use serde::Serialize;

use crate::models::enums::Gender;

/// Inclusive `(low, high)` bounds. `high` is `f64::INFINITY` when the
/// parameter has no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Smallest bounds covering both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.high.is_infinite() {
            write!(f, ">= {}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// A stored normal range: one pair for everyone, or one per gender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Range {
    Fixed(Bounds),
    ByGender { male: Bounds, female: Bounds },
}

impl Range {
    pub fn resolve(&self, gender: Option<Gender>) -> Bounds {
        match (self, gender) {
            (Range::Fixed(bounds), _) => *bounds,
            (Range::ByGender { male, .. }, Some(Gender::Male)) => *male,
            (Range::ByGender { female, .. }, Some(Gender::Female)) => *female,
            (Range::ByGender { male, female }, None) => male.union(female),
        }
    }

    pub fn is_gender_specific(&self) -> bool {
        matches!(self, Range::ByGender { .. })
    }
}

const fn fixed(low: f64, high: f64) -> Range {
    Range::Fixed(Bounds::new(low, high))
}

const fn by_gender(male: (f64, f64), female: (f64, f64)) -> Range {
    Range::ByGender {
        male: Bounds::new(male.0, male.1),
        female: Bounds::new(female.0, female.1),
    }
}

const NO_LIMIT: f64 = f64::INFINITY;

/// Adult normal ranges in each parameter's canonical unit.
pub static NORMAL_RANGES: &[(&str, Range)] = &[
    // Basic blood count
    ("hemoglobin", by_gender((13.0, 17.0), (12.0, 15.5))), // g/dL
    ("white_blood_cells", fixed(4_000.0, 11_000.0)),       // /uL
    ("red_blood_cells", by_gender((4.5, 5.5), (4.0, 5.0))), // mill/cumm
    ("platelets", fixed(150_000.0, 410_000.0)),            // /uL
    ("hematocrit", by_gender((40.0, 50.0), (36.0, 46.0))), // %
    // Blood indices
    ("mcv", fixed(83.0, 101.0)),  // fL
    ("mch", fixed(27.0, 32.0)),   // pg
    ("mchc", fixed(32.5, 34.5)),  // g/dL
    ("rdw", fixed(11.6, 14.0)),   // %
    // Differential count
    ("neutrophils", fixed(50.0, 62.0)),
    ("lymphocytes", fixed(20.0, 40.0)),
    ("eosinophils", fixed(0.0, 6.0)),
    ("monocytes", fixed(0.0, 10.0)),
    ("basophils", fixed(0.0, 2.0)),
    // Metabolic panel
    ("glucose", fixed(70.0, 100.0)), // mg/dL, fasting
    ("creatinine", by_gender((0.7, 1.3), (0.6, 1.1))),
    ("urea", fixed(7.0, 20.0)),
    ("bilirubin", fixed(0.3, 1.2)),
    // Lipid panel
    ("cholesterol", fixed(0.0, 200.0)),
    ("hdl", by_gender((40.0, NO_LIMIT), (50.0, NO_LIMIT))),
    ("ldl", fixed(0.0, 100.0)),
    ("triglycerides", fixed(0.0, 150.0)),
    // Liver function
    ("alt", by_gender((10.0, 40.0), (7.0, 35.0))),
    ("ast", by_gender((10.0, 40.0), (9.0, 32.0))),
    ("alkaline_phosphatase", fixed(44.0, 147.0)),
    // Diabetes markers
    ("hba1c", fixed(4.0, 5.6)),
    ("fasting_insulin", fixed(2.6, 24.9)),
    // Thyroid function
    ("tsh", fixed(0.27, 4.20)),
    ("t3", fixed(80.0, 200.0)),
    ("t4", fixed(5.1, 14.1)),
    // Vitamins and minerals
    ("vitamin_d", fixed(20.0, 50.0)),
    ("vitamin_b12", fixed(160.0, 950.0)),
    ("folate", fixed(2.7, 17.0)),
    ("iron", by_gender((65.0, 176.0), (50.0, 170.0))),
    ("ferritin", by_gender((12.0, 300.0), (12.0, 150.0))),
    // Cardiac markers
    ("troponin", fixed(0.0, 0.04)),
    ("ck_mb", fixed(0.0, 6.3)),
    // Inflammatory markers
    ("esr", by_gender((0.0, 22.0), (0.0, 29.0))),
    ("crp", fixed(0.0, 3.0)),
    // Electrolytes
    ("sodium", fixed(136.0, 145.0)),
    ("potassium", fixed(3.5, 5.1)),
    ("chloride", fixed(98.0, 107.0)),
    ("calcium", fixed(8.5, 10.2)),
    ("magnesium", fixed(1.7, 2.2)),
    // Protein markers
    ("total_protein", fixed(6.0, 8.3)),
    ("albumin", fixed(3.5, 5.0)),
    ("globulin", fixed(2.3, 3.4)),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn all_bounds() -> Vec<(&'static str, Bounds)> {
        NORMAL_RANGES
            .iter()
            .flat_map(|(name, range)| match range {
                Range::Fixed(b) => vec![(*name, *b)],
                Range::ByGender { male, female } => vec![(*name, *male), (*name, *female)],
            })
            .collect()
    }

    #[test]
    fn every_range_has_low_at_most_high() {
        for (name, bounds) in all_bounds() {
            assert!(bounds.low <= bounds.high, "{name}: {bounds:?}");
        }
    }

    #[test]
    fn parameter_names_are_canonical_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for (name, _) in NORMAL_RANGES {
            assert!(seen.insert(*name), "duplicate range for {name}");
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "non-canonical name {name}"
            );
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let b = Bounds::new(150_000.0, 410_000.0);
        assert!(b.contains(150_000.0));
        assert!(b.contains(410_000.0));
        assert!(!b.contains(149_999.0));
    }

    #[test]
    fn display_formats_open_upper_bound() {
        assert_eq!(Bounds::new(40.0, NO_LIMIT).to_string(), ">= 40");
        assert_eq!(Bounds::new(12.0, 15.5).to_string(), "12-15.5");
    }

    #[test]
    fn resolve_by_gender() {
        let range = by_gender((13.0, 17.0), (12.0, 15.5));
        assert!(range.is_gender_specific());
        assert_eq!(range.resolve(Some(Gender::Female)), Bounds::new(12.0, 15.5));
        assert_eq!(range.resolve(None), Bounds::new(12.0, 17.0));
    }
}
