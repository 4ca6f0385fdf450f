use serde::Serialize;

use crate::models::enums::CriticalLevel;

/// Thresholds beyond which a value needs immediate attention.
/// A side left as `None` is never critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalThreshold {
    pub critically_low: Option<f64>,
    pub critically_high: Option<f64>,
}

/// Outcome of a critical-value check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalCheck {
    pub is_critical: bool,
    pub level: CriticalLevel,
    pub message: String,
}

impl CriticalCheck {
    pub fn not_critical() -> Self {
        Self {
            is_critical: false,
            level: CriticalLevel::None,
            message: String::new(),
        }
    }
}

impl CriticalThreshold {
    /// Strict comparison on both sides; the low side is checked first.
    pub fn check(&self, parameter: &str, value: f64) -> CriticalCheck {
        if self.critically_low.is_some_and(|low| value < low) {
            return CriticalCheck {
                is_critical: true,
                level: CriticalLevel::CriticallyLow,
                message: format!("Critically low {parameter}: {value}"),
            };
        }
        if self.critically_high.is_some_and(|high| value > high) {
            return CriticalCheck {
                is_critical: true,
                level: CriticalLevel::CriticallyHigh,
                message: format!("Critically high {parameter}: {value}"),
            };
        }
        CriticalCheck::not_critical()
    }
}

const fn both(low: f64, high: f64) -> CriticalThreshold {
    CriticalThreshold {
        critically_low: Some(low),
        critically_high: Some(high),
    }
}

const fn high_only(high: f64) -> CriticalThreshold {
    CriticalThreshold {
        critically_low: None,
        critically_high: Some(high),
    }
}

pub static CRITICAL_THRESHOLDS: &[(&str, CriticalThreshold)] = &[
    ("hemoglobin", both(7.0, 20.0)),
    ("white_blood_cells", both(2_000.0, 20_000.0)),
    ("platelets", both(50_000.0, 1_000_000.0)),
    ("hematocrit", both(20.0, 60.0)),
    ("glucose", both(50.0, 400.0)),
    ("creatinine", high_only(4.0)),
    ("potassium", both(2.5, 6.0)),
    ("sodium", both(125.0, 160.0)),
    ("troponin", high_only(0.04)),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold(parameter: &str) -> CriticalThreshold {
        CRITICAL_THRESHOLDS
            .iter()
            .find(|(p, _)| *p == parameter)
            .map(|(_, t)| *t)
            .unwrap()
    }

    #[test]
    fn values_strictly_inside_thresholds_are_not_critical() {
        for (parameter, t) in CRITICAL_THRESHOLDS {
            let low = t.critically_low.unwrap_or(0.0);
            let high = t.critically_high.unwrap();
            for value in [low, (low + high) / 2.0, high] {
                let check = t.check(parameter, value);
                assert!(!check.is_critical, "{parameter} = {value}");
                assert_eq!(check.level, CriticalLevel::None);
            }
        }
    }

    #[test]
    fn below_low_threshold_is_critically_low() {
        let check = threshold("hemoglobin").check("hemoglobin", 6.5);
        assert!(check.is_critical);
        assert_eq!(check.level, CriticalLevel::CriticallyLow);
        assert_eq!(check.message, "Critically low hemoglobin: 6.5");
    }

    #[test]
    fn above_high_threshold_is_critically_high() {
        let check = threshold("potassium").check("potassium", 6.5);
        assert_eq!(check.level, CriticalLevel::CriticallyHigh);
        assert!(check.message.contains("Critically high potassium"));
    }

    #[test]
    fn high_only_threshold_never_flags_low_values() {
        let check = threshold("creatinine").check("creatinine", 0.0);
        assert!(!check.is_critical);
        let check = threshold("creatinine").check("creatinine", 4.5);
        assert_eq!(check.level, CriticalLevel::CriticallyHigh);
    }

    #[test]
    fn low_check_runs_before_high_check() {
        // Degenerate thresholds where both sides trigger.
        let t = both(10.0, 5.0);
        assert_eq!(t.check("x", 7.0).level, CriticalLevel::CriticallyLow);
    }

    #[test]
    fn platelets_at_150000_are_not_critical() {
        assert!(!threshold("platelets").check("platelets", 150_000.0).is_critical);
        assert!(threshold("platelets").check("platelets", 49_999.0).is_critical);
    }
}
