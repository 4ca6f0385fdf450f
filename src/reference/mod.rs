//! Reference Data Store.
//!
//! Static, read-only tables of normal ranges, critical thresholds, unit
//! conversions and descriptive metadata for blood parameters. Built once
//! into a [`ReferenceData`] value that every pipeline component borrows.

pub mod critical;
pub mod info;
pub mod ranges;
pub mod units;

pub use critical::*;
pub use info::*;
pub use ranges::*;
pub use units::*;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::enums::Gender;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("No normal range defined for {0}")]
    UnknownParameter(String),
}

/// Indexed view over the static reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    ranges: HashMap<&'static str, Range>,
    critical: HashMap<&'static str, CriticalThreshold>,
    info: HashMap<&'static str, &'static InfoEntry>,
}

impl ReferenceData {
    /// Reference data for the standard adult panel.
    pub fn standard() -> Self {
        Self {
            ranges: NORMAL_RANGES.iter().map(|(p, r)| (*p, *r)).collect(),
            critical: CRITICAL_THRESHOLDS.iter().map(|(p, t)| (*p, *t)).collect(),
            info: PARAMETER_INFO.iter().map(|e| (e.parameter, e)).collect(),
        }
    }

    /// Normal range for `parameter`, resolved for `gender`.
    ///
    /// Gender-specific ranges without a gender resolve to the permissive
    /// union of both ranges so ungendered input is not over-flagged.
    pub fn get_normal_range(
        &self,
        parameter: &str,
        gender: Option<Gender>,
    ) -> Result<Bounds, ReferenceError> {
        self.ranges
            .get(parameter)
            .map(|range| range.resolve(gender))
            .ok_or_else(|| ReferenceError::UnknownParameter(parameter.to_string()))
    }

    /// The stored (unresolved) range, if any.
    pub fn range(&self, parameter: &str) -> Option<&Range> {
        self.ranges.get(parameter)
    }

    pub fn has_range(&self, parameter: &str) -> bool {
        self.ranges.contains_key(parameter)
    }

    /// Critical-value check. Parameters without thresholds are never critical.
    pub fn is_critical_value(&self, parameter: &str, value: f64) -> CriticalCheck {
        match self.critical.get(parameter) {
            Some(thresholds) => thresholds.check(parameter, value),
            None => CriticalCheck::not_critical(),
        }
    }

    pub fn critical_threshold(&self, parameter: &str) -> Option<&CriticalThreshold> {
        self.critical.get(parameter)
    }

    /// Descriptive metadata. Never fails: unknown parameters get a generic descriptor.
    pub fn get_parameter_info(&self, parameter: &str) -> ParameterInfo {
        match self.info.get(parameter) {
            Some(entry) => ParameterInfo::from(*entry),
            None => ParameterInfo::generic(parameter),
        }
    }

    /// All parameters with a normal range, sorted.
    pub fn parameters(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.ranges.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gendered_range_resolves_per_gender() {
        let data = ReferenceData::standard();
        let male = data.get_normal_range("hemoglobin", Some(Gender::Male)).unwrap();
        let female = data
            .get_normal_range("hemoglobin", Some(Gender::Female))
            .unwrap();
        assert_eq!((male.low, male.high), (13.0, 17.0));
        assert_eq!((female.low, female.high), (12.0, 15.5));
    }

    #[test]
    fn ungendered_range_is_union_of_gender_ranges() {
        let data = ReferenceData::standard();
        let combined = data.get_normal_range("hemoglobin", None).unwrap();
        assert_eq!((combined.low, combined.high), (12.0, 17.0));

        for parameter in data.parameters() {
            if let Some(Range::ByGender { male, female }) = data.range(parameter) {
                let combined = data.get_normal_range(parameter, None).unwrap();
                assert_eq!(combined.low, male.low.min(female.low), "{parameter}");
                assert_eq!(combined.high, male.high.max(female.high), "{parameter}");
            }
        }
    }

    #[test]
    fn fixed_range_ignores_gender() {
        let data = ReferenceData::standard();
        let any = data.get_normal_range("platelets", None).unwrap();
        let male = data.get_normal_range("platelets", Some(Gender::Male)).unwrap();
        assert_eq!(any, male);
        assert_eq!((any.low, any.high), (150_000.0, 410_000.0));
    }

    #[test]
    fn unknown_parameter_is_an_error() {
        let data = ReferenceData::standard();
        assert_eq!(
            data.get_normal_range("unobtainium", None),
            Err(ReferenceError::UnknownParameter("unobtainium".into()))
        );
    }

    #[test]
    fn hdl_has_no_upper_limit() {
        let data = ReferenceData::standard();
        let hdl = data.get_normal_range("hdl", Some(Gender::Female)).unwrap();
        assert_eq!(hdl.low, 50.0);
        assert!(hdl.high.is_infinite());
        assert!(hdl.contains(250.0));
    }

    #[test]
    fn critical_lookup_for_unknown_parameter_is_not_critical() {
        let data = ReferenceData::standard();
        let check = data.is_critical_value("mcv", 1.0);
        assert!(!check.is_critical);
        let check = data.is_critical_value("unobtainium", -5.0);
        assert!(!check.is_critical);
    }

    #[test]
    fn info_lookup_never_fails() {
        let data = ReferenceData::standard();
        assert_eq!(data.get_parameter_info("hemoglobin").abbreviation, "Hb");
        let generic = data.get_parameter_info("vitamin_b12");
        assert_eq!(generic.full_name, "Vitamin B12");
        assert_eq!(generic.abbreviation, "VITAMIN_B12");
        assert_eq!(generic.unit, "Various");
    }
}
