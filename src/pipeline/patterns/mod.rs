//! Pattern-based extraction of blood values and patient details from
//! plain report text.

pub mod patient;
pub mod table;
pub mod values;

pub use patient::extract_patient_info;
pub use values::{parse_readings, parse_values};
