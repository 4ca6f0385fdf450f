//! Classification & risk: per-value status against normal ranges, critical
//! flags, and the report-wide emergency level. Best-effort annotation that
//! never fails; unknown parameters come out as `unknown`.

pub mod emergency;
pub mod status;
pub mod summary;

pub use emergency::*;
pub use status::*;
pub use summary::*;
