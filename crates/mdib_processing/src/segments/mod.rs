//! Built-in preprocessing segments.

mod duplicate_detector;
mod kind_consistency;

pub use duplicate_detector::DuplicateDetector;
pub use kind_consistency::KindConsistencyChecker;
