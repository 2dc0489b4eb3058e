//! Analysis modules: value classification and post-scan summaries.

pub mod coverage_summary;
pub mod type_summary;
pub mod value_kind;

pub use coverage_summary::{summarize_coverage, CoverageSummary};
pub use type_summary::{summarize_types, TypeSummary};
pub use value_kind::{classify_value, fractional_precision, is_missing, value_width};
