//! Analyzer tests
//!
//! Profile-wide runs of the reference analyzer and the criteria-based use
//! analyzer, including cancellation and compatibility checks.

pub mod tests_reference_analyzer;
pub mod tests_use_analyzer;
