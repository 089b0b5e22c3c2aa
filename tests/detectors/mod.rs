//! Detector tests
//!
//! Each test builds a small profile, records the references a scanner would
//! have produced and runs them through the reference analyzer:
//! - Illegal use of restricted types and members
//! - Exemptions by origin component
//! - API leaks through the API surface

pub mod tests_illegal_use;
pub mod tests_leaks;
