//! Severity levels and the per-category severity table.

use rustc_hash::FxHashMap;

use crate::error::{AnalysisError, Result};

/// How a problem category is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    #[default]
    Error,
    Warning,
    /// The category is not reported at all.
    Ignore,
}

impl Severity {
    pub fn is_ignore(self) -> bool {
        self == Severity::Ignore
    }
}

/// Severity keys, one per problem category.
pub mod keys {
    pub const ILLEGAL_EXTEND: &str = "ILLEGAL_EXTEND";
    pub const ILLEGAL_IMPLEMENT: &str = "ILLEGAL_IMPLEMENT";
    pub const ILLEGAL_INSTANTIATE: &str = "ILLEGAL_INSTANTIATE";
    pub const ILLEGAL_REFERENCE: &str = "ILLEGAL_REFERENCE";
    pub const ILLEGAL_OVERRIDE: &str = "ILLEGAL_OVERRIDE";
    pub const LEAK_EXTEND: &str = "LEAK_EXTEND";
    pub const LEAK_IMPLEMENT: &str = "LEAK_IMPLEMENT";
    pub const LEAK_FIELD_DECL: &str = "LEAK_FIELD_DECL";
    pub const LEAK_METHOD_PARAM: &str = "LEAK_METHOD_PARAM";
    pub const LEAK_METHOD_RETURN_TYPE: &str = "LEAK_METHOD_RETURN_TYPE";

    /// Every known key.
    pub const ALL: [&str; 10] = [
        ILLEGAL_EXTEND,
        ILLEGAL_IMPLEMENT,
        ILLEGAL_INSTANTIATE,
        ILLEGAL_REFERENCE,
        ILLEGAL_OVERRIDE,
        LEAK_EXTEND,
        LEAK_IMPLEMENT,
        LEAK_FIELD_DECL,
        LEAK_METHOD_PARAM,
        LEAK_METHOD_RETURN_TYPE,
    ];

    /// Returns the canonical `&'static str` for a key name.
    pub fn lookup(key: &str) -> Option<&'static str> {
        ALL.iter().copied().find(|k| *k == key)
    }
}

/// Severity lookup keyed by problem category.
///
/// Keys without an explicit entry report as [`Severity::Error`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeverityConfig {
    overrides: FxHashMap<&'static str, Severity>,
}

impl SeverityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every category at the given severity.
    pub fn uniform(severity: Severity) -> Self {
        let mut config = Self::default();
        for key in keys::ALL {
            config.overrides.insert(key, severity);
        }
        config
    }

    /// The severity of a category.
    pub fn severity(&self, key: &str) -> Severity {
        self.overrides.get(key).copied().unwrap_or_default()
    }

    /// Set the severity of a category. Unknown keys are rejected.
    pub fn set(&mut self, key: &str, severity: Severity) -> Result<()> {
        let key = keys::lookup(key)
            .ok_or_else(|| AnalysisError::invalid_config(format!("unknown severity key '{key}'")))?;
        self.overrides.insert(key, severity);
        Ok(())
    }

    /// Builder-style variant of [`SeverityConfig::set`] for known keys.
    pub fn with(mut self, key: &'static str, severity: Severity) -> Self {
        self.overrides.insert(key, severity);
        self
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        self.severity(key).is_ignore()
    }
}
