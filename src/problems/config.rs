//! Analysis configuration.
//!
//! With the `serde` feature a configuration can be loaded from JSON:
//!
//! ```json
//! {
//!   "severities": { "LEAK_FIELD_DECL": "warning", "ILLEGAL_OVERRIDE": "ignore" },
//!   "ignore_api_usage_scan": false
//! }
//! ```

use super::severity::{Severity, SeverityConfig};

/// Settings for one analysis run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Severity per problem category.
    pub severities: SeverityConfig,
    /// Skip the illegal-use and leak detectors entirely.
    pub ignore_api_usage_scan: bool,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the severity table.
    pub fn with_severities(mut self, severities: SeverityConfig) -> Self {
        self.severities = severities;
        self
    }

    /// Set a single category's severity.
    pub fn with_severity(mut self, key: &'static str, severity: Severity) -> Self {
        self.severities = self.severities.with(key, severity);
        self
    }

    /// Skip API usage scanning.
    pub fn with_ignore_api_usage_scan(mut self, ignore: bool) -> Self {
        self.ignore_api_usage_scan = ignore;
        self
    }

    /// Parse a configuration from JSON. Unknown keys are rejected.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let mut severities = SeverityConfig::new();
        for (key, severity) in &raw.severities {
            severities.set(key, *severity)?;
        }
        Ok(Self {
            severities,
            ignore_api_usage_scan: raw.ignore_api_usage_scan,
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    severities: std::collections::BTreeMap<String, Severity>,
    #[serde(default)]
    ignore_api_usage_scan: bool,
}
