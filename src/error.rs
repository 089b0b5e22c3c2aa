//! Error types for analysis operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while analyzing API use.
///
/// None of these abort a whole analysis run on their own: detectors log them
/// and treat the affected reference as "not a problem".
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A component id is not part of the profile.
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// A type named by the model could not be found in its component.
    #[error("Missing type {name} in component {component}")]
    MissingType { component: String, name: String },

    /// Annotations for an element could not be resolved.
    #[error("Annotation lookup failed for {element}: {message}")]
    AnnotationLookup { element: String, message: String },

    /// The reference scanner failed for a component.
    #[error("Reference scan failed for {component}: {message}")]
    Scan { component: String, message: String },

    /// Configuration is invalid (e.g. unknown severity key).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error while loading configuration.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Create an unknown component error.
    pub fn unknown_component(id: impl Into<String>) -> Self {
        Self::UnknownComponent(id.into())
    }

    /// Create a missing type error.
    pub fn missing_type(component: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingType {
            component: component.into(),
            name: name.into(),
        }
    }

    /// Create an annotation lookup error.
    pub fn annotation_lookup(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AnnotationLookup {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create a scan error.
    pub fn scan(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Scan {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
