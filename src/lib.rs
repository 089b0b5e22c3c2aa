//! # apiguard-base
//!
//! Core library for API restriction checks and API leak detection across
//! modular components.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! analysis   → Use analyzer, reference analyzer, search engine
//!   ↓
//! detectors  → Problem detectors (illegal use + API leaks), registries
//!   ↓
//! resolve    → Reference resolver with structural deduplication
//!   ↓
//! reference  → References, reference kinds and flags
//!   ↓
//! model      → Components, types, members, API descriptions, profiles
//!   ↓
//! problems   → Problem records, severities, configuration
//!   ↓
//! base       → Names, method descriptors, source positions, progress
//! ```

// ============================================================================
// MODULES (dependency order: base → problems → model → reference → resolve → detectors → analysis)
// ============================================================================

/// Foundation types: name helpers, descriptors, source positions, progress
pub mod base;

/// Error type shared by every layer
pub mod error;

/// Problem records, severities and analysis configuration
pub mod problems;

/// Component, type and API description model
pub mod model;

/// References between members
pub mod reference;

/// Reference resolution
pub mod resolve;

/// Problem detectors
pub mod detectors;

/// Analyzers that drive scanning, resolution and detection
pub mod analysis;

// Re-export the types most callers need
pub use analysis::{
    ApiUseAnalyzer, BuildStamps, RecordedReferences, ReferenceAnalyzer, ReferenceScanner,
    SearchScope,
};
pub use base::{
    NullProgress, ProgressMonitor, SourceElement, SourceLocator, SourceMap, TextRange, TextSize,
};
pub use error::{AnalysisError, Result};
pub use model::{
    ApiAnnotations, ApiComponent, ApiDescription, ApiField, ApiMember, ApiMethod, ApiType,
    ElementDescriptor, Modifiers, Profile, Restriction, Visibility,
};
pub use problems::{
    AnalysisConfig, ApiProblem, ElementType, ProblemFlags, ProblemKind, Severity, SeverityConfig,
};
pub use reference::{Reference, ReferenceFlags, ReferenceKind, ReferenceKinds, TargetType};
pub use resolve::ReferenceResolver;
