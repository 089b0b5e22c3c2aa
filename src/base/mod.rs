//! Foundation types for the analyzer.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`names`] - Qualified type name helpers (`com.x.Outer$Inner`)
//! - [`signatures`] - Method descriptor parsing and display
//! - [`SourceLocator`], [`SourceMap`] - Source positions for problems
//! - [`ProgressMonitor`] - Progress reporting and cancellation
//!
//! This module has NO dependencies on other crate modules.

pub mod names;
mod progress;
pub mod signatures;
mod source;

pub use progress::{CancellableProgress, NullProgress, ProgressMonitor, SubProgress};
pub use source::{SourceElement, SourceLocator, SourceMap};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
