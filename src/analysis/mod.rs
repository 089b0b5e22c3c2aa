//! Analyzers over a [`Profile`](crate::model::Profile).
//!
//! - [`ReferenceAnalyzer`] runs the problem detectors for a component and
//!   produces [`ApiProblem`](crate::problems::ApiProblem)s.
//! - [`ApiUseAnalyzer`] runs criteria-based searches through the
//!   [`SearchEngine`] and checks components against alternate versions of
//!   their prerequisites.
//!
//! Both read references through a [`ReferenceScanner`]; scanning compiled
//! code is left to the caller.

mod build_stamps;
mod criteria;
mod reference_analyzer;
mod scanner;
mod search;
mod use_analyzer;

pub use build_stamps::BuildStamps;
pub use criteria::{ProblemDescriptor, SearchCriteria, target_descriptor};
pub use reference_analyzer::{AnalysisReport, ReferenceAnalyzer};
pub use scanner::{RecordedReferences, ReferenceScanner, SearchScope};
pub use search::{SearchEngine, SearchResult};
pub use use_analyzer::{ApiUseAnalyzer, CompatibilityResult};
