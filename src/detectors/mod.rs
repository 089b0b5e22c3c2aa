//! Problem detectors.
//!
//! Every detector implements [`ProblemDetector`]. Detection runs in two
//! phases:
//!
//! 1. `consider_reference` is called for each scanned reference whose kind
//!    the detector declared. It is a cheap, pre-resolution filter; references
//!    it accepts are retained.
//! 2. After the resolver has bound the retained references,
//!    `create_problems` asks `is_problem` for each resolved reference and
//!    materializes an [`ApiProblem`] with message arguments and position.
//!
//! Unresolved references are never problems.
//!
//! ## Detectors
//!
//! - Illegal use: [`IllegalExtendsDetector`], [`IllegalImplementsDetector`],
//!   [`IllegalInstantiateDetector`], [`IllegalOverrideDetector`],
//!   [`IllegalMethodReferenceDetector`], [`IllegalFieldReferenceDetector`],
//!   [`IllegalAnnotationDetector`]
//! - API leaks: [`LeakExtendsDetector`], [`LeakImplementsDetector`],
//!   [`LeakFieldDetector`], [`LeakParameterDetector`], [`LeakReturnTypeDetector`]

use std::rc::Rc;

use text_size::TextRange;

use crate::base::SourceLocator;
use crate::error::Result;
use crate::model::Profile;
use crate::problems::{ApiProblem, ElementType, ProblemFlags, ProblemKind, Severity, SeverityConfig};
use crate::reference::{Reference, ReferenceKinds};
use crate::resolve::ReferenceResolver;

mod builder;
mod illegal_annotation;
mod illegal_extends;
mod illegal_field;
mod illegal_implements;
mod illegal_instantiate;
mod illegal_method;
mod illegal_override;
mod leak;
pub mod registry;
pub mod support;

pub use builder::ProblemDetectorBuilder;
pub use illegal_annotation::IllegalAnnotationDetector;
pub use illegal_extends::IllegalExtendsDetector;
pub use illegal_field::IllegalFieldReferenceDetector;
pub use illegal_implements::IllegalImplementsDetector;
pub use illegal_instantiate::IllegalInstantiateDetector;
pub use illegal_method::IllegalMethodReferenceDetector;
pub use illegal_override::IllegalOverrideDetector;
pub use leak::{
    LeakExtendsDetector, LeakFieldDetector, LeakImplementsDetector, LeakParameterDetector,
    LeakReturnTypeDetector,
};

// ============================================================================
// DETECTION CONTEXT
// ============================================================================

/// The profile being analyzed and a resolver over it.
#[derive(Clone, Copy, Debug)]
pub struct DetectionContext<'a> {
    pub profile: &'a Profile,
    pub resolver: ReferenceResolver<'a>,
}

impl<'a> DetectionContext<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self {
            profile,
            resolver: ReferenceResolver::new(profile),
        }
    }
}

// ============================================================================
// DETECTOR CONTRACT
// ============================================================================

/// A detector for one category of API use problem.
pub trait ProblemDetector {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The reference kinds this detector looks at.
    fn reference_kinds(&self) -> ReferenceKinds;

    /// Detector-specific pre-resolution filter.
    fn accepts(&mut self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool;

    /// Queue a reference for problem creation.
    fn retain(&mut self, reference: Rc<Reference>);

    /// References accepted so far.
    fn retained_references(&self) -> &[Rc<Reference>];

    /// Whether a retained, resolved reference is a problem.
    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool;

    fn problem_kind(&self) -> ProblemKind;

    fn element_type(&self, reference: &Reference) -> ElementType;

    fn problem_flags(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> ProblemFlags;

    /// Severity category of the problems this detector creates.
    fn severity_key(&self) -> &'static str;

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>>;

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>>;

    fn source_range(
        &self,
        ctx: &DetectionContext<'_>,
        locator: &dyn SourceLocator,
        reference: &Reference,
    ) -> Option<TextRange>;

    /// Retain the reference if it is of interest. Returns `false` for kinds
    /// outside [`ProblemDetector::reference_kinds`].
    fn consider_reference(&mut self, ctx: &DetectionContext<'_>, reference: &Rc<Reference>) -> bool {
        if !self.reference_kinds().includes(reference.kind()) {
            return false;
        }
        if !self.accepts(ctx, reference) {
            return false;
        }
        tracing::trace!(detector = self.name(), reference = %reference, "retained");
        self.retain(reference.clone());
        true
    }

    /// Create problems for every retained reference that is one.
    ///
    /// Nothing is created when the detector's category is ignored.
    fn create_problems(
        &self,
        ctx: &DetectionContext<'_>,
        locator: &dyn SourceLocator,
        severities: &SeverityConfig,
    ) -> Vec<ApiProblem> {
        let severity = severities.severity(self.severity_key());
        if severity.is_ignore() {
            return Vec::new();
        }
        let mut problems = Vec::new();
        for reference in self.retained_references() {
            if reference.resolved().is_none() {
                tracing::trace!(detector = self.name(), reference = %reference, "unresolved");
                continue;
            }
            if !self.is_problem(ctx, reference) {
                continue;
            }
            match create_problem(self, ctx, locator, reference, severity) {
                Ok(problem) => problems.push(problem),
                Err(err) => {
                    tracing::debug!(
                        detector = self.name(),
                        reference = %reference,
                        error = %err,
                        "could not create problem"
                    );
                }
            }
        }
        problems
    }
}

fn create_problem<D: ProblemDetector + ?Sized>(
    detector: &D,
    ctx: &DetectionContext<'_>,
    locator: &dyn SourceLocator,
    reference: &Reference,
    severity: Severity,
) -> Result<ApiProblem> {
    Ok(ApiProblem {
        kind: detector.problem_kind(),
        element_type: detector.element_type(reference),
        flags: detector.problem_flags(ctx, reference),
        message_args: detector.message_args(ctx, reference)?,
        qualified_message_args: detector.qualified_message_args(ctx, reference)?,
        type_name: support::type_name(ctx.profile, reference.member())?,
        line: reference.line(),
        range: detector.source_range(ctx, locator, reference),
        severity_key: detector.severity_key(),
        severity,
    })
}
