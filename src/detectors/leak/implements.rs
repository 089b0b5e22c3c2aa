//! A visible type implementing a non-API interface.
//!
//! Also reports implementing a no-implement interface from a type that is
//! not itself no-implement, since clients could then implement it through
//! the subtype.

use std::rc::Rc;

use text_size::TextRange;

use super::LeakState;
use crate::base::SourceLocator;
use crate::detectors::registry::NonApiPackages;
use crate::detectors::{DetectionContext, ProblemDetector, support};
use crate::error::Result;
use crate::model::Restriction;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

#[derive(Debug, Default)]
pub struct LeakImplementsDetector {
    state: LeakState,
}

impl LeakImplementsDetector {
    pub fn new(non_api_packages: Rc<NonApiPackages>) -> Self {
        Self {
            state: LeakState::new(non_api_packages),
        }
    }

    fn exposes_restricted_interface(ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        let Some(interface) = super::resolved_type(reference) else {
            return false;
        };
        let interface_restricted = support::type_annotations(ctx.profile, interface)
            .is_some_and(|a| a.restrictions.contains(Restriction::NO_IMPLEMENT));
        if !interface_restricted {
            return false;
        }
        !support::annotations(ctx.profile, reference.member())
            .is_some_and(|a| a.restrictions.contains(Restriction::NO_IMPLEMENT))
    }
}

impl ProblemDetector for LeakImplementsDetector {
    fn name(&self) -> &'static str {
        "leak-implements"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::IMPLEMENTS
    }

    fn accepts(&mut self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        self.state.accepts(ctx, reference)
    }

    fn retain(&mut self, reference: Rc<Reference>) {
        self.state.retained.push(reference);
    }

    fn retained_references(&self) -> &[Rc<Reference>] {
        &self.state.retained
    }

    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        super::is_leak(ctx, reference) || Self::exposes_restricted_interface(ctx, reference)
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::ApiLeak
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Type
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, _reference: &Reference) -> ProblemFlags {
        ProblemFlags::LEAK_IMPLEMENTS
    }

    fn severity_key(&self) -> &'static str {
        keys::LEAK_IMPLEMENT
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        super::leak_args(ctx, reference, None, false)
    }

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        super::leak_args(ctx, reference, None, true)
    }

    fn source_range(
        &self,
        ctx: &DetectionContext<'_>,
        locator: &dyn SourceLocator,
        reference: &Reference,
    ) -> Option<TextRange> {
        support::locate_declaration(ctx.profile, locator, reference)
    }
}
