//! A visible field whose declared type is not API.

use std::rc::Rc;

use text_size::TextRange;

use super::LeakState;
use crate::base::SourceLocator;
use crate::detectors::registry::NonApiPackages;
use crate::detectors::{DetectionContext, ProblemDetector, support};
use crate::error::Result;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

#[derive(Debug, Default)]
pub struct LeakFieldDetector {
    state: LeakState,
}

impl LeakFieldDetector {
    pub fn new(non_api_packages: Rc<NonApiPackages>) -> Self {
        Self {
            state: LeakState::new(non_api_packages),
        }
    }

    fn field_name(reference: &Reference) -> Option<String> {
        reference.member().as_field().map(|f| f.name.to_string())
    }
}

impl ProblemDetector for LeakFieldDetector {
    fn name(&self) -> &'static str {
        "leak-field"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::FIELD_DECL
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
        !super::is_protected_exempt(ctx, reference.member()) && super::is_leak(ctx, reference)
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::ApiLeak
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Field
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, _reference: &Reference) -> ProblemFlags {
        ProblemFlags::LEAK_FIELD
    }

    fn severity_key(&self) -> &'static str {
        keys::LEAK_FIELD_DECL
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        super::leak_args(ctx, reference, Self::field_name(reference), false)
    }

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        super::leak_args(ctx, reference, Self::field_name(reference), true)
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
