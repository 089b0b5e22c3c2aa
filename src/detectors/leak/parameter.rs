//! A visible method or constructor with a non-API parameter type.

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
pub struct LeakParameterDetector {
    state: LeakState,
}

impl LeakParameterDetector {
    pub fn new(non_api_packages: Rc<NonApiPackages>) -> Self {
        Self {
            state: LeakState::new(non_api_packages),
        }
    }
}

impl ProblemDetector for LeakParameterDetector {
    fn name(&self) -> &'static str {
        "leak-parameter"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::PARAMETER
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
        if super::is_protected_exempt(ctx, reference.member()) {
            return false;
        }
        super::is_package_default_type(reference) || super::is_leak(ctx, reference)
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::ApiLeak
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Method
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, reference: &Reference) -> ProblemFlags {
        let constructor = reference
            .member()
            .as_method()
            .is_some_and(|m| m.is_constructor());
        if constructor {
            ProblemFlags::LEAK_CONSTRUCTOR_PARAMETER
        } else {
            ProblemFlags::LEAK_METHOD_PARAMETER
        }
    }

    fn severity_key(&self) -> &'static str {
        keys::LEAK_METHOD_PARAM
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        super::leak_args(ctx, reference, super::method_detail(reference), false)
    }

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        super::leak_args(ctx, reference, super::method_detail(reference), true)
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
