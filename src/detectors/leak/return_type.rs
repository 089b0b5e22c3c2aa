//! A visible method with a non-API return type.
//!
//! A method taking a package-default parameter type cannot be called from
//! outside its package, so it is reported as well regardless of the return
//! type.

use std::rc::Rc;

use text_size::TextRange;

use super::LeakState;
use crate::base::{SourceLocator, signatures};
use crate::detectors::registry::NonApiPackages;
use crate::detectors::{DetectionContext, ProblemDetector, support};
use crate::error::Result;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

#[derive(Debug, Default)]
pub struct LeakReturnTypeDetector {
    state: LeakState,
}

impl LeakReturnTypeDetector {
    pub fn new(non_api_packages: Rc<NonApiPackages>) -> Self {
        Self {
            state: LeakState::new(non_api_packages),
        }
    }

    fn has_package_default_parameter(ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        let Some(method) = reference.member().as_method() else {
            return false;
        };
        signatures::parameter_class_names(&method.signature)
            .iter()
            .filter_map(|name| ctx.profile.find_type(&method.component, name))
            .any(|ty| ty.modifiers.is_package_default())
    }
}

impl ProblemDetector for LeakReturnTypeDetector {
    fn name(&self) -> &'static str {
        "leak-return-type"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::RETURN_TYPE
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
        Self::has_package_default_parameter(ctx, reference) || super::is_leak(ctx, reference)
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::ApiLeak
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Method
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, _reference: &Reference) -> ProblemFlags {
        ProblemFlags::LEAK_RETURN_TYPE
    }

    fn severity_key(&self) -> &'static str {
        keys::LEAK_METHOD_RETURN_TYPE
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
