//! Instantiating a class marked no-instantiate.

use std::rc::Rc;
use std::sync::Arc;

use text_size::TextRange;

use super::registry::IllegalTypes;
use super::{DetectionContext, ProblemDetector, support};
use crate::base::{SourceLocator, names};
use crate::error::Result;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

#[derive(Debug, Default)]
pub struct IllegalInstantiateDetector {
    types: IllegalTypes,
    retained: Vec<Rc<Reference>>,
}

impl IllegalInstantiateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a no-instantiate type owned by `component`.
    pub fn add_illegal_type(&mut self, type_name: Arc<str>, component: Arc<str>) {
        self.types.add(type_name, component);
    }

    pub fn registry(&self) -> &IllegalTypes {
        &self.types
    }
}

impl ProblemDetector for IllegalInstantiateDetector {
    fn name(&self) -> &'static str {
        "illegal-instantiate"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::INSTANTIATE
    }

    fn accepts(&mut self, _ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        self.types.contains(reference.referenced_type_name())
    }

    fn retain(&mut self, reference: Rc<Reference>) {
        self.retained.push(reference);
    }

    fn retained_references(&self) -> &[Rc<Reference>] {
        &self.retained
    }

    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        self.types
            .owner(reference.referenced_type_name())
            .is_some_and(|owner| support::is_illegal_use(ctx.profile, reference, owner))
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::IllegalInstantiate
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Type
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, _reference: &Reference) -> ProblemFlags {
        ProblemFlags::NO_FLAGS
    }

    fn severity_key(&self) -> &'static str {
        keys::ILLEGAL_INSTANTIATE
    }

    fn message_args(&self, _ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        Ok(vec![support::display_type(reference.referenced_type_name(), false)])
    }

    fn qualified_message_args(
        &self,
        _ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        Ok(vec![support::display_type(reference.referenced_type_name(), true)])
    }

    fn source_range(
        &self,
        ctx: &DetectionContext<'_>,
        locator: &dyn SourceLocator,
        reference: &Reference,
    ) -> Option<TextRange> {
        let simple = names::simple_name(reference.referenced_type_name());
        support::locate_occurrence(ctx.profile, locator, reference, simple)
    }
}
