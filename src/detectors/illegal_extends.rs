//! Extending a class marked no-extend.

use std::rc::Rc;
use std::sync::Arc;

use text_size::TextRange;

use super::registry::IllegalTypes;
use super::{DetectionContext, ProblemDetector, support};
use crate::base::{SourceLocator, names};
use crate::error::Result;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

/// Reports subclasses of restricted classes declared in other components.
#[derive(Debug, Default)]
pub struct IllegalExtendsDetector {
    types: IllegalTypes,
    retained: Vec<Rc<Reference>>,
}

impl IllegalExtendsDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a no-extend type owned by `component`.
    pub fn add_illegal_type(&mut self, type_name: Arc<str>, component: Arc<str>) {
        self.types.add(type_name, component);
    }

    pub fn registry(&self) -> &IllegalTypes {
        &self.types
    }
}

impl ProblemDetector for IllegalExtendsDetector {
    fn name(&self) -> &'static str {
        "illegal-extends"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::EXTENDS
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
        ProblemKind::IllegalExtend
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Type
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, reference: &Reference) -> ProblemFlags {
        support::type_flags(reference.member())
    }

    fn severity_key(&self) -> &'static str {
        keys::ILLEGAL_EXTEND
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        let referenced = support::display_type(reference.referenced_type_name(), false);
        if support::is_anonymous(reference.member()) {
            return Ok(vec![referenced]);
        }
        Ok(vec![
            referenced,
            support::simple_type_name(ctx.profile, reference.member())?,
        ])
    }

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        let referenced = support::display_type(reference.referenced_type_name(), true);
        if support::is_anonymous(reference.member()) {
            return Ok(vec![referenced]);
        }
        Ok(vec![
            referenced,
            support::qualified_type_name(ctx.profile, reference.member())?,
        ])
    }

    fn source_range(
        &self,
        ctx: &DetectionContext<'_>,
        locator: &dyn SourceLocator,
        reference: &Reference,
    ) -> Option<TextRange> {
        if support::type_flags(reference.member()).is_empty() {
            support::locate_declaration(ctx.profile, locator, reference)
        } else {
            let simple = names::simple_name(reference.referenced_type_name());
            support::locate_occurrence(ctx.profile, locator, reference, simple)
        }
    }
}
