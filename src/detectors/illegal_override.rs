//! Overriding a method marked no-override (or declared in a no-extend type).

use std::rc::Rc;
use std::sync::Arc;

use text_size::TextRange;

use super::registry::IllegalMembers;
use super::{DetectionContext, ProblemDetector, support};
use crate::base::{SourceLocator, signatures};
use crate::error::Result;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

#[derive(Debug, Default)]
pub struct IllegalOverrideDetector {
    methods: IllegalMembers,
    retained: Vec<Rc<Reference>>,
}

impl IllegalOverrideDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method that may not be overridden, owned by `component`.
    pub fn add_illegal_method(&mut self, type_name: &str, name: &str, signature: &str, component: Arc<str>) {
        self.methods.add(type_name, name, signature, component);
    }

    pub fn registry(&self) -> &IllegalMembers {
        &self.methods
    }

    fn owner(&self, reference: &Reference) -> Option<&Arc<str>> {
        let name = reference.referenced_member_name()?;
        let signature = reference.referenced_signature()?;
        self.methods
            .owner(reference.referenced_type_name(), name, signature)
    }

    fn method_display(reference: &Reference, qualified: bool) -> String {
        let name = reference.referenced_member_name().map_or("", |n| &**n);
        let signature = reference.referenced_signature().map_or("", |s| &**s);
        if qualified {
            signatures::display_method_qualified(name, signature)
        } else {
            signatures::display_method(name, signature)
        }
    }
}

impl ProblemDetector for IllegalOverrideDetector {
    fn name(&self) -> &'static str {
        "illegal-override"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::OVERRIDE
    }

    fn accepts(&mut self, _ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        self.owner(reference).is_some()
    }

    fn retain(&mut self, reference: Rc<Reference>) {
        self.retained.push(reference);
    }

    fn retained_references(&self) -> &[Rc<Reference>] {
        &self.retained
    }

    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        self.owner(reference)
            .is_some_and(|owner| support::is_illegal_use(ctx.profile, reference, owner))
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::IllegalOverride
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Method
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, _reference: &Reference) -> ProblemFlags {
        ProblemFlags::NO_FLAGS
    }

    fn severity_key(&self) -> &'static str {
        keys::ILLEGAL_OVERRIDE
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        Ok(vec![
            support::display_type(reference.referenced_type_name(), false),
            Self::method_display(reference, false),
            support::simple_type_name(ctx.profile, reference.member())?,
        ])
    }

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        Ok(vec![
            support::display_type(reference.referenced_type_name(), true),
            Self::method_display(reference, true),
            support::qualified_type_name(ctx.profile, reference.member())?,
        ])
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
