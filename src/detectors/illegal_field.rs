//! Accessing a field marked no-reference.

use std::rc::Rc;
use std::sync::Arc;

use text_size::TextRange;

use super::registry::{IllegalMembers, IllegalTypes};
use super::{DetectionContext, ProblemDetector, support};
use crate::base::SourceLocator;
use crate::error::Result;
use crate::model::ApiField;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

#[derive(Debug, Default)]
pub struct IllegalFieldReferenceDetector {
    fields: IllegalMembers,
    types: IllegalTypes,
    retained: Vec<Rc<Reference>>,
}

impl IllegalFieldReferenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a no-reference field owned by `component`.
    pub fn add_illegal_field(&mut self, type_name: &str, name: &str, component: Arc<str>) {
        self.fields.add(type_name, name, "", component);
    }

    /// Register a no-reference type whose fields may not be referenced.
    pub fn add_illegal_type(&mut self, type_name: Arc<str>, component: Arc<str>) {
        self.types.add(type_name, component);
    }

    pub fn registry(&self) -> &IllegalMembers {
        &self.fields
    }

    fn registered_owner(&self, type_name: &str, name: &str) -> Option<&Arc<str>> {
        self.fields
            .owner(type_name, name, "")
            .or_else(|| self.types.owner_of_nested(type_name))
    }

    fn resolved_field(reference: &Reference) -> Option<&Arc<ApiField>> {
        reference.resolved().and_then(|m| m.as_field())
    }

    fn declaring_type_name(reference: &Reference) -> &str {
        match Self::resolved_field(reference) {
            Some(field) => &*field.enclosing_type,
            None => &**reference.referenced_type_name(),
        }
    }

    fn field_name(reference: &Reference) -> String {
        reference
            .referenced_member_name()
            .map_or_else(String::new, |n| n.to_string())
    }
}

impl ProblemDetector for IllegalFieldReferenceDetector {
    fn name(&self) -> &'static str {
        "illegal-field-reference"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::FIELD_ACCESS
    }

    fn accepts(&mut self, _ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        reference
            .referenced_member_name()
            .is_some_and(|name| {
                self.registered_owner(reference.referenced_type_name(), name)
                    .is_some()
            })
    }

    fn retain(&mut self, reference: Rc<Reference>) {
        self.retained.push(reference);
    }

    fn retained_references(&self) -> &[Rc<Reference>] {
        &self.retained
    }

    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        let Some(field) = Self::resolved_field(reference) else {
            return false;
        };
        let owner = self
            .registered_owner(&field.enclosing_type, &field.name)
            .or_else(|| self.registered_owner(reference.referenced_type_name(), &field.name));
        owner.is_some_and(|owner| support::is_illegal_use(ctx.profile, reference, owner))
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::IllegalReference
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Field
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, _reference: &Reference) -> ProblemFlags {
        ProblemFlags::FIELD
    }

    fn severity_key(&self) -> &'static str {
        keys::ILLEGAL_REFERENCE
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        Ok(vec![
            support::display_type(Self::declaring_type_name(reference), false),
            Self::field_name(reference),
            support::simple_type_name(ctx.profile, reference.member())?,
        ])
    }

    fn qualified_message_args(
        &self,
        ctx: &DetectionContext<'_>,
        reference: &Reference,
    ) -> Result<Vec<String>> {
        Ok(vec![
            support::display_type(Self::declaring_type_name(reference), true),
            Self::field_name(reference),
            support::qualified_type_name(ctx.profile, reference.member())?,
        ])
    }

    fn source_range(
        &self,
        ctx: &DetectionContext<'_>,
        locator: &dyn SourceLocator,
        reference: &Reference,
    ) -> Option<TextRange> {
        let name = Self::field_name(reference);
        support::locate_occurrence(ctx.profile, locator, reference, &name)
    }
}
