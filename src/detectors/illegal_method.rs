//! Calling a method or constructor marked no-reference.
//!
//! Matches on the exact (type, name, signature) key, or on any type
//! enclosing the referenced type that is itself marked no-reference. Calls
//! that may dispatch to a default interface method are resolved up front and
//! matched against the declaring interface.

use std::rc::Rc;
use std::sync::Arc;

use text_size::TextRange;

use super::registry::{IllegalMembers, IllegalTypes};
use super::{DetectionContext, ProblemDetector, support};
use crate::base::{SourceLocator, names, signatures};
use crate::error::Result;
use crate::model::ApiMethod;
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceFlags, ReferenceKinds};

#[derive(Debug, Default)]
pub struct IllegalMethodReferenceDetector {
    methods: IllegalMembers,
    types: IllegalTypes,
    retained: Vec<Rc<Reference>>,
}

impl IllegalMethodReferenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a no-reference method owned by `component`.
    pub fn add_illegal_method(&mut self, type_name: &str, name: &str, signature: &str, component: Arc<str>) {
        self.methods.add(type_name, name, signature, component);
    }

    /// Register a no-reference type whose members (and nested types' members)
    /// may not be referenced.
    pub fn add_illegal_type(&mut self, type_name: Arc<str>, component: Arc<str>) {
        self.types.add(type_name, component);
    }

    pub fn registry(&self) -> &IllegalMembers {
        &self.methods
    }

    fn registered_owner(&self, type_name: &str, name: &str, signature: &str) -> Option<&Arc<str>> {
        self.methods
            .owner(type_name, name, signature)
            .or_else(|| self.types.owner_of_nested(type_name))
    }

    fn resolved_method(reference: &Reference) -> Option<&Arc<ApiMethod>> {
        reference.resolved().and_then(|m| m.as_method())
    }

    fn declaring_type_name(reference: &Reference) -> &str {
        match Self::resolved_method(reference) {
            Some(method) => &*method.enclosing_type,
            None => &**reference.referenced_type_name(),
        }
    }

    fn method_display(reference: &Reference, qualified: bool) -> String {
        let declaring = Self::declaring_type_name(reference);
        let name = reference.referenced_member_name().map_or("", |n| &**n);
        let signature = reference.referenced_signature().map_or("", |s| &**s);
        let name = if Self::is_constructor(reference) {
            names::simple_name(declaring)
        } else {
            name
        };
        if qualified {
            signatures::display_method_qualified(name, signature)
        } else {
            signatures::display_method(name, signature)
        }
    }

    fn is_constructor(reference: &Reference) -> bool {
        match Self::resolved_method(reference) {
            Some(method) => method.is_constructor(),
            None => reference
                .referenced_member_name()
                .is_some_and(|n| &**n == crate::model::CONSTRUCTOR_NAME),
        }
    }
}

impl ProblemDetector for IllegalMethodReferenceDetector {
    fn name(&self) -> &'static str {
        "illegal-method-reference"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::METHOD_CALLS
    }

    fn accepts(&mut self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        let (Some(name), Some(signature)) = (
            reference.referenced_member_name(),
            reference.referenced_signature(),
        ) else {
            return false;
        };
        if self
            .registered_owner(reference.referenced_type_name(), name, signature)
            .is_some()
        {
            return true;
        }
        if !reference.flags().contains(ReferenceFlags::DEFAULT_METHOD) {
            return false;
        }
        // Retry against the interface actually declaring the default method.
        match ctx.resolver.resolve_one(reference) {
            Some(resolved) => resolved.as_method().is_some_and(|method| {
                method.default_method
                    && self
                        .methods
                        .owner(&method.enclosing_type, &method.name, &method.signature)
                        .is_some()
            }),
            None => false,
        }
    }

    fn retain(&mut self, reference: Rc<Reference>) {
        self.retained.push(reference);
    }

    fn retained_references(&self) -> &[Rc<Reference>] {
        &self.retained
    }

    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        let Some(method) = Self::resolved_method(reference) else {
            return false;
        };
        let owner = self
            .registered_owner(&method.enclosing_type, &method.name, &method.signature)
            .or_else(|| {
                self.registered_owner(
                    reference.referenced_type_name(),
                    &method.name,
                    &method.signature,
                )
            });
        owner.is_some_and(|owner| support::is_illegal_use(ctx.profile, reference, owner))
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::IllegalReference
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Method
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, reference: &Reference) -> ProblemFlags {
        if Self::is_constructor(reference) {
            ProblemFlags::CONSTRUCTOR_METHOD
        } else {
            ProblemFlags::METHOD
        }
    }

    fn severity_key(&self) -> &'static str {
        keys::ILLEGAL_REFERENCE
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        Ok(vec![
            support::display_type(Self::declaring_type_name(reference), false),
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
            support::display_type(Self::declaring_type_name(reference), true),
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
        let name = if Self::is_constructor(reference) {
            names::simple_name(Self::declaring_type_name(reference))
        } else {
            reference.referenced_member_name().map_or("", |n| &**n)
        };
        support::locate_occurrence(ctx.profile, locator, reference, name)
    }
}
