//! Implementing an interface marked no-implement, directly or through a
//! super-interface.
//!
//! For `class C implements I`, the super-interfaces of `I` are walked.
//! Interfaces from the implementing type's own component are recursed into;
//! the first interface from another component ends its branch and is checked
//! for a no-implement restriction. A restricted interface `J` found this way
//! is an indirect problem unless a superclass of `C` already implements `J`.

use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use text_size::TextRange;

use super::registry::IllegalTypes;
use super::{DetectionContext, ProblemDetector, support};
use crate::base::{SourceLocator, names};
use crate::error::Result;
use crate::model::{ApiType, Profile, Restriction};
use crate::problems::{ElementType, ProblemFlags, ProblemKind, keys};
use crate::reference::{Reference, ReferenceKinds};

/// (implementing component, implemented interface)
type IndirectKey = (Arc<str>, Arc<str>);

#[derive(Debug, Default)]
pub struct IllegalImplementsDetector {
    types: IllegalTypes,
    /// Restricted super-interface found for an implemented interface.
    restricted: FxHashMap<IndirectKey, Option<Arc<ApiType>>>,
    retained: Vec<Rc<Reference>>,
}

impl IllegalImplementsDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a no-implement interface owned by `component`.
    pub fn add_illegal_type(&mut self, type_name: Arc<str>, component: Arc<str>) {
        self.types.add(type_name, component);
    }

    pub fn registry(&self) -> &IllegalTypes {
        &self.types
    }

    fn indirect_key(reference: &Reference) -> IndirectKey {
        (
            reference.origin_component().clone(),
            reference.referenced_type_name().clone(),
        )
    }

    /// The restricted super-interface behind an indirect problem, if any.
    fn restricted_interface(&self, reference: &Reference) -> Option<&Arc<ApiType>> {
        if self.types.contains(reference.referenced_type_name()) {
            return None;
        }
        self.restricted
            .get(&Self::indirect_key(reference))
            .and_then(Option::as_ref)
    }

    fn is_local(reference: &Reference) -> bool {
        reference.member().as_type().is_some_and(|ty| ty.local)
    }
}

fn find_restricted_super_interface(
    profile: &Profile,
    origin: &str,
    interface: &ApiType,
    visited: &mut FxHashSet<Arc<str>>,
) -> Option<Arc<ApiType>> {
    if !visited.insert(interface.name.clone()) {
        return None;
    }
    for name in &interface.super_interfaces {
        let Some(super_interface) = profile.find_type(&interface.component, name) else {
            tracing::trace!(interface = %name, "super-interface not found");
            continue;
        };
        if &*super_interface.component != origin {
            let restricted = support::type_annotations(profile, super_interface)
                .is_some_and(|a| a.restrictions.contains(Restriction::NO_IMPLEMENT));
            if restricted {
                return Some(super_interface.clone());
            }
        } else if let Some(found) =
            find_restricted_super_interface(profile, origin, super_interface, visited)
        {
            return Some(found);
        }
    }
    None
}

/// Whether a superclass of `ty` implements `interface`.
fn superclass_implements(profile: &Profile, ty: &ApiType, interface: &str) -> bool {
    let mut seen = FxHashSet::default();
    let mut current = ty
        .superclass
        .as_deref()
        .and_then(|name| profile.find_type(&ty.component, name));
    while let Some(class) = current {
        if !seen.insert(class.name.clone()) {
            break;
        }
        if implements_transitively(profile, class, interface, &mut FxHashSet::default()) {
            return true;
        }
        current = class
            .superclass
            .as_deref()
            .and_then(|name| profile.find_type(&class.component, name));
    }
    false
}

fn implements_transitively(
    profile: &Profile,
    ty: &ApiType,
    interface: &str,
    visited: &mut FxHashSet<Arc<str>>,
) -> bool {
    if !visited.insert(ty.name.clone()) {
        return false;
    }
    ty.super_interfaces.iter().any(|name| {
        &**name == interface
            || profile
                .find_type(&ty.component, name)
                .is_some_and(|super_interface| {
                    implements_transitively(profile, super_interface, interface, visited)
                })
    })
}

impl ProblemDetector for IllegalImplementsDetector {
    fn name(&self) -> &'static str {
        "illegal-implements"
    }

    fn reference_kinds(&self) -> ReferenceKinds {
        ReferenceKinds::IMPLEMENTS
    }

    fn accepts(&mut self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        if self.types.contains(reference.referenced_type_name()) {
            return true;
        }
        let key = Self::indirect_key(reference);
        if let Some(cached) = self.restricted.get(&key) {
            return cached.is_some();
        }
        let origin = reference.origin_component();
        let found = ctx
            .profile
            .find_type(origin, reference.referenced_type_name())
            .and_then(|interface| {
                find_restricted_super_interface(
                    ctx.profile,
                    origin,
                    interface,
                    &mut FxHashSet::default(),
                )
            });
        let accepted = found.is_some();
        self.restricted.insert(key, found);
        accepted
    }

    fn retain(&mut self, reference: Rc<Reference>) {
        self.retained.push(reference);
    }

    fn retained_references(&self) -> &[Rc<Reference>] {
        &self.retained
    }

    fn is_problem(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        if let Some(owner) = self.types.owner(reference.referenced_type_name()) {
            return support::is_illegal_use(ctx.profile, reference, owner);
        }
        let Some(restricted) = self.restricted_interface(reference) else {
            return false;
        };
        if ctx
            .profile
            .is_origin_exempt(reference.origin_component(), &restricted.component)
        {
            return false;
        }
        match support::referencing_type(ctx.profile, reference.member()) {
            Some(ty) => !superclass_implements(ctx.profile, &ty, &restricted.name),
            None => true,
        }
    }

    fn problem_kind(&self) -> ProblemKind {
        ProblemKind::IllegalImplement
    }

    fn element_type(&self, _reference: &Reference) -> ElementType {
        ElementType::Type
    }

    fn problem_flags(&self, _ctx: &DetectionContext<'_>, reference: &Reference) -> ProblemFlags {
        match self.restricted_interface(reference) {
            Some(_) if Self::is_local(reference) => ProblemFlags::INDIRECT_LOCAL_REFERENCE,
            Some(_) => ProblemFlags::INDIRECT_REFERENCE,
            None => support::type_flags(reference.member()),
        }
    }

    fn severity_key(&self) -> &'static str {
        keys::ILLEGAL_IMPLEMENT
    }

    fn message_args(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> Result<Vec<String>> {
        let referenced = support::display_type(reference.referenced_type_name(), false);
        if let Some(restricted) = self.restricted_interface(reference) {
            return Ok(vec![
                referenced,
                support::simple_type_name(ctx.profile, reference.member())?,
                support::display_type(&restricted.name, false),
            ]);
        }
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
        if let Some(restricted) = self.restricted_interface(reference) {
            return Ok(vec![
                referenced,
                support::qualified_type_name(ctx.profile, reference.member())?,
                support::display_type(&restricted.name, true),
            ]);
        }
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
