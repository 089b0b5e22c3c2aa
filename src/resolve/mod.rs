//! Reference resolution.
//!
//! Binds symbolic references to declarations of a [`Profile`]. Resolution
//! is a pure lookup; writing the result into a reference happens once, via
//! [`Reference::set_resolution`].
//!
//! Components produce many references to the same symbol, so
//! [`ReferenceResolver::resolve_references`] groups references by their
//! [`ResolutionKey`](crate::reference::ResolutionKey), resolves the first of
//! each group and hands the result to the rest.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::base::{ProgressMonitor, SubProgress};
use crate::model::{ApiComponent, ApiMember, ApiType, Profile};
use crate::reference::{Reference, ReferenceFlags, ReferenceKind, TargetType};

/// Resolves references against one profile.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceResolver<'a> {
    profile: &'a Profile,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    // ========================================================================
    // BULK RESOLUTION
    // ========================================================================

    /// Resolve every reference not yet resolved.
    ///
    /// Override references are resolved one by one; the others once per
    /// structural key. Cancellation is checked between groups; returns
    /// `false` if resolution stopped early.
    pub fn resolve_references(
        &self,
        references: &[Rc<Reference>],
        progress: &mut dyn ProgressMonitor,
    ) -> bool {
        let start = Instant::now();
        let mut overrides: Vec<&Rc<Reference>> = Vec::new();
        let mut groups: IndexMap<_, Vec<&Rc<Reference>>> = IndexMap::new();
        for reference in references {
            if reference.kind() == ReferenceKind::Override {
                overrides.push(reference);
            } else {
                groups
                    .entry(reference.resolution_key())
                    .or_default()
                    .push(reference);
            }
        }

        let mut progress = SubProgress::new(progress);
        progress.begin_task("Resolving references", overrides.len() + groups.len());

        for reference in &overrides {
            if progress.is_cancelled() {
                return false;
            }
            self.resolve_one(reference);
            progress.worked(1);
        }

        for (key, group) in &groups {
            if progress.is_cancelled() {
                tracing::debug!("reference resolution cancelled");
                return false;
            }
            // An already resolved member of the group wins over a fresh lookup.
            let target = match group.iter().find(|r| r.is_resolved()) {
                Some(resolved) => resolved.resolved().cloned(),
                None => self.lookup(group[0]),
            };
            if target.is_none() {
                tracing::trace!(
                    component = %key.component,
                    type_name = %key.type_name,
                    member = ?key.member_name,
                    "unresolved reference"
                );
            }
            for reference in group {
                reference.set_resolution(target.clone());
            }
            progress.worked(1);
        }

        progress.done();
        tracing::debug!(
            references = references.len(),
            groups = groups.len(),
            overrides = overrides.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "resolved references"
        );
        true
    }

    /// Resolve a single reference if needed, returning its target.
    pub fn resolve_one(&self, reference: &Reference) -> Option<ApiMember> {
        if !reference.is_resolved() {
            reference.set_resolution(self.lookup(reference));
        }
        reference.resolved().cloned()
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Look up the target of a reference as seen from its origin component.
    ///
    /// Does not touch the reference's resolution slot.
    pub fn lookup(&self, reference: &Reference) -> Option<ApiMember> {
        let ty = self
            .profile
            .find_type(reference.origin_component(), reference.referenced_type_name())?;
        self.lookup_member(reference, ty)
    }

    /// Look up the target of a reference in the types of `component` only.
    ///
    /// Used to check a reference against another version of a required
    /// component.
    pub fn resolve_against(&self, reference: &Reference, component: &ApiComponent) -> Option<ApiMember> {
        let ty = component.find_type(reference.referenced_type_name())?;
        self.lookup_member(reference, ty)
    }

    fn lookup_member(&self, reference: &Reference, ty: &Arc<ApiType>) -> Option<ApiMember> {
        match reference.target() {
            TargetType::Type => Some(ApiMember::Type(ty.clone())),
            TargetType::Field => {
                let name = reference.referenced_member_name()?;
                let mut visited = FxHashSet::default();
                self.find_field(ty, name, &mut visited)
            }
            TargetType::Method => {
                let name = reference.referenced_member_name()?;
                let signature = reference.referenced_signature()?;
                let mut visited = FxHashSet::default();
                self.find_method(reference, ty, name, signature, &mut visited)
                    .map(ApiMember::Method)
            }
        }
    }

    fn super_type(&self, ty: &ApiType, name: &str) -> Option<&'a Arc<ApiType>> {
        self.profile.find_type(&ty.component, name)
    }

    /// Virtual method lookup. A synthetic declaration ends the lookup unresolved.
    fn find_method(
        &self,
        reference: &Reference,
        ty: &Arc<ApiType>,
        name: &str,
        signature: &str,
        visited: &mut FxHashSet<Arc<str>>,
    ) -> Option<Arc<crate::model::ApiMethod>> {
        if !visited.insert(ty.name.clone()) {
            return None;
        }
        if let Some(method) = ty.method(name, signature) {
            if method.is_synthetic() {
                tracing::trace!(method = %method.name, "synthetic methods are not resolved");
                return None;
            }
            return Some(method.clone());
        }

        if reference.kind() == ReferenceKind::InterfaceMethod {
            return ty.super_interfaces.iter().find_map(|interface| {
                let interface = self.super_type(ty, interface)?;
                self.find_method(reference, interface, name, signature, visited)
            });
        }

        if let Some(superclass) = ty.superclass.as_deref().and_then(|s| self.super_type(ty, s)) {
            if let Some(found) = self.find_method(reference, superclass, name, signature, visited) {
                return Some(found);
            }
        }

        if reference.flags().contains(ReferenceFlags::DEFAULT_METHOD) || ty.is_interface() {
            return ty.super_interfaces.iter().find_map(|interface| {
                let interface = self.super_type(ty, interface)?;
                self.find_method(reference, interface, name, signature, visited)
            });
        }
        None
    }

    fn find_field(
        &self,
        ty: &Arc<ApiType>,
        name: &str,
        visited: &mut FxHashSet<Arc<str>>,
    ) -> Option<ApiMember> {
        if !visited.insert(ty.name.clone()) {
            return None;
        }
        if let Some(field) = ty.field(name) {
            return Some(ApiMember::Field(field.clone()));
        }
        let interfaces = ty
            .super_interfaces
            .iter()
            .filter_map(|interface| self.super_type(ty, interface));
        let superclass = ty.superclass.as_deref().and_then(|s| self.super_type(ty, s));
        interfaces
            .chain(superclass)
            .collect::<Vec<_>>()
            .into_iter()
            .find_map(|super_type| self.find_field(super_type, name, visited))
    }
}
