//! A profile: the set of components analyzed together.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use super::annotations::{ApiAnnotations, ElementDescriptor};
use super::component::ApiComponent;
use super::types::{ApiMember, ApiType};
use crate::base::names;
use crate::error::{AnalysisError, Result};

/// The component graph, type lookup and annotation resolution.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    components: IndexMap<Arc<str>, ApiComponent>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, component: ApiComponent) -> Self {
        self.add_component(component);
        self
    }

    /// Add (or replace) a component.
    pub fn add_component(&mut self, component: ApiComponent) {
        self.components.insert(component.id.clone(), component);
    }

    pub fn component(&self, id: &str) -> Option<&ApiComponent> {
        self.components.get(id)
    }

    /// Like [`Profile::component`] but failing for unknown ids.
    pub fn require_component(&self, id: &str) -> Result<&ApiComponent> {
        self.component(id)
            .ok_or_else(|| AnalysisError::unknown_component(id))
    }

    /// All components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &ApiComponent> {
        self.components.values()
    }

    // ========================================================================
    // COMPONENT GRAPH
    // ========================================================================

    /// Required components of `id`: its prerequisites and whatever they
    /// re-export, transitively. Fragments also see their host's prerequisites.
    /// The component itself is excluded.
    pub fn prerequisite_components(&self, id: &str) -> Vec<&ApiComponent> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        seen.insert(id);
        let mut result = Vec::new();
        let Some(component) = self.component(id) else {
            return result;
        };

        let mut pending: Vec<&Arc<str>> = component.prerequisites.iter().collect();
        if let Some(host) = self.host_of(component) {
            pending.push(&host.id);
            pending.extend(host.prerequisites.iter());
        }
        pending.reverse();

        while let Some(next) = pending.pop() {
            if !seen.insert(&**next) {
                continue;
            }
            let Some(required) = self.component(next) else {
                tracing::trace!(component = id, missing = %next, "prerequisite not in profile");
                continue;
            };
            result.push(required);
            pending.extend(required.reexports.iter().rev());
        }
        result
    }

    /// Components whose types `id` can see: itself, its prerequisites and
    /// every system component.
    pub fn visible_components(&self, id: &str) -> Vec<&ApiComponent> {
        let mut visible = Vec::new();
        if let Some(component) = self.component(id) {
            visible.push(component);
        }
        visible.extend(self.prerequisite_components(id));
        for component in self.components.values() {
            if component.system && !visible.iter().any(|c| c.id == component.id) {
                visible.push(component);
            }
        }
        visible
    }

    fn host_of(&self, component: &ApiComponent) -> Option<&ApiComponent> {
        component.host.as_deref().and_then(|host| self.component(host))
    }

    /// Whether `fragment` is a fragment hosted by `host`.
    pub fn is_fragment_of(&self, fragment: &str, host: &str) -> bool {
        self.component(fragment)
            .filter(|c| c.is_fragment())
            .and_then(|c| c.host.as_deref())
            .is_some_and(|h| h == host)
    }

    /// Whether a reference originating in `origin` may use restricted
    /// elements of `owner`: the same component, a fragment of it, or a
    /// component re-exporting it.
    pub fn is_origin_exempt(&self, origin: &str, owner: &str) -> bool {
        if origin == owner || self.is_fragment_of(origin, owner) {
            return true;
        }
        self.component(origin)
            .is_some_and(|c| c.reexports.iter().any(|r| &**r == owner))
    }

    // ========================================================================
    // TYPE LOOKUP
    // ========================================================================

    /// The first component visible from `from` that provides `package`.
    pub fn resolve_package(&self, from: &str, package: &str) -> Option<&ApiComponent> {
        self.visible_components(from)
            .into_iter()
            .find(|c| c.contains_package(package))
    }

    /// Find a type as seen from component `from`.
    pub fn find_type(&self, from: &str, type_name: &str) -> Option<&Arc<ApiType>> {
        let package = names::package_name(type_name);
        self.visible_components(from)
            .into_iter()
            .filter(|c| c.contains_package(package))
            .find_map(|c| c.find_type(type_name))
    }

    /// Find a type declared by a specific component.
    pub fn find_type_in(&self, component: &str, type_name: &str) -> Option<&Arc<ApiType>> {
        self.component(component)?.find_type(type_name)
    }

    /// Find the type declaring a member (or the type itself).
    pub fn declaring_type(&self, member: &ApiMember) -> Option<&Arc<ApiType>> {
        self.find_type_in(member.component(), member.type_name())
    }

    /// Find the type enclosing `ty`, looking in its own component.
    pub fn enclosing_type(&self, ty: &ApiType) -> Option<&Arc<ApiType>> {
        let enclosing = ty.enclosing_type.as_deref()?;
        self.find_type_in(&ty.component, enclosing)
    }

    // ========================================================================
    // ANNOTATIONS
    // ========================================================================

    /// Resolve annotations of an element in the description of `component`.
    pub fn resolve_annotations(
        &self,
        component: &str,
        element: &ElementDescriptor,
    ) -> Result<Option<ApiAnnotations>> {
        let Some(owner) = self.component(component) else {
            return Err(AnalysisError::annotation_lookup(
                element.to_string(),
                format!("component {} is not in the profile", component),
            ));
        };
        Ok(owner.description.resolve_annotations(element))
    }

    /// Resolve the annotations of a member in its owning component.
    pub fn annotations_of(&self, member: &ApiMember) -> Result<Option<ApiAnnotations>> {
        self.resolve_annotations(member.component(), &member.descriptor())
    }
}
