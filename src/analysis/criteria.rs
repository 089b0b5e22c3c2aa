//! Search criteria: which references a search reports.
//!
//! Matching happens in two steps. [`SearchCriteria::is_potential_match`]
//! looks at the unresolved reference (kind and referenced name);
//! [`SearchCriteria::is_match`] looks at the resolved target and at the
//! annotations on both ends.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::detectors::support;
use crate::model::{
    ApiAnnotations, ElementDescriptor, Modifiers, Profile, Restriction, Visibility,
};
use crate::problems::{ElementType, ProblemFlags, ProblemKind};
use crate::reference::{Reference, ReferenceKinds, TargetType};

/// The problem a matching reference stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProblemDescriptor {
    pub kind: ProblemKind,
    pub element_type: ElementType,
    pub flags: ProblemFlags,
}

impl ProblemDescriptor {
    pub fn new(kind: ProblemKind, element_type: ElementType) -> Self {
        Self {
            kind,
            element_type,
            flags: ProblemFlags::NO_FLAGS,
        }
    }

    pub fn with_flags(mut self, flags: ProblemFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Constraint on the annotations of one end of a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AnnotationFilter {
    visibility: Visibility,
    restrictions: Restriction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchCriteria {
    pub reference_kinds: ReferenceKinds,
    /// Referenced elements by owning component; an empty list covers the
    /// whole component. No entries means any target.
    referenced_elements: IndexMap<Arc<str>, Vec<ElementDescriptor>>,
    /// Visibility the target must have, and restrictions of which it must
    /// carry at least one (`Restriction::ALL` accepts unrestricted targets).
    referenced: AnnotationFilter,
    /// Visibility the referencing member must have, and the restrictions it
    /// may carry.
    source: Option<AnnotationFilter>,
    source_modifiers: Option<Modifiers>,
    /// Also report references into the referencing component itself.
    pub consider_local_references: bool,
    pub descriptor: Option<ProblemDescriptor>,
}

impl SearchCriteria {
    pub fn new(reference_kinds: ReferenceKinds) -> Self {
        Self {
            reference_kinds,
            referenced_elements: IndexMap::new(),
            referenced: AnnotationFilter {
                visibility: Visibility::ALL,
                restrictions: Restriction::ALL,
            },
            source: None,
            source_modifiers: None,
            consider_local_references: false,
            descriptor: None,
        }
    }

    /// Match only references into `component`.
    pub fn with_referenced_component(mut self, component: impl Into<Arc<str>>) -> Self {
        self.referenced_elements.entry(component.into()).or_default();
        self
    }

    /// Match only references to `element` (or anything inside it) owned by
    /// `component`.
    pub fn with_referenced_element(mut self, component: impl Into<Arc<str>>, element: ElementDescriptor) -> Self {
        let leaves = self.referenced_elements.entry(component.into()).or_default();
        if leaves.iter().any(|leaf| element.path().contains(leaf)) {
            return self;
        }
        leaves.retain(|leaf| !leaf.path().contains(&element));
        leaves.push(element);
        self
    }

    pub fn with_referenced_restrictions(mut self, visibility: Visibility, restrictions: Restriction) -> Self {
        self.referenced = AnnotationFilter {
            visibility,
            restrictions,
        };
        self
    }

    pub fn with_source_restrictions(mut self, visibility: Visibility, restrictions: Restriction) -> Self {
        self.source = Some(AnnotationFilter {
            visibility,
            restrictions,
        });
        self
    }

    /// The referencing member must have at least one of `modifiers`.
    pub fn with_source_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.source_modifiers = Some(modifiers);
        self
    }

    pub fn with_local_references(mut self, local: bool) -> Self {
        self.consider_local_references = local;
        self
    }

    pub fn with_descriptor(mut self, descriptor: ProblemDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    // ========================================================================
    // MATCHING
    // ========================================================================

    /// Pre-resolution filter on the reference kind and referenced name.
    pub fn is_potential_match(&self, reference: &Reference) -> bool {
        if !self.reference_kinds.includes(reference.kind()) {
            return false;
        }
        if self.referenced_elements.is_empty() {
            return true;
        }
        let target = target_descriptor(reference);
        self.referenced_elements.values().any(Vec::is_empty)
            || self
                .referenced_elements
                .values()
                .flatten()
                .any(|element| is_potential_element_match(element, &target))
    }

    /// Whether a resolved reference matches.
    pub fn is_match(&self, profile: &Profile, reference: &Reference) -> bool {
        let Some(resolved) = reference.resolved() else {
            return false;
        };
        if !self.consider_local_references && reference.origin_component() == resolved.component() {
            return false;
        }
        if !self.encloses(resolved.component(), &resolved.descriptor()) {
            return false;
        }
        let Some(target) = support::annotations(profile, resolved) else {
            return false;
        };
        if !matches_referenced(self.referenced, target) {
            return false;
        }
        if let Some(modifiers) = self.source_modifiers {
            if !reference.member().modifiers().intersects(modifiers) {
                return false;
            }
        }
        match self.source {
            None => true,
            Some(filter) => support::annotations(profile, reference.member())
                .is_some_and(|source| matches_source(filter, source)),
        }
    }

    fn encloses(&self, component: &str, element: &ElementDescriptor) -> bool {
        if self.referenced_elements.is_empty() {
            return true;
        }
        match self.referenced_elements.get(component) {
            None => false,
            Some(leaves) if leaves.is_empty() => true,
            Some(leaves) => {
                let path = element.path();
                leaves.iter().any(|leaf| path.contains(leaf))
            }
        }
    }
}

fn matches_referenced(filter: AnnotationFilter, annotations: ApiAnnotations) -> bool {
    annotations.visibility.intersects(filter.visibility)
        && (filter.restrictions == Restriction::ALL
            || annotations.restrictions.intersects(filter.restrictions))
}

fn matches_source(filter: AnnotationFilter, annotations: ApiAnnotations) -> bool {
    annotations.visibility.intersects(filter.visibility)
        && filter.restrictions.contains(annotations.restrictions)
}

/// Descriptor of what an unresolved reference names.
pub fn target_descriptor(reference: &Reference) -> ElementDescriptor {
    let type_name = reference.referenced_type_name().clone();
    match reference.target() {
        TargetType::Type => ElementDescriptor::of_type(type_name),
        TargetType::Field => ElementDescriptor::of_field(
            type_name,
            reference.referenced_member_name().cloned().unwrap_or_else(|| Arc::from("")),
        ),
        TargetType::Method => ElementDescriptor::of_method(
            type_name,
            reference.referenced_member_name().cloned().unwrap_or_else(|| Arc::from("")),
            reference.referenced_signature().cloned().unwrap_or_else(|| Arc::from("")),
        ),
    }
}

fn is_potential_element_match(element: &ElementDescriptor, target: &ElementDescriptor) -> bool {
    match (target, element) {
        // The declaring type is only known after resolution.
        (
            ElementDescriptor::Method { name, signature, .. },
            ElementDescriptor::Method {
                name: wanted_name,
                signature: wanted_signature,
                ..
            },
        ) => name == wanted_name && signature == wanted_signature,
        (ElementDescriptor::Method { .. }, _) => true,
        _ => target.path().contains(element),
    }
}
