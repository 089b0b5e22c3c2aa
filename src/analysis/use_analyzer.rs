//! Criteria-driven API use analysis.
//!
//! Restrictions declared by a component's prerequisites become search
//! criteria; a [`SearchEngine`] run over the component yields the
//! references that violate them. Leak criteria are added for every
//! component.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use super::criteria::{ProblemDescriptor, SearchCriteria};
use super::scanner::{ReferenceScanner, SearchScope};
use super::search::{SearchEngine, SearchResult};
use crate::base::{ProgressMonitor, SubProgress};
use crate::error::{AnalysisError, Result};
use crate::model::{ApiComponent, ElementDescriptor, Modifiers, Profile, Restriction, Visibility};
use crate::problems::{ElementType, ProblemFlags, ProblemKind};
use crate::reference::{Reference, ReferenceKinds};
use crate::resolve::ReferenceResolver;

/// References of a component that no longer resolve against another
/// version of one of its required components.
#[derive(Clone, Debug)]
pub struct CompatibilityResult {
    pub component: Arc<str>,
    pub version: Arc<str>,
    pub unresolved: Vec<Reference>,
}

impl CompatibilityResult {
    pub fn is_compatible(&self) -> bool {
        self.unresolved.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ApiUseAnalyzer<'a> {
    profile: &'a Profile,
}

impl<'a> ApiUseAnalyzer<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    /// References made from `scope` that violate a restriction of one of
    /// `component`'s prerequisites or leak a non-API type.
    pub fn find_illegal_api_use(
        &self,
        component: &str,
        scope: &SearchScope,
        scanner: &dyn ReferenceScanner,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Vec<Rc<Reference>>> {
        Ok(self
            .search_illegal_api_use(component, scope, scanner, progress)?
            .into_iter()
            .flat_map(|result| result.references)
            .collect())
    }

    /// Like [`ApiUseAnalyzer::find_illegal_api_use`], grouped by the
    /// criteria each reference matched.
    pub fn search_illegal_api_use(
        &self,
        component: &str,
        scope: &SearchScope,
        scanner: &dyn ReferenceScanner,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Vec<SearchResult>> {
        let conditions = self.build_search_conditions(component)?;
        SearchEngine::new(self.profile).search(scope, scanner, &conditions, progress)
    }

    /// [`ApiUseAnalyzer::find_illegal_api_use`] for every non-system
    /// component of the profile.
    ///
    /// Components whose scan fails are skipped. Cancellation is checked
    /// between components; a started component is searched to the end and
    /// the references found so far are returned.
    pub fn find_illegal_api_use_in_profile(
        &self,
        scanner: &dyn ReferenceScanner,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Vec<Rc<Reference>>> {
        let components: Vec<&ApiComponent> =
            self.profile.components().filter(|c| !c.system).collect();
        progress.begin_task("Analyzing API use", components.len());
        let mut references = Vec::new();
        for component in components {
            if progress.is_cancelled() {
                tracing::debug!(found = references.len(), "API use analysis cancelled");
                break;
            }
            progress.sub_task(&component.id);
            let scope = SearchScope::component(component.id.clone());
            let mut component_progress = SubProgress::uninterruptible(progress);
            match self.find_illegal_api_use(&component.id, &scope, scanner, &mut component_progress) {
                Ok(found) => references.extend(found),
                Err(err @ AnalysisError::Scan { .. }) => {
                    tracing::warn!(component = %component.id, error = %err, "skipping component");
                }
                Err(err) => return Err(err),
            }
            progress.worked(1);
        }
        progress.done();
        Ok(references)
    }

    // ========================================================================
    // SEARCH CONDITIONS
    // ========================================================================

    /// Criteria for the restrictions of every prerequisite of `component`,
    /// followed by the leak criteria.
    pub fn build_search_conditions(&self, component: &str) -> Result<Vec<SearchCriteria>> {
        let start = Instant::now();
        let component = self.profile.require_component(component)?;
        let mut conditions = Vec::new();
        for prerequisite in self.profile.prerequisite_components(&component.id) {
            for (element, restrictions) in prerequisite.description.restricted_elements() {
                restriction_conditions(&prerequisite.id, element, restrictions, &mut conditions);
            }
        }
        tracing::debug!(
            component = %component.id,
            conditions = conditions.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built search conditions"
        );
        conditions.extend(leak_conditions());
        Ok(conditions)
    }

    // ========================================================================
    // COMPATIBILITY
    // ========================================================================

    /// Check `component`'s references against other versions of its
    /// required components.
    ///
    /// References are resolved in this profile; those bound into a required
    /// component are re-resolved against the given version of it. Returns
    /// the results computed before a cancellation.
    pub fn analyze_compatibility(
        &self,
        component: &str,
        required: &[&ApiComponent],
        scanner: &dyn ReferenceScanner,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Vec<CompatibilityResult>> {
        self.profile.require_component(component)?;
        progress.begin_task("Compatibility analysis", required.len() + 1);

        let scope = SearchScope::component(component);
        let references: Vec<Rc<Reference>> = scanner
            .scan(self.profile, &scope, ReferenceKinds::ALL)?
            .into_iter()
            .map(Rc::new)
            .collect();
        let resolver = ReferenceResolver::new(self.profile);
        if !resolver.resolve_references(&references, progress) {
            return Ok(Vec::new());
        }
        progress.worked(1);

        let mut results = Vec::with_capacity(required.len());
        for required_component in required {
            if progress.is_cancelled() {
                break;
            }
            progress.sub_task(&format!("{} {}", required_component.id, required_component.version));
            let unresolved: Vec<Reference> = references
                .iter()
                .filter(|r| {
                    r.resolved()
                        .is_some_and(|target| target.component() == &required_component.id)
                })
                .map(|r| r.unresolved_copy())
                .filter(|copy| {
                    let target = resolver.resolve_against(copy, required_component);
                    copy.set_resolution(target);
                    copy.resolved().is_none()
                })
                .collect();
            tracing::debug!(
                component,
                required = %required_component.id,
                version = %required_component.version,
                unresolved = unresolved.len(),
                "compatibility checked"
            );
            results.push(CompatibilityResult {
                component: required_component.id.clone(),
                version: required_component.version.clone(),
                unresolved,
            });
            progress.worked(1);
        }
        progress.done();
        Ok(results)
    }
}

/// Criteria for one restricted element of component `owner`.
fn restriction_conditions(
    owner: &Arc<str>,
    element: &ElementDescriptor,
    restrictions: Restriction,
    conditions: &mut Vec<SearchCriteria>,
) {
    let mut add = |kinds: ReferenceKinds, restriction: Restriction, descriptor: ProblemDescriptor| {
        conditions.push(
            SearchCriteria::new(kinds)
                .with_referenced_element(owner.clone(), element.clone())
                .with_referenced_restrictions(Visibility::ALL, restriction)
                .with_descriptor(descriptor),
        );
    };
    let is_type = matches!(element, ElementDescriptor::Type(_));
    let is_method = matches!(element, ElementDescriptor::Method { .. });
    let is_field = matches!(element, ElementDescriptor::Field { .. });

    if restrictions.contains(Restriction::NO_EXTEND) {
        if is_method {
            add(
                ReferenceKinds::OVERRIDE,
                Restriction::NO_EXTEND,
                ProblemDescriptor::new(ProblemKind::IllegalOverride, ElementType::Method),
            );
        } else if is_type {
            add(
                ReferenceKinds::EXTENDS,
                Restriction::NO_EXTEND,
                ProblemDescriptor::new(ProblemKind::IllegalExtend, ElementType::Type),
            );
        }
    }
    if restrictions.contains(Restriction::NO_OVERRIDE) && is_method {
        add(
            ReferenceKinds::OVERRIDE,
            Restriction::NO_OVERRIDE,
            ProblemDescriptor::new(ProblemKind::IllegalOverride, ElementType::Method),
        );
    }
    if restrictions.contains(Restriction::NO_IMPLEMENT) && is_type {
        add(
            ReferenceKinds::IMPLEMENTS,
            Restriction::NO_IMPLEMENT,
            ProblemDescriptor::new(ProblemKind::IllegalImplement, ElementType::Type),
        );
    }
    if restrictions.contains(Restriction::NO_INSTANTIATE) && is_type {
        add(
            ReferenceKinds::INSTANTIATE,
            Restriction::NO_INSTANTIATE,
            ProblemDescriptor::new(ProblemKind::IllegalInstantiate, ElementType::Type),
        );
    }
    if restrictions.contains(Restriction::NO_REFERENCE) {
        if is_method {
            add(
                ReferenceKinds::METHOD_CALLS,
                Restriction::NO_REFERENCE,
                ProblemDescriptor::new(ProblemKind::IllegalReference, ElementType::Method)
                    .with_flags(ProblemFlags::METHOD),
            );
        } else if is_field {
            add(
                ReferenceKinds::FIELD_ACCESS,
                Restriction::NO_REFERENCE,
                ProblemDescriptor::new(ProblemKind::IllegalReference, ElementType::Field)
                    .with_flags(ProblemFlags::FIELD),
            );
        } else if is_type {
            add(
                ReferenceKinds::ANNOTATION_USE,
                Restriction::NO_REFERENCE,
                ProblemDescriptor::new(ProblemKind::IllegalReference, ElementType::Type)
                    .with_flags(ProblemFlags::ANNOTATION),
            );
        }
    }
}

/// Non-API types in the signatures of visible API members.
fn leak_conditions() -> Vec<SearchCriteria> {
    let member_restrictions = Restriction::ALL.difference(Restriction::NO_REFERENCE);
    [
        (ReferenceKinds::EXTENDS, ElementType::Type, ProblemFlags::LEAK_EXTENDS, Restriction::ALL),
        (ReferenceKinds::IMPLEMENTS, ElementType::Type, ProblemFlags::LEAK_IMPLEMENTS, Restriction::ALL),
        (ReferenceKinds::FIELD_DECL, ElementType::Field, ProblemFlags::LEAK_FIELD, member_restrictions),
        (ReferenceKinds::PARAMETER, ElementType::Method, ProblemFlags::LEAK_METHOD_PARAMETER, member_restrictions),
        (ReferenceKinds::RETURN_TYPE, ElementType::Method, ProblemFlags::LEAK_RETURN_TYPE, member_restrictions),
    ]
    .into_iter()
    .map(|(kinds, element_type, flags, source_restrictions)| {
        SearchCriteria::new(kinds)
            .with_referenced_restrictions(Visibility::PRIVATE, Restriction::ALL)
            .with_source_restrictions(Visibility::API, source_restrictions)
            .with_source_modifiers(Modifiers::PUBLIC | Modifiers::PROTECTED)
            .with_local_references(true)
            .with_descriptor(ProblemDescriptor::new(ProblemKind::ApiLeak, element_type).with_flags(flags))
    })
    .collect()
}
