//! Builds the detector set for one component.
//!
//! Restrictions are collected from the API descriptions of every
//! prerequisite component; the analyzed component's own restrictions never
//! apply to itself. Non-API packages are collected from the prerequisites
//! and from the analyzed component.

use std::rc::Rc;
use std::sync::Arc;

use super::registry::NonApiPackages;
use super::{
    IllegalAnnotationDetector, IllegalExtendsDetector, IllegalFieldReferenceDetector,
    IllegalImplementsDetector, IllegalInstantiateDetector, IllegalMethodReferenceDetector,
    IllegalOverrideDetector, LeakExtendsDetector, LeakFieldDetector, LeakImplementsDetector,
    LeakParameterDetector, LeakReturnTypeDetector, ProblemDetector,
};
use crate::error::Result;
use crate::model::{ApiComponent, ElementDescriptor, Profile, Restriction};
use crate::problems::AnalysisConfig;

pub struct ProblemDetectorBuilder<'a> {
    profile: &'a Profile,
    component: Arc<str>,
    config: &'a AnalysisConfig,
}

/// Detectors with their registries filled, before severity filtering.
#[derive(Default)]
struct Registries {
    extends: IllegalExtendsDetector,
    implements: IllegalImplementsDetector,
    instantiate: IllegalInstantiateDetector,
    overrides: IllegalOverrideDetector,
    methods: IllegalMethodReferenceDetector,
    fields: IllegalFieldReferenceDetector,
    annotations: IllegalAnnotationDetector,
    non_api_packages: NonApiPackages,
}

impl<'a> ProblemDetectorBuilder<'a> {
    pub fn new(profile: &'a Profile, component: impl Into<Arc<str>>, config: &'a AnalysisConfig) -> Self {
        Self {
            profile,
            component: component.into(),
            config,
        }
    }

    /// Create every detector whose category is not ignored.
    ///
    /// Returns no detectors when API usage scanning is disabled.
    pub fn build(&self) -> Result<Vec<Box<dyn ProblemDetector>>> {
        let component = self.profile.require_component(&self.component)?;
        if self.config.ignore_api_usage_scan {
            tracing::debug!(component = %self.component, "API usage scan disabled");
            return Ok(Vec::new());
        }

        let mut registries = Registries::default();
        for prerequisite in self.profile.prerequisite_components(&component.id) {
            registries.visit_restrictions(prerequisite);
            registries.visit_packages(prerequisite);
        }
        registries.visit_packages(component);

        tracing::debug!(
            component = %self.component,
            extends = registries.extends.registry().len(),
            implements = registries.implements.registry().len(),
            instantiate = registries.instantiate.registry().len(),
            overrides = registries.overrides.registry().len(),
            methods = registries.methods.registry().len(),
            fields = registries.fields.registry().len(),
            annotations = registries.annotations.registry().len(),
            non_api_packages = registries.non_api_packages.len(),
            "built detector registries"
        );

        let non_api = Rc::new(registries.non_api_packages);
        let candidates: Vec<Box<dyn ProblemDetector>> = vec![
            Box::new(registries.extends),
            Box::new(registries.implements),
            Box::new(registries.instantiate),
            Box::new(registries.overrides),
            Box::new(registries.methods),
            Box::new(registries.fields),
            Box::new(registries.annotations),
            Box::new(LeakExtendsDetector::new(non_api.clone())),
            Box::new(LeakImplementsDetector::new(non_api.clone())),
            Box::new(LeakFieldDetector::new(non_api.clone())),
            Box::new(LeakParameterDetector::new(non_api.clone())),
            Box::new(LeakReturnTypeDetector::new(non_api)),
        ];
        Ok(candidates
            .into_iter()
            .filter(|detector| !self.config.severities.is_ignored(detector.severity_key()))
            .collect())
    }
}

impl Registries {
    fn visit_restrictions(&mut self, component: &ApiComponent) {
        let owner = &component.id;
        for (element, restrictions) in component.description.restricted_elements() {
            match element {
                ElementDescriptor::Package(_) => {}
                ElementDescriptor::Type(name) => {
                    if restrictions.contains(Restriction::NO_EXTEND) {
                        self.extends.add_illegal_type(name.clone(), owner.clone());
                    }
                    if restrictions.contains(Restriction::NO_IMPLEMENT) {
                        self.implements.add_illegal_type(name.clone(), owner.clone());
                    }
                    if restrictions.contains(Restriction::NO_INSTANTIATE) {
                        self.instantiate.add_illegal_type(name.clone(), owner.clone());
                    }
                    if restrictions.contains(Restriction::NO_REFERENCE) {
                        self.annotations.add_illegal_type(name.clone(), owner.clone());
                        self.methods.add_illegal_type(name.clone(), owner.clone());
                        self.fields.add_illegal_type(name.clone(), owner.clone());
                    }
                }
                ElementDescriptor::Method {
                    type_name,
                    name,
                    signature,
                } => {
                    if restrictions.contains(Restriction::NO_REFERENCE) {
                        self.methods
                            .add_illegal_method(type_name, name, signature, owner.clone());
                    }
                    if restrictions.intersects(Restriction::NO_OVERRIDE | Restriction::NO_EXTEND) {
                        self.overrides
                            .add_illegal_method(type_name, name, signature, owner.clone());
                    }
                }
                ElementDescriptor::Field { type_name, name } => {
                    if restrictions.contains(Restriction::NO_REFERENCE) {
                        self.fields.add_illegal_field(type_name, name, owner.clone());
                    }
                }
            }
        }
    }

    fn visit_packages(&mut self, component: &ApiComponent) {
        for (package, visibility) in component.description.packages() {
            if !visibility.is_api() {
                self.non_api_packages.add(package);
            }
        }
    }
}
