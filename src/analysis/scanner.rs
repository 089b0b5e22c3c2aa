//! Reference extraction.
//!
//! Class-file scanning lives outside this crate. A [`ReferenceScanner`]
//! hands over the raw references of one component, already filtered by
//! reference kind; [`RecordedReferences`] serves references recorded ahead
//! of time.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::names;
use crate::error::{AnalysisError, Result};
use crate::model::Profile;
use crate::reference::{Reference, ReferenceKinds};

// ============================================================================
// SEARCH SCOPE
// ============================================================================

/// The types of one component to extract references from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchScope {
    pub component: Arc<str>,
    /// Top-level or nested type names; `None` covers the whole component.
    pub types: Option<FxHashSet<Arc<str>>>,
}

impl SearchScope {
    /// Every type of a component.
    pub fn component(id: impl Into<Arc<str>>) -> Self {
        Self {
            component: id.into(),
            types: None,
        }
    }

    /// Restrict the scope to the given types (and the types nested in them).
    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Whether references made from `type_name` fall in this scope.
    pub fn encloses(&self, type_name: &str) -> bool {
        match &self.types {
            None => true,
            Some(types) => names::nested_prefixes(type_name).any(|prefix| types.contains(prefix)),
        }
    }
}

// ============================================================================
// SCANNER
// ============================================================================

/// Produces the raw references of a component.
pub trait ReferenceScanner {
    /// References made from `scope` whose kind is in `kinds`, unresolved.
    fn scan(&self, profile: &Profile, scope: &SearchScope, kinds: ReferenceKinds) -> Result<Vec<Reference>>;
}

/// References recorded up front, e.g. by an earlier scan.
#[derive(Clone, Debug, Default)]
pub struct RecordedReferences {
    references: Vec<Reference>,
    unavailable: FxHashSet<Arc<str>>,
}

impl RecordedReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reference: Reference) -> Self {
        self.add(reference);
        self
    }

    pub fn add(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    /// Make scans of `component` fail.
    pub fn with_unavailable(mut self, component: impl Into<Arc<str>>) -> Self {
        self.unavailable.insert(component.into());
        self
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl Extend<Reference> for RecordedReferences {
    fn extend<T: IntoIterator<Item = Reference>>(&mut self, iter: T) {
        self.references.extend(iter);
    }
}

impl ReferenceScanner for RecordedReferences {
    fn scan(&self, _profile: &Profile, scope: &SearchScope, kinds: ReferenceKinds) -> Result<Vec<Reference>> {
        if self.unavailable.contains(&scope.component) {
            return Err(AnalysisError::scan(&*scope.component, "no class files available"));
        }
        Ok(self
            .references
            .iter()
            .filter(|r| r.origin_component() == &scope.component)
            .filter(|r| kinds.includes(r.kind()))
            .filter(|r| scope.encloses(r.member().type_name()))
            .map(Reference::unresolved_copy)
            .collect())
    }
}
