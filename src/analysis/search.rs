//! Criteria-driven reference search.
//!
//! A search scans the scope once for the union of the criteria's reference
//! kinds, keeps references that potentially match some criteria, resolves
//! them in one batch and files each reference under the first criteria it
//! fully matches.

use std::rc::Rc;
use std::time::Instant;

use super::criteria::{ProblemDescriptor, SearchCriteria};
use super::scanner::{ReferenceScanner, SearchScope};
use crate::base::{ProgressMonitor, SubProgress};
use crate::error::Result;
use crate::model::Profile;
use crate::reference::{Reference, ReferenceKinds};
use crate::resolve::ReferenceResolver;

/// References matching one criteria.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Index of the criteria in the searched list.
    pub criteria: usize,
    pub descriptor: Option<ProblemDescriptor>,
    pub references: Vec<Rc<Reference>>,
}

#[derive(Clone, Copy, Debug)]
pub struct SearchEngine<'a> {
    profile: &'a Profile,
}

impl<'a> SearchEngine<'a> {
    pub fn new(profile: &'a Profile) -> Self {
        Self { profile }
    }

    /// Search `scope` for references matching `conditions`.
    ///
    /// Returns one result per criteria with at least one match, in criteria
    /// order. A cancelled search returns no results.
    pub fn search(
        &self,
        scope: &SearchScope,
        scanner: &dyn ReferenceScanner,
        conditions: &[SearchCriteria],
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Vec<SearchResult>> {
        if conditions.is_empty() {
            return Ok(Vec::new());
        }
        let mut progress = SubProgress::new(progress);
        progress.begin_task("Searching API references", 3);

        // 1. extract
        progress.sub_task("Extracting references");
        let start = Instant::now();
        let kinds = conditions
            .iter()
            .fold(ReferenceKinds::empty(), |acc, c| acc | c.reference_kinds);
        let mut candidates: Vec<(Rc<Reference>, Vec<usize>)> = Vec::new();
        for reference in scanner.scan(self.profile, scope, kinds)? {
            let matching: Vec<usize> = conditions
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_potential_match(&reference))
                .map(|(index, _)| index)
                .collect();
            if !matching.is_empty() {
                candidates.push((Rc::new(reference), matching));
            }
        }
        tracing::debug!(
            component = %scope.component,
            candidates = candidates.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "extracted references"
        );
        progress.worked(1);
        if progress.is_cancelled() {
            return Ok(Vec::new());
        }

        // 2. resolve
        progress.sub_task("Resolving references");
        let references: Vec<Rc<Reference>> = candidates.iter().map(|(r, _)| r.clone()).collect();
        if !ReferenceResolver::new(self.profile).resolve_references(&references, &mut progress) {
            return Ok(Vec::new());
        }
        progress.worked(1);

        // 3. filter
        progress.sub_task("Applying search conditions");
        let mut matches: Vec<Vec<Rc<Reference>>> = vec![Vec::new(); conditions.len()];
        for (reference, potential) in candidates {
            let first = potential
                .into_iter()
                .find(|&index| conditions[index].is_match(self.profile, &reference));
            if let Some(index) = first {
                matches[index].push(reference);
            }
        }
        progress.worked(1);
        progress.done();

        Ok(matches
            .into_iter()
            .enumerate()
            .filter(|(_, refs)| !refs.is_empty())
            .map(|(index, references)| SearchResult {
                criteria: index,
                descriptor: conditions[index].descriptor,
                references,
            })
            .collect())
    }
}
