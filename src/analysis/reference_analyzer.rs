//! Detector-driven API use analysis.
//!
//! For one component:
//!
//! 1. build the detectors from the prerequisites' API descriptions
//! 2. scan the component for the kinds the detectors look at
//! 3. offer every reference to every detector
//! 4. resolve the retained references in one batch
//! 5. collect the problems of each detector

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;

use super::build_stamps::BuildStamps;
use super::scanner::{ReferenceScanner, SearchScope};
use crate::base::{ProgressMonitor, SourceLocator, SubProgress};
use crate::detectors::{DetectionContext, ProblemDetectorBuilder};
use crate::error::{AnalysisError, Result};
use crate::model::{ApiComponent, Profile};
use crate::problems::{AnalysisConfig, ApiProblem};
use crate::reference::{Reference, ReferenceKinds};

/// Problems found across a profile.
#[derive(Clone, Debug, Default)]
pub struct AnalysisReport {
    /// Problems per analyzed component, in profile order.
    pub problems: IndexMap<Arc<str>, Vec<ApiProblem>>,
    /// Build stamp of each analyzed component at analysis time.
    pub stamps: IndexMap<Arc<str>, u64>,
    /// Components whose references could not be scanned.
    pub skipped: Vec<Arc<str>>,
    /// Whether the run stopped early.
    pub cancelled: bool,
}

impl AnalysisReport {
    /// Total number of problems.
    pub fn len(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn problems_of(&self, component: &str) -> &[ApiProblem] {
        self.problems.get(component).map_or(&[], Vec::as_slice)
    }

    /// Components whose results are out of date.
    pub fn stale_components<'r>(&'r self, stamps: &'r BuildStamps) -> impl Iterator<Item = &'r Arc<str>> + 'r {
        self.stamps
            .iter()
            .filter(|(id, seen)| stamps.is_stale(id, **seen))
            .map(|(id, _)| id)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ReferenceAnalyzer<'a> {
    profile: &'a Profile,
    config: &'a AnalysisConfig,
}

impl<'a> ReferenceAnalyzer<'a> {
    pub fn new(profile: &'a Profile, config: &'a AnalysisConfig) -> Self {
        Self { profile, config }
    }

    /// Problems in the references made from `scope` of `component`.
    ///
    /// A started analysis runs to completion; cancellation is only observed
    /// between components by [`ReferenceAnalyzer::analyze_profile`].
    pub fn analyze(
        &self,
        component: &str,
        scope: &SearchScope,
        scanner: &dyn ReferenceScanner,
        locator: &dyn SourceLocator,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<Vec<ApiProblem>> {
        let start = Instant::now();
        let mut detectors = ProblemDetectorBuilder::new(self.profile, component, self.config).build()?;
        if detectors.is_empty() {
            return Ok(Vec::new());
        }

        let kinds = detectors
            .iter()
            .fold(ReferenceKinds::empty(), |acc, d| acc | d.reference_kinds());
        let scanned = scanner.scan(self.profile, scope, kinds)?;
        let scanned_count = scanned.len();

        let ctx = DetectionContext::new(self.profile);
        let mut retained: Vec<Rc<Reference>> = Vec::new();
        for reference in scanned {
            let reference = Rc::new(reference);
            let mut kept = false;
            for detector in detectors.iter_mut() {
                kept |= detector.consider_reference(&ctx, &reference);
            }
            if kept {
                retained.push(reference);
            }
        }

        ctx.resolver
            .resolve_references(&retained, &mut SubProgress::uninterruptible(progress));

        let mut problems = Vec::new();
        for detector in &detectors {
            problems.extend(detector.create_problems(&ctx, locator, &self.config.severities));
        }
        tracing::debug!(
            component,
            scanned = scanned_count,
            retained = retained.len(),
            problems = problems.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analyzed references"
        );
        Ok(problems)
    }

    /// [`ReferenceAnalyzer::analyze`] for every non-system component.
    ///
    /// Components whose scan fails are recorded as skipped. Cancellation is
    /// checked between components.
    pub fn analyze_profile(
        &self,
        scanner: &dyn ReferenceScanner,
        locator: &dyn SourceLocator,
        stamps: &BuildStamps,
        progress: &mut dyn ProgressMonitor,
    ) -> Result<AnalysisReport> {
        let components: Vec<&ApiComponent> =
            self.profile.components().filter(|c| !c.system).collect();
        progress.begin_task("Analyzing API use", components.len());
        let mut report = AnalysisReport::default();
        for component in components {
            if progress.is_cancelled() {
                report.cancelled = true;
                break;
            }
            progress.sub_task(&component.id);
            let scope = SearchScope::component(component.id.clone());
            let stamp = stamps.stamp(&component.id);
            match self.analyze(&component.id, &scope, scanner, locator, progress) {
                Ok(problems) => {
                    report.problems.insert(component.id.clone(), problems);
                    report.stamps.insert(component.id.clone(), stamp);
                }
                Err(err @ AnalysisError::Scan { .. }) => {
                    tracing::warn!(component = %component.id, error = %err, "skipping component");
                    report.skipped.push(component.id.clone());
                }
                Err(err) => return Err(err),
            }
            progress.worked(1);
        }
        progress.done();
        Ok(report)
    }
}
