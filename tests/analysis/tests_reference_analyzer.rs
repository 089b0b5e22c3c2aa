//! Profile-wide problem detection.

use apiguard::base::CancellableProgress;
use apiguard::{
    AnalysisConfig, ApiComponent, ApiDescription, ApiType, BuildStamps, ElementDescriptor,
    NullProgress, Profile, ProblemKind, ProgressMonitor, RecordedReferences, Reference,
    ReferenceAnalyzer, ReferenceKind, Restriction, Visibility,
};
use tokio_util::sync::CancellationToken;

use crate::helpers::fixtures::{client_of, ty};
use crate::helpers::problem_assertions::single_problem;

fn profile() -> Profile {
    Profile::new()
        .with_component(ApiComponent::system("rt").with_type(ApiType::class("java.lang.Object")))
        .with_component(
            ApiComponent::new("lib")
                .with_description(
                    ApiDescription::new()
                        .with_package("com.x", Visibility::API)
                        .with_restrictions(
                            ElementDescriptor::of_type("com.x.Internal"),
                            Restriction::NO_INSTANTIATE,
                        ),
                )
                .with_type(ApiType::class("com.x.Internal")),
        )
        .with_component(client_of("client", "lib", "com.y.A"))
        .with_component(client_of("client2", "lib", "com.z.B"))
}

fn scanner(profile: &Profile) -> RecordedReferences {
    RecordedReferences::new()
        .with(Reference::type_reference(ty(profile, "client", "com.y.A"), "com.x.Internal", ReferenceKind::Instantiate))
        .with(Reference::type_reference(ty(profile, "client2", "com.z.B"), "com.x.Internal", ReferenceKind::Instantiate))
}

#[test]
fn test_profile_report() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let report = ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner(&profile), &(), &BuildStamps::new(), &mut NullProgress)
        .unwrap();

    let analyzed: Vec<&str> = report.problems.keys().map(|id| &**id).collect();
    assert_eq!(analyzed, vec!["lib", "client", "client2"]);
    assert!(report.problems_of("lib").is_empty());
    assert_eq!(single_problem(report.problems_of("client")).kind, ProblemKind::IllegalInstantiate);
    assert_eq!(&*single_problem(report.problems_of("client2")).type_name, "com.z.B");
    assert_eq!(report.len(), 2);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_unavailable_component_is_skipped() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let scanner = scanner(&profile).with_unavailable("client");
    let report = ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner, &(), &BuildStamps::new(), &mut NullProgress)
        .unwrap();
    let skipped: Vec<&str> = report.skipped.iter().map(|id| &**id).collect();
    assert_eq!(skipped, vec!["client"]);
    assert_eq!(report.len(), 1);
}

#[test]
fn test_cancelled_profile_run() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let token = CancellationToken::new();
    token.cancel();
    let mut progress = CancellableProgress::new(token);
    let report = ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner(&profile), &(), &BuildStamps::new(), &mut progress)
        .unwrap();
    assert!(report.cancelled);
    assert!(report.is_empty());
}

#[test]
fn test_scan_disabled() {
    let profile = profile();
    let config = AnalysisConfig::new().with_ignore_api_usage_scan(true);
    let report = ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner(&profile), &(), &BuildStamps::new(), &mut NullProgress)
        .unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_stale_results() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let mut stamps = BuildStamps::new();
    stamps.increment("client");
    let report = ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner(&profile), &(), &stamps, &mut NullProgress)
        .unwrap();
    assert_eq!(report.stamps.get("client"), Some(&1));
    assert_eq!(report.stale_components(&stamps).count(), 0);

    stamps.increment("client2");
    let stale: Vec<&str> = report.stale_components(&stamps).map(|id| &**id).collect();
    assert_eq!(stale, vec!["client2"]);
}

/// Requests cancellation while `component` is resolving its references.
struct CancelWhileResolving {
    component: &'static str,
    current: Option<String>,
    cancelled: bool,
}

impl CancelWhileResolving {
    fn new(component: &'static str) -> Self {
        Self {
            component,
            current: None,
            cancelled: false,
        }
    }
}

impl ProgressMonitor for CancelWhileResolving {
    fn sub_task(&mut self, name: &str) {
        if name == "Resolving references" {
            if self.current.as_deref() == Some(self.component) {
                self.cancelled = true;
            }
        } else {
            self.current = Some(name.to_string());
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[test]
fn test_cancel_during_component_keeps_its_problems() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let mut progress = CancelWhileResolving::new("client");
    let report = ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner(&profile), &(), &BuildStamps::new(), &mut progress)
        .unwrap();

    assert!(report.cancelled);
    let analyzed: Vec<&str> = report.problems.keys().map(|id| &**id).collect();
    assert_eq!(analyzed, vec!["lib", "client"]);
    assert_eq!(single_problem(report.problems_of("client")).kind, ProblemKind::IllegalInstantiate);
    assert!(!report.stamps.contains_key("client2"));
}

#[test]
fn test_cancel_during_single_analysis() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let mut progress = CancelWhileResolving::new("client");
    progress.sub_task("client");
    let problems = ReferenceAnalyzer::new(&profile, &config)
        .analyze(
            "client",
            &apiguard::SearchScope::component("client"),
            &scanner(&profile),
            &(),
            &mut progress,
        )
        .unwrap();
    assert!(progress.is_cancelled());
    assert_eq!(single_problem(&problems).kind, ProblemKind::IllegalInstantiate);
}

#[test]
fn test_progress_counts_components() {
    let profile = profile();
    let config = AnalysisConfig::new();
    let mut progress = CancellableProgress::new(CancellationToken::new());
    ReferenceAnalyzer::new(&profile, &config)
        .analyze_profile(&scanner(&profile), &(), &BuildStamps::new(), &mut progress)
        .unwrap();
    assert_eq!(progress.total(), 3);
    assert_eq!(progress.completed(), 3);
}
