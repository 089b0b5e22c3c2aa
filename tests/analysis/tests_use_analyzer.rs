//! Criteria-based use analysis and compatibility checks.

use apiguard::analysis::SearchCriteria;
use apiguard::base::CancellableProgress;
use apiguard::{
    ApiComponent, ApiDescription, ApiMethod, ApiType, ApiUseAnalyzer,
    ElementDescriptor, Modifiers, NullProgress, Profile, ProblemKind, RecordedReferences,
    Reference, ReferenceKind, ReferenceKinds, Restriction, SearchScope, Visibility,
};

use tokio_util::sync::CancellationToken;

use crate::helpers::fixtures::{analyze, ty};

fn lib(version: &str, with_stop: bool) -> ApiComponent {
    let mut service = ApiType::class("com.x.Service")
        .with_method(ApiMethod::constructor("()V"))
        .with_method(ApiMethod::new("run", "()V", Modifiers::PUBLIC));
    if with_stop {
        service = service.with_method(ApiMethod::new("stop", "()V", Modifiers::PUBLIC));
    }
    ApiComponent::new("lib")
        .with_version(version)
        .with_description(
            ApiDescription::new()
                .with_package("com.x", Visibility::API)
                .with_restrictions(ElementDescriptor::of_type("com.x.Service"), Restriction::NO_INSTANTIATE)
                .with_restrictions(
                    ElementDescriptor::of_method("com.x.Service", "stop", "()V"),
                    Restriction::NO_REFERENCE,
                ),
        )
        .with_type(service)
}

fn profile() -> Profile {
    Profile::new().with_component(lib("1.0.0", true)).with_component(
        ApiComponent::new("client").requires("lib").with_type(
            ApiType::class("com.y.Client").with_method(ApiMethod::new("go", "()V", Modifiers::PUBLIC)),
        ),
    )
}

fn references(profile: &Profile) -> Vec<Reference> {
    let go = ty(profile, "client", "com.y.Client").method("go", "()V").unwrap().clone();
    vec![
        Reference::type_reference(go.clone(), "com.x.Service", ReferenceKind::Instantiate).with_line(4),
        Reference::method_reference(go.clone(), "com.x.Service", "run", "()V", ReferenceKind::VirtualMethod),
        Reference::method_reference(go, "com.x.Service", "stop", "()V", ReferenceKind::VirtualMethod).with_line(6),
    ]
}

fn scanner(profile: &Profile) -> RecordedReferences {
    let mut scanner = RecordedReferences::new();
    scanner.extend(references(profile));
    scanner
}

#[test]
fn test_search_agrees_with_detectors() {
    let profile = profile();
    let found = ApiUseAnalyzer::new(&profile)
        .find_illegal_api_use("client", &SearchScope::component("client"), &scanner(&profile), &mut NullProgress)
        .unwrap();
    let mut found_lines: Vec<_> = found.iter().map(|r| r.line()).collect();
    found_lines.sort();

    let problems = analyze(&profile, "client", references(&profile));
    let mut problem_lines: Vec<_> = problems.iter().map(|p| p.line).collect();
    problem_lines.sort();

    assert_eq!(found_lines, vec![Some(4), Some(6)]);
    assert_eq!(found_lines, problem_lines);
}

#[test]
fn test_results_carry_descriptors() {
    let profile = profile();
    let results = ApiUseAnalyzer::new(&profile)
        .search_illegal_api_use("client", &SearchScope::component("client"), &scanner(&profile), &mut NullProgress)
        .unwrap();
    let kinds: Vec<ProblemKind> = results
        .iter()
        .filter_map(|r| r.descriptor.map(|d| d.kind))
        .collect();
    assert_eq!(kinds, vec![ProblemKind::IllegalInstantiate, ProblemKind::IllegalReference]);
}

#[test]
fn test_scope_limited_to_types() {
    let profile = profile();
    let scope = SearchScope::component("client").with_types(["com.y.Other"]);
    let found = ApiUseAnalyzer::new(&profile)
        .find_illegal_api_use("client", &scope, &scanner(&profile), &mut NullProgress)
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_custom_criteria_search() {
    let profile = profile();
    let conditions = vec![SearchCriteria::new(ReferenceKinds::METHOD_CALLS).with_referenced_component("lib")];
    let results = apiguard::analysis::SearchEngine::new(&profile)
        .search(&SearchScope::component("client"), &scanner(&profile), &conditions, &mut NullProgress)
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].references.len(), 2);
}

#[test]
fn test_compatibility_with_older_version() {
    let profile = profile();
    let older = lib("0.9.0", false);
    let same = lib("1.1.0", true);
    let results = ApiUseAnalyzer::new(&profile)
        .analyze_compatibility("client", &[&older, &same], &scanner(&profile), &mut NullProgress)
        .unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(&*results[0].version, "0.9.0");
    assert!(!results[0].is_compatible());
    let missing: Vec<_> = results[0]
        .unresolved
        .iter()
        .filter_map(|r| r.referenced_member_name().map(|n| n.to_string()))
        .collect();
    assert_eq!(missing, vec!["stop"]);

    assert!(results[1].is_compatible());
}

#[test]
fn test_profile_search_progress_counts_components() {
    let profile = profile();
    let mut progress = CancellableProgress::new(CancellationToken::new());
    let found = ApiUseAnalyzer::new(&profile)
        .find_illegal_api_use_in_profile(&scanner(&profile), &mut progress)
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(progress.total(), 2);
    assert_eq!(progress.completed(), 2);
}
