//! Profile fixtures and a one-call analysis driver.

use std::sync::Arc;

use apiguard::{
    AnalysisConfig, ApiComponent, ApiProblem, ApiType, NullProgress, Profile, RecordedReferences,
    Reference, ReferenceAnalyzer, SearchScope,
};

/// Run the reference analyzer over `references` made from `component`.
pub fn analyze(profile: &Profile, component: &str, references: Vec<Reference>) -> Vec<ApiProblem> {
    analyze_with(profile, component, references, &AnalysisConfig::new())
}

/// [`analyze`] with an explicit configuration.
pub fn analyze_with(
    profile: &Profile,
    component: &str,
    references: Vec<Reference>,
    config: &AnalysisConfig,
) -> Vec<ApiProblem> {
    let mut scanner = RecordedReferences::new();
    scanner.extend(references);
    ReferenceAnalyzer::new(profile, config)
        .analyze(
            component,
            &SearchScope::component(component),
            &scanner,
            &(),
            &mut NullProgress,
        )
        .unwrap_or_else(|err| panic!("analysis of '{}' failed: {}", component, err))
}

/// The type `name` declared by `component`.
pub fn ty(profile: &Profile, component: &str, name: &str) -> Arc<ApiType> {
    profile
        .find_type_in(component, name)
        .unwrap_or_else(|| panic!("Expected type '{}' in component '{}'", name, component))
        .clone()
}

/// A component requiring `lib`, declaring one plain class.
pub fn client_of(id: &str, lib: &str, class: &str) -> ApiComponent {
    ApiComponent::new(id)
        .requires(lib)
        .with_type(ApiType::class(class))
}
