//! Illegal use of restricted elements.

use std::rc::Rc;

use apiguard::detectors::{DetectionContext, IllegalMethodReferenceDetector, ProblemDetector};
use apiguard::{
    AnalysisConfig, ApiComponent, ApiDescription, ApiField, ApiMethod, ApiType, ElementDescriptor,
    ElementType, Modifiers, NullProgress, Profile, ProblemFlags, ProblemKind, RecordedReferences,
    Reference, ReferenceAnalyzer, ReferenceFlags, ReferenceKind, Restriction, SearchScope, Severity,
    SeverityConfig, SourceElement, SourceMap, TextRange, Visibility,
};
use rstest::rstest;

use crate::helpers::fixtures::{analyze, analyze_with, client_of, ty};
use crate::helpers::problem_assertions::{assert_no_problems, assert_problem, single_problem};

fn lib() -> ApiComponent {
    ApiComponent::new("lib")
        .with_description(
            ApiDescription::new()
                .with_package("com.x", Visibility::API)
                .with_restrictions(ElementDescriptor::of_type("com.x.Internal"), Restriction::NO_INSTANTIATE)
                .with_restrictions(ElementDescriptor::of_type("com.x.Base"), Restriction::NO_EXTEND)
                .with_restrictions(ElementDescriptor::of_type("com.x.Callback"), Restriction::NO_IMPLEMENT)
                .with_restrictions(ElementDescriptor::of_type("com.x.Marker"), Restriction::NO_REFERENCE)
                .with_restrictions(ElementDescriptor::of_type("com.x.Outer"), Restriction::NO_REFERENCE)
                .with_restrictions(
                    ElementDescriptor::of_method("com.x.Service", "run", "()V"),
                    Restriction::NO_REFERENCE,
                )
                .with_restrictions(
                    ElementDescriptor::of_method("com.x.Service", "hook", "()V"),
                    Restriction::NO_OVERRIDE,
                )
                .with_restrictions(
                    ElementDescriptor::of_field("com.x.Service", "counter"),
                    Restriction::NO_REFERENCE,
                ),
        )
        .with_type(ApiType::class("com.x.Internal").with_method(ApiMethod::constructor("()V")))
        .with_type(ApiType::class("com.x.Base"))
        .with_type(ApiType::interface("com.x.Callback"))
        .with_type(ApiType::annotation("com.x.Marker"))
        .with_type(ApiType::class("com.x.Outer"))
        .with_type(
            ApiType::class("com.x.Outer$Inner")
                .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
                .with_method(ApiMethod::new("foo", "()V", Modifiers::PUBLIC)),
        )
        .with_type(
            ApiType::class("com.x.Service")
                .with_method(ApiMethod::new("run", "()V", Modifiers::PUBLIC))
                .with_method(ApiMethod::new("run", "(I)V", Modifiers::PUBLIC))
                .with_method(ApiMethod::new("hook", "()V", Modifiers::PUBLIC))
                .with_field(ApiField::new("counter", "int", Modifiers::PUBLIC)),
        )
}

fn client() -> ApiComponent {
    ApiComponent::new("client").requires("lib").with_type(
        ApiType::class("com.y.Client")
            .with_method(ApiMethod::new("go", "()V", Modifiers::PUBLIC))
            .with_method(ApiMethod::new("hook", "()V", Modifiers::PUBLIC)),
    )
}

fn profile() -> Profile {
    Profile::new().with_component(lib()).with_component(client())
}

fn go(profile: &Profile) -> std::sync::Arc<ApiMethod> {
    ty(profile, "client", "com.y.Client").method("go", "()V").unwrap().clone()
}

fn reference(profile: &Profile, case: &str) -> Reference {
    let client = ty(profile, "client", "com.y.Client");
    let go = go(profile);
    match case {
        "extend" => Reference::type_reference(client, "com.x.Base", ReferenceKind::Extends),
        "implement" => Reference::type_reference(client, "com.x.Callback", ReferenceKind::Implements),
        "instantiate" => Reference::type_reference(go, "com.x.Internal", ReferenceKind::Instantiate),
        "call" => Reference::method_reference(go, "com.x.Service", "run", "()V", ReferenceKind::VirtualMethod),
        "override" => {
            let hook = client.method("hook", "()V").unwrap().clone();
            Reference::method_reference(hook, "com.x.Service", "hook", "()V", ReferenceKind::Override)
        }
        "field" => Reference::field_reference(go, "com.x.Service", "counter", ReferenceKind::GetField),
        "annotation" => Reference::type_reference(client, "com.x.Marker", ReferenceKind::AnnotationUse),
        other => panic!("unknown case {}", other),
    }
}

// ============================================================================
// RESTRICTIONS
// ============================================================================

#[rstest]
#[case("extend", ProblemKind::IllegalExtend, ElementType::Type, ProblemFlags::NO_FLAGS)]
#[case("implement", ProblemKind::IllegalImplement, ElementType::Type, ProblemFlags::NO_FLAGS)]
#[case("instantiate", ProblemKind::IllegalInstantiate, ElementType::Type, ProblemFlags::NO_FLAGS)]
#[case("call", ProblemKind::IllegalReference, ElementType::Method, ProblemFlags::METHOD)]
#[case("override", ProblemKind::IllegalOverride, ElementType::Method, ProblemFlags::NO_FLAGS)]
#[case("field", ProblemKind::IllegalReference, ElementType::Field, ProblemFlags::FIELD)]
#[case("annotation", ProblemKind::IllegalReference, ElementType::Type, ProblemFlags::ANNOTATION)]
fn test_restricted_use_is_reported(
    #[case] case: &str,
    #[case] kind: ProblemKind,
    #[case] element_type: ElementType,
    #[case] flags: ProblemFlags,
) {
    let profile = profile();
    let problems = analyze(&profile, "client", vec![reference(&profile, case)]);
    let problem = single_problem(&problems);
    assert_problem(problem, kind, flags);
    assert_eq!(problem.element_type, element_type);
    assert_eq!(&*problem.type_name, "com.y.Client");
}

#[test]
fn test_instantiate_problem_details() {
    let profile = profile();
    let reference = reference(&profile, "instantiate").with_line(3);
    let problems = analyze(&profile, "client", vec![reference]);
    let problem = single_problem(&problems);
    assert_eq!(problem.message_args, vec!["Internal"]);
    assert_eq!(problem.qualified_message_args, vec!["com.x.Internal"]);
    assert_eq!(problem.line, Some(3));
    assert_eq!(problem.severity, Severity::Error);
    assert_eq!(problem.message(), "Illegally instantiates Internal");
    assert_eq!(problem.qualified_message(), "Illegally instantiates com.x.Internal");
}

#[test]
fn test_method_problem_message() {
    let profile = profile();
    let problems = analyze(&profile, "client", vec![reference(&profile, "call")]);
    let problem = single_problem(&problems);
    assert_eq!(problem.message_args, vec!["Service", "run()", "Client"]);
    assert_eq!(problem.message(), "Illegal reference to method Service.run() from Client");
}

#[test]
fn test_overload_of_restricted_method_is_not_reported() {
    let profile = profile();
    let call = Reference::method_reference(
        go(&profile),
        "com.x.Service",
        "run",
        "(I)V",
        ReferenceKind::VirtualMethod,
    );
    assert_no_problems(&analyze(&profile, "client", vec![call]));
}

#[test]
fn test_member_of_nested_type_in_restricted_type() {
    let profile = profile();
    let call = Reference::method_reference(
        go(&profile),
        "com.x.Outer$Inner",
        "foo",
        "()V",
        ReferenceKind::VirtualMethod,
    );
    let problems = analyze(&profile, "client", vec![call]);
    let problem = single_problem(&problems);
    assert_problem(problem, ProblemKind::IllegalReference, ProblemFlags::METHOD);
    assert_eq!(problem.message_args[0], "Outer.Inner");
}

#[test]
fn test_unresolved_reference_is_not_reported() {
    let profile = profile();
    let call = Reference::method_reference(
        go(&profile),
        "com.x.Service",
        "missing",
        "()V",
        ReferenceKind::VirtualMethod,
    );
    assert_no_problems(&analyze(&profile, "client", vec![call]));
}

#[test]
fn test_each_reference_is_reported() {
    let profile = profile();
    let problems = analyze(
        &profile,
        "client",
        vec![
            reference(&profile, "instantiate").with_line(3),
            reference(&profile, "instantiate").with_line(7),
        ],
    );
    let lines: Vec<_> = problems.iter().map(|p| p.line).collect();
    assert_eq!(lines, vec![Some(3), Some(7)]);
}

// ============================================================================
// EXEMPTIONS
// ============================================================================

#[rstest]
#[case::fragment(ApiComponent::new("frag").fragment_of("lib").with_type(ApiType::class("com.f.Frag")), "com.f.Frag")]
#[case::reexport(ApiComponent::new("bridge").reexports("lib").with_type(ApiType::class("com.b.Bridge")), "com.b.Bridge")]
fn test_exempt_origin(#[case] origin: ApiComponent, #[case] class: &str) {
    let id = origin.id.clone();
    let profile = Profile::new().with_component(lib()).with_component(origin);
    let from = ty(&profile, &id, class);
    let instantiate = Reference::type_reference(from, "com.x.Internal", ReferenceKind::Instantiate);
    assert_no_problems(&analyze(&profile, &id, vec![instantiate]));
}

#[test]
fn test_own_restrictions_do_not_apply() {
    let profile = Profile::new().with_component(
        lib().with_type(ApiType::class("com.x.Factory").with_method(ApiMethod::new("make", "()V", Modifiers::PUBLIC))),
    );
    let make = ty(&profile, "lib", "com.x.Factory").method("make", "()V").unwrap().clone();
    let instantiate = Reference::type_reference(make, "com.x.Internal", ReferenceKind::Instantiate);
    assert_no_problems(&analyze(&profile, "lib", vec![instantiate]));
}

#[test]
fn test_resolved_outside_restricting_component_is_not_reported() {
    // `other` is searched first and declares its own com.x.Internal.
    let profile = Profile::new()
        .with_component(lib())
        .with_component(ApiComponent::new("other").with_type(ApiType::class("com.x.Internal")))
        .with_component(
            ApiComponent::new("client")
                .requires("other")
                .requires("lib")
                .with_type(ApiType::class("com.y.Client")),
        );
    let from = ty(&profile, "client", "com.y.Client");
    let instantiate = Reference::type_reference(from, "com.x.Internal", ReferenceKind::Instantiate);
    assert_no_problems(&analyze(&profile, "client", vec![instantiate]));
}

#[test]
fn test_second_client_is_reported() {
    let profile = Profile::new()
        .with_component(lib())
        .with_component(client_of("client2", "lib", "com.z.Other"));
    let from = ty(&profile, "client2", "com.z.Other");
    let instantiate = Reference::type_reference(from, "com.x.Internal", ReferenceKind::Instantiate);
    let problems = analyze(&profile, "client2", vec![instantiate]);
    assert_eq!(&*single_problem(&problems).type_name, "com.z.Other");
}

// ============================================================================
// INDIRECT IMPLEMENTS
// ============================================================================

fn indirect_profile() -> Profile {
    Profile::new()
        .with_component(
            ApiComponent::new("a")
                .with_description(
                    ApiDescription::new()
                        .with_package("com.a", Visibility::API)
                        .with_restrictions(
                            ElementDescriptor::of_type("com.a.Restricted"),
                            Restriction::NO_IMPLEMENT,
                        ),
                )
                .with_type(ApiType::interface("com.a.Restricted")),
        )
        .with_component(
            ApiComponent::new("b")
                .requires("a")
                .with_type(ApiType::interface("com.b.Mid").implements("com.a.Restricted")),
        )
        .with_component(
            ApiComponent::new("d")
                .requires("b")
                .with_type(
                    ApiType::class("com.d.C")
                        .implements("com.b.Mid")
                        .with_method(ApiMethod::new("run", "()V", Modifiers::PUBLIC)),
                )
                .with_type(
                    ApiType::class("com.d.C$1Worker")
                        .local_in("run", "()V")
                        .implements("com.b.Mid"),
                ),
        )
}

#[rstest]
#[case::member_type("com.d.C", ProblemFlags::INDIRECT_REFERENCE)]
#[case::local_type("com.d.C$1Worker", ProblemFlags::INDIRECT_LOCAL_REFERENCE)]
fn test_indirect_implements_through_other_component(#[case] implementer: &str, #[case] flags: ProblemFlags) {
    let profile = indirect_profile();
    let implementing = ty(&profile, "d", implementer);
    let implements = Reference::type_reference(implementing, "com.b.Mid", ReferenceKind::Implements);
    let problems = analyze(&profile, "d", vec![implements]);
    let problem = single_problem(&problems);
    assert_problem(problem, ProblemKind::IllegalImplement, flags);
    assert_eq!(problem.message_args, vec!["Mid", "C", "Restricted"]);
}

#[test]
fn test_indirect_implements_message() {
    let profile = indirect_profile();
    let implements = Reference::type_reference(ty(&profile, "d", "com.d.C"), "com.b.Mid", ReferenceKind::Implements);
    let problems = analyze(&profile, "d", vec![implements]);
    assert_eq!(single_problem(&problems).message(), "C illegally implements Restricted via Mid");
}

// ============================================================================
// DEFAULT METHODS
// ============================================================================

fn default_method_profile() -> Profile {
    let lib = ApiComponent::new("lib")
        .with_description(
            ApiDescription::new()
                .with_package("com.x", Visibility::API)
                .with_restrictions(
                    ElementDescriptor::of_method("com.x.Shape", "describe", "()V"),
                    Restriction::NO_REFERENCE,
                ),
        )
        .with_type(
            ApiType::interface("com.x.Shape")
                .with_method(ApiMethod::new("describe", "()V", Modifiers::PUBLIC).default_method()),
        )
        .with_type(ApiType::class("com.x.Square").implements("com.x.Shape"));
    Profile::new().with_component(lib).with_component(client())
}

fn describe_call(profile: &Profile, flags: ReferenceFlags) -> Reference {
    Reference::method_reference(go(profile), "com.x.Square", "describe", "()V", ReferenceKind::VirtualMethod)
        .with_flags(flags)
}

#[rstest]
#[case::default_method(ReferenceFlags::DEFAULT_METHOD, true)]
#[case::plain_call(ReferenceFlags::empty(), false)]
fn test_default_method_retry(#[case] flags: ReferenceFlags, #[case] accepted: bool) {
    let profile = default_method_profile();
    let ctx = DetectionContext::new(&profile);
    let mut detector = IllegalMethodReferenceDetector::new();
    detector.add_illegal_method("com.x.Shape", "describe", "()V", "lib".into());

    let reference = Rc::new(describe_call(&profile, flags));
    assert_eq!(detector.consider_reference(&ctx, &reference), accepted);
    assert_eq!(detector.retained_references().len(), usize::from(accepted));
}

#[test]
fn test_default_method_call_is_reported() {
    let profile = default_method_profile();
    let problems = analyze(&profile, "client", vec![describe_call(&profile, ReferenceFlags::DEFAULT_METHOD)]);
    let problem = single_problem(&problems);
    assert_problem(problem, ProblemKind::IllegalReference, ProblemFlags::METHOD);
    assert_eq!(problem.message_args[0], "Shape");
}

// ============================================================================
// CONFIGURATION & POSITIONS
// ============================================================================

#[test]
fn test_configured_severity() {
    let profile = profile();
    let config = AnalysisConfig::new()
        .with_severities(SeverityConfig::uniform(Severity::Warning))
        .with_severity("ILLEGAL_EXTEND", Severity::Error);
    let problems = analyze_with(&profile, "client", vec![reference(&profile, "instantiate")], &config);
    assert_eq!(single_problem(&problems).severity, Severity::Warning);
}

#[test]
fn test_ignored_category() {
    let profile = profile();
    let config = AnalysisConfig::new().with_severity("ILLEGAL_INSTANTIATE", Severity::Ignore);
    let problems = analyze_with(
        &profile,
        "client",
        vec![reference(&profile, "instantiate"), reference(&profile, "extend")],
        &config,
    );
    assert_problem(single_problem(&problems), ProblemKind::IllegalExtend, ProblemFlags::NO_FLAGS);
}

#[test]
fn test_source_range_of_occurrence() {
    let profile = profile();
    let range = TextRange::new(40.into(), 48.into());
    let locator = SourceMap::new().with(
        "com.y.Client",
        SourceElement::Occurrence { line: 3, name: "Internal" },
        range,
    );
    let scanner = RecordedReferences::new().with(reference(&profile, "instantiate").with_line(3));
    let config = AnalysisConfig::new();
    let problems = ReferenceAnalyzer::new(&profile, &config)
        .analyze("client", &SearchScope::component("client"), &scanner, &locator, &mut NullProgress)
        .unwrap();
    assert_eq!(single_problem(&problems).range, Some(range));
}
