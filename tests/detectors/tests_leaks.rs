//! Non-API types leaking through the API surface.

use apiguard::{
    ApiComponent, ApiDescription, ApiField, ApiMethod, ApiType, ElementDescriptor, ElementType,
    Modifiers, Profile, ProblemFlags, ProblemKind, Reference, ReferenceKind, Restriction, Visibility,
};
use rstest::rstest;

use crate::helpers::fixtures::{analyze, ty};
use crate::helpers::problem_assertions::{assert_no_problems, assert_problem, of_kind, single_problem};

const HIDDEN: &str = "com.x.internal.Hidden";

fn profile() -> Profile {
    let lib = ApiComponent::new("lib")
        .with_description(
            ApiDescription::new()
                .with_package("com.x", Visibility::API)
                .with_package("com.x.internal", Visibility::PRIVATE)
                .with_restrictions(ElementDescriptor::of_type("com.x.Sealed"), Restriction::NO_EXTEND)
                .with_restrictions(ElementDescriptor::of_type("com.x.Callback"), Restriction::NO_IMPLEMENT)
                .with_restrictions(ElementDescriptor::of_type("com.x.Plugin"), Restriction::NO_IMPLEMENT)
                .with_restrictions(ElementDescriptor::of_type("com.x.Gate"), Restriction::NO_EXTEND)
                .with_restrictions(ElementDescriptor::of_type("com.x.Port"), Restriction::NO_IMPLEMENT),
        )
        .with_type(ApiType::class(HIDDEN))
        .with_type(ApiType::interface("com.x.internal.HiddenApi"))
        .with_type(
            ApiType::class("com.x.internal.Impl")
                .with_field(ApiField::new("shared", HIDDEN, Modifiers::PUBLIC)),
        )
        .with_type(ApiType::class("com.x.Api"))
        .with_type(
            ApiType::class("com.x.Widget")
                .with_field(ApiField::new("shared", HIDDEN, Modifiers::PUBLIC))
                .with_field(ApiField::new("guarded", HIDDEN, Modifiers::PROTECTED))
                .with_field(ApiField::new("secret", HIDDEN, Modifiers::PRIVATE))
                .with_field(ApiField::new("api", "com.x.Api", Modifiers::PUBLIC))
                .with_method(ApiMethod::new("make", "()Lcom/x/internal/Hidden;", Modifiers::PUBLIC))
                .with_method(ApiMethod::new("use", "(Lcom/x/internal/Hidden;)V", Modifiers::PUBLIC))
                .with_method(ApiMethod::constructor("(Lcom/x/internal/Hidden;)V"))
                .with_method(ApiMethod::new("take", "(Lcom/x/PkgDefault;)V", Modifiers::PUBLIC)),
        )
        .with_type(ApiType::class("com.x.PkgDefault").with_modifiers(Modifiers::empty()))
        .with_type(ApiType::interface("com.x.Callback"))
        .with_type(ApiType::class("com.x.Handler").implements("com.x.Callback"))
        .with_type(ApiType::class("com.x.Plugin").implements("com.x.Callback"))
        .with_type(ApiType::class("com.z.Loose").with_modifiers(Modifiers::empty()))
        .with_type(ApiType::class("com.x.Gate").extends("com.z.Loose"))
        .with_type(ApiType::class("com.x.Port").extends("com.z.Loose"))
        .with_type(ApiType::class("com.x.Open").extends("com.z.Loose"))
        .with_type(
            ApiType::class("com.x.Sealed")
                .with_field(ApiField::new("inner", HIDDEN, Modifiers::PROTECTED)),
        )
        .with_type(
            ApiType::class("com.x.Closed")
                .with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
                .with_method(ApiMethod::new("make", "()Lcom/x/internal/Hidden;", Modifiers::PROTECTED)),
        )
        .with_type(ApiType::class("com.x.Sub").extends(HIDDEN))
        .with_type(ApiType::class("com.x.Impl").implements("com.x.internal.HiddenApi"));
    Profile::new().with_component(lib)
}

fn field_decl(profile: &Profile, type_name: &str, field: &str) -> Reference {
    let field = ty(profile, "lib", type_name).field(field).unwrap().clone();
    let field_type = field.field_type.clone();
    Reference::type_reference(field, field_type, ReferenceKind::FieldDecl)
}

fn method_ref(profile: &Profile, type_name: &str, name: &str, signature: &str, kind: ReferenceKind) -> Reference {
    let method = ty(profile, "lib", type_name).method(name, signature).unwrap().clone();
    Reference::type_reference(method, HIDDEN, kind)
}

// ============================================================================
// LEAKS
// ============================================================================

#[rstest]
#[case::field("field", ProblemFlags::LEAK_FIELD, ElementType::Field, &["Hidden", "Widget", "shared"])]
#[case::protected_field("protected-field", ProblemFlags::LEAK_FIELD, ElementType::Field, &["Hidden", "Widget", "guarded"])]
#[case::return_type("return", ProblemFlags::LEAK_RETURN_TYPE, ElementType::Method, &["Hidden", "Widget", "make()"])]
#[case::parameter("parameter", ProblemFlags::LEAK_METHOD_PARAMETER, ElementType::Method, &["Hidden", "Widget", "use(Hidden)"])]
#[case::constructor("constructor", ProblemFlags::LEAK_CONSTRUCTOR_PARAMETER, ElementType::Method, &["Hidden", "Widget", "Widget(Hidden)"])]
#[case::extends("extends", ProblemFlags::LEAK_EXTENDS, ElementType::Type, &["Hidden", "Sub"])]
#[case::implements("implements", ProblemFlags::LEAK_IMPLEMENTS, ElementType::Type, &["HiddenApi", "Impl"])]
fn test_leak_is_reported(
    #[case] case: &str,
    #[case] flags: ProblemFlags,
    #[case] element_type: ElementType,
    #[case] args: &[&str],
) {
    let profile = profile();
    let reference = match case {
        "field" => field_decl(&profile, "com.x.Widget", "shared"),
        "protected-field" => field_decl(&profile, "com.x.Widget", "guarded"),
        "return" => method_ref(&profile, "com.x.Widget", "make", "()Lcom/x/internal/Hidden;", ReferenceKind::ReturnType),
        "parameter" => method_ref(&profile, "com.x.Widget", "use", "(Lcom/x/internal/Hidden;)V", ReferenceKind::Parameter),
        "constructor" => method_ref(&profile, "com.x.Widget", "<init>", "(Lcom/x/internal/Hidden;)V", ReferenceKind::Parameter),
        "extends" => Reference::type_reference(ty(&profile, "lib", "com.x.Sub"), HIDDEN, ReferenceKind::Extends),
        "implements" => Reference::type_reference(
            ty(&profile, "lib", "com.x.Impl"),
            "com.x.internal.HiddenApi",
            ReferenceKind::Implements,
        ),
        other => panic!("unknown case {}", other),
    };
    let problems = analyze(&profile, "lib", vec![reference]);
    let problem = single_problem(&problems);
    assert_problem(problem, ProblemKind::ApiLeak, flags);
    assert_eq!(problem.element_type, element_type);
    assert_eq!(problem.message_args, args);
}

#[test]
fn test_field_leak_message() {
    let profile = profile();
    let problems = analyze(&profile, "lib", vec![field_decl(&profile, "com.x.Widget", "shared")]);
    assert_eq!(
        single_problem(&problems).message(),
        "Field Widget.shared leaks non-API type Hidden"
    );
    assert_eq!(
        single_problem(&problems).qualified_message_args,
        vec!["com.x.internal.Hidden", "com.x.Widget", "shared"]
    );
}

#[test]
fn test_package_default_parameter_of_void_method() {
    let profile = profile();
    let take = ty(&profile, "lib", "com.x.Widget").method("take", "(Lcom/x/PkgDefault;)V").unwrap().clone();
    let reference = Reference::type_reference(take, "com.x.PkgDefault", ReferenceKind::Parameter);
    let problems = analyze(&profile, "lib", vec![reference]);
    let problem = single_problem(&problems);
    assert_problem(problem, ProblemKind::ApiLeak, ProblemFlags::LEAK_METHOD_PARAMETER);
    assert_eq!(problem.message_args, vec!["PkgDefault", "Widget", "take(PkgDefault)"]);
}

#[rstest]
#[case::open_implementer("com.x.Handler", true)]
#[case::no_implement_implementer("com.x.Plugin", false)]
fn test_implementing_no_implement_interface(#[case] implementer: &str, #[case] reported: bool) {
    let profile = profile();
    let reference = Reference::type_reference(ty(&profile, "lib", implementer), "com.x.Callback", ReferenceKind::Implements);
    let problems = analyze(&profile, "lib", vec![reference]);
    if reported {
        let problem = single_problem(&problems);
        assert_problem(problem, ProblemKind::ApiLeak, ProblemFlags::LEAK_IMPLEMENTS);
        assert_eq!(problem.message_args, vec!["Callback", "Handler"]);
    } else {
        assert_no_problems(&problems);
    }
}

/// `com.z` is neither described nor the referencing package, so only the
/// referencing type's own restrictions make the reference a candidate.
#[rstest]
#[case::no_extend("com.x.Gate", true)]
#[case::no_implement("com.x.Port", true)]
#[case::unrestricted("com.x.Open", false)]
fn test_restricted_member_is_leak_candidate(#[case] subclass: &str, #[case] reported: bool) {
    let profile = profile();
    let reference = Reference::type_reference(ty(&profile, "lib", subclass), "com.z.Loose", ReferenceKind::Extends);
    let problems = analyze(&profile, "lib", vec![reference]);
    if reported {
        let problem = single_problem(&problems);
        assert_problem(problem, ProblemKind::ApiLeak, ProblemFlags::LEAK_EXTENDS);
        assert_eq!(problem.message_args[0], "Loose");
    } else {
        assert_no_problems(&problems);
    }
}

// ============================================================================
// NOT LEAKS
// ============================================================================

#[test]
fn test_protected_member_of_no_extend_type() {
    let profile = profile();
    assert_no_problems(&analyze(&profile, "lib", vec![field_decl(&profile, "com.x.Sealed", "inner")]));
}

#[test]
fn test_protected_member_of_final_type() {
    let profile = profile();
    let reference = method_ref(&profile, "com.x.Closed", "make", "()Lcom/x/internal/Hidden;", ReferenceKind::ReturnType);
    assert_no_problems(&analyze(&profile, "lib", vec![reference]));
}

#[test]
fn test_private_member_is_not_api() {
    let profile = profile();
    assert_no_problems(&analyze(&profile, "lib", vec![field_decl(&profile, "com.x.Widget", "secret")]));
}

#[test]
fn test_member_of_non_api_type() {
    let profile = profile();
    assert_no_problems(&analyze(&profile, "lib", vec![field_decl(&profile, "com.x.internal.Impl", "shared")]));
}

#[test]
fn test_api_type_in_own_package() {
    let profile = profile();
    assert_no_problems(&analyze(&profile, "lib", vec![field_decl(&profile, "com.x.Widget", "api")]));
}

#[test]
fn test_all_leaks_in_one_pass() {
    let profile = profile();
    let references = vec![
        field_decl(&profile, "com.x.Widget", "shared"),
        field_decl(&profile, "com.x.Sealed", "inner"),
        method_ref(&profile, "com.x.Widget", "make", "()Lcom/x/internal/Hidden;", ReferenceKind::ReturnType),
        Reference::type_reference(ty(&profile, "lib", "com.x.Sub"), HIDDEN, ReferenceKind::Extends),
    ];
    let problems = analyze(&profile, "lib", references);
    assert_eq!(of_kind(&problems, ProblemKind::ApiLeak).len(), 3);
}
