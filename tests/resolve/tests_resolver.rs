//! Resolution of references through the component graph.

use std::rc::Rc;

use apiguard::base::CancellableProgress;
use apiguard::{
    ApiComponent, ApiField, ApiMember, ApiMethod, ApiType, Modifiers, NullProgress, Profile,
    Reference, ReferenceFlags, ReferenceKind, ReferenceResolver,
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::fixtures::ty;

fn profile() -> Profile {
    let lib = ApiComponent::new("lib")
        .with_version("1.0.0")
        .with_type(
            ApiType::interface("com.x.Shape")
                .with_method(ApiMethod::new("area", "()D", Modifiers::PUBLIC | Modifiers::ABSTRACT))
                .with_method(ApiMethod::new("describe", "()Ljava/lang/String;", Modifiers::PUBLIC).default_method())
                .with_field(ApiField::new("UNIT", "double", Modifiers::PUBLIC | Modifiers::STATIC)),
        )
        .with_type(
            ApiType::interface("com.x.Solid")
                .implements("com.x.Shape"),
        )
        .with_type(
            ApiType::class("com.x.Base")
                .with_method(ApiMethod::new("run", "()V", Modifiers::PUBLIC))
                .with_method(ApiMethod::new("bridge", "()V", Modifiers::PUBLIC | Modifiers::SYNTHETIC))
                .with_field(ApiField::new("count", "int", Modifiers::PUBLIC)),
        )
        .with_type(
            ApiType::class("com.x.Square")
                .extends("com.x.Base")
                .implements("com.x.Shape")
                .with_method(ApiMethod::new("area", "()D", Modifiers::PUBLIC)),
        );
    let client = ApiComponent::new("client").requires("lib").with_type(
        ApiType::class("com.y.Client")
            .with_method(ApiMethod::new("a", "()V", Modifiers::PUBLIC))
            .with_method(ApiMethod::new("b", "()V", Modifiers::PUBLIC)),
    );
    Profile::new().with_component(lib).with_component(client)
}

fn from(profile: &Profile, method: &str) -> std::sync::Arc<ApiMethod> {
    ty(profile, "client", "com.y.Client").method(method, "()V").unwrap().clone()
}

fn declaring_type(member: Option<&ApiMember>) -> Option<String> {
    member.map(|m| m.type_name().to_string())
}

// ============================================================================
// LOOKUP
// ============================================================================

#[rstest]
#[case::declared("com.x.Square", "area", "()D", ReferenceKind::VirtualMethod, Some("com.x.Square"))]
#[case::inherited("com.x.Square", "run", "()V", ReferenceKind::VirtualMethod, Some("com.x.Base"))]
#[case::interface_method("com.x.Solid", "area", "()D", ReferenceKind::InterfaceMethod, Some("com.x.Shape"))]
#[case::synthetic("com.x.Base", "bridge", "()V", ReferenceKind::VirtualMethod, None)]
#[case::missing("com.x.Base", "stop", "()V", ReferenceKind::VirtualMethod, None)]
#[case::missing_type("com.x.Gone", "run", "()V", ReferenceKind::VirtualMethod, None)]
fn test_method_lookup(
    #[case] type_name: &str,
    #[case] name: &str,
    #[case] signature: &str,
    #[case] kind: ReferenceKind,
    #[case] expected: Option<&str>,
) {
    let profile = profile();
    let reference = Reference::method_reference(from(&profile, "a"), type_name, name, signature, kind);
    let resolver = ReferenceResolver::new(&profile);
    let resolved = resolver.resolve_one(&reference);
    assert_eq!(declaring_type(resolved.as_ref()), expected.map(str::to_string));
    assert!(reference.is_resolved());
}

#[test]
fn test_default_method_through_class() {
    let profile = profile();
    let reference = Reference::method_reference(
        from(&profile, "a"),
        "com.x.Square",
        "describe",
        "()Ljava/lang/String;",
        ReferenceKind::VirtualMethod,
    )
    .with_flags(ReferenceFlags::DEFAULT_METHOD);
    let resolved = ReferenceResolver::new(&profile).resolve_one(&reference);
    assert_eq!(declaring_type(resolved.as_ref()).as_deref(), Some("com.x.Shape"));
}

#[rstest]
#[case::declared("com.x.Base", "count", Some("com.x.Base"))]
#[case::superclass("com.x.Square", "count", Some("com.x.Base"))]
#[case::interface("com.x.Square", "UNIT", Some("com.x.Shape"))]
#[case::missing("com.x.Square", "none", None)]
fn test_field_lookup(#[case] type_name: &str, #[case] field: &str, #[case] expected: Option<&str>) {
    let profile = profile();
    let reference = Reference::field_reference(from(&profile, "a"), type_name, field, ReferenceKind::GetField);
    let resolved = ReferenceResolver::new(&profile).resolve_one(&reference);
    assert_eq!(declaring_type(resolved.as_ref()), expected.map(str::to_string));
}

// ============================================================================
// BULK RESOLUTION
// ============================================================================

#[test]
fn test_equal_references_share_resolution() {
    let profile = profile();
    let references: Vec<Rc<Reference>> = ["a", "b", "a"]
        .into_iter()
        .map(|m| {
            Rc::new(Reference::method_reference(
                from(&profile, m),
                "com.x.Square",
                "run",
                "()V",
                ReferenceKind::VirtualMethod,
            ))
        })
        .collect();
    assert!(ReferenceResolver::new(&profile).resolve_references(&references, &mut NullProgress));
    let first = references[0].resolved().cloned();
    assert!(first.is_some());
    assert!(references.iter().all(|r| r.resolved().cloned() == first));
}

#[test]
fn test_default_method_lookup_is_not_shared_with_plain_calls() {
    let profile = profile();
    let describe = |flags: ReferenceFlags| {
        Rc::new(
            Reference::method_reference(
                from(&profile, "a"),
                "com.x.Square",
                "describe",
                "()Ljava/lang/String;",
                ReferenceKind::VirtualMethod,
            )
            .with_flags(flags),
        )
    };
    let plain = describe(ReferenceFlags::empty());
    let default = describe(ReferenceFlags::DEFAULT_METHOD);
    assert_ne!(plain.resolution_key(), default.resolution_key());

    let references = vec![plain.clone(), default.clone()];
    assert!(ReferenceResolver::new(&profile).resolve_references(&references, &mut NullProgress));
    assert!(plain.is_resolved());
    assert!(plain.resolved().is_none());
    assert_eq!(declaring_type(default.resolved()).as_deref(), Some("com.x.Shape"));
}

#[test]
fn test_resolution_is_idempotent() {
    let profile = profile();
    let reference = Rc::new(Reference::type_reference(
        from(&profile, "a"),
        "com.x.Base",
        ReferenceKind::Instantiate,
    ));
    let references = vec![reference.clone()];
    let resolver = ReferenceResolver::new(&profile);
    assert!(resolver.resolve_references(&references, &mut NullProgress));
    let first = reference.resolved().cloned();
    assert!(resolver.resolve_references(&references, &mut NullProgress));
    assert_eq!(reference.resolved().cloned(), first);
    // The slot is set once.
    assert!(!reference.set_resolution(None));
    assert_eq!(reference.resolved().cloned(), first);
}

#[test]
fn test_cancelled_resolution() {
    let profile = profile();
    let token = CancellationToken::new();
    token.cancel();
    let mut progress = CancellableProgress::new(token);
    let reference = Rc::new(Reference::type_reference(
        from(&profile, "a"),
        "com.x.Base",
        ReferenceKind::Instantiate,
    ));
    let resolved = ReferenceResolver::new(&profile).resolve_references(&[reference.clone()], &mut progress);
    assert!(!resolved);
    assert!(!reference.is_resolved());
}

#[test]
fn test_resolve_against_other_version() {
    let profile = profile();
    let older = ApiComponent::new("lib")
        .with_version("0.9.0")
        .with_type(ApiType::class("com.x.Base").with_method(ApiMethod::new("run", "()V", Modifiers::PUBLIC)));
    let resolver = ReferenceResolver::new(&profile);

    let run = Reference::method_reference(from(&profile, "a"), "com.x.Base", "run", "()V", ReferenceKind::VirtualMethod);
    let count = Reference::field_reference(from(&profile, "a"), "com.x.Base", "count", ReferenceKind::GetField);
    assert!(resolver.resolve_against(&run, &older).is_some());
    assert!(resolver.resolve_against(&count, &older).is_none());
    // Checking against another version leaves the reference unresolved.
    assert!(!run.is_resolved());
}
