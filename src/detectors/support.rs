//! Helpers shared by the detectors: reporting names, enclosing-chain
//! visibility and component-origin checks.

use std::sync::Arc;

use text_size::TextRange;

use crate::base::{SourceElement, SourceLocator, names};
use crate::error::{AnalysisError, Result};
use crate::model::{ApiAnnotations, ApiMember, ApiType, Profile};
use crate::problems::ProblemFlags;
use crate::reference::Reference;

// ============================================================================
// TYPE LOOKUP
// ============================================================================

/// The type a member belongs to (the member itself for types).
pub fn referencing_type(profile: &Profile, member: &ApiMember) -> Option<Arc<ApiType>> {
    match member {
        ApiMember::Type(ty) => Some(ty.clone()),
        _ => profile.declaring_type(member).cloned(),
    }
}

fn declaring_type(profile: &Profile, member: &ApiMember) -> Result<Arc<ApiType>> {
    profile
        .declaring_type(member)
        .cloned()
        .ok_or_else(|| AnalysisError::missing_type(&**member.component(), &**member.type_name()))
}

fn enclosing_type(profile: &Profile, ty: &ApiType) -> Result<Arc<ApiType>> {
    match profile.enclosing_type(ty) {
        Some(enclosing) => Ok(enclosing.clone()),
        None => Err(AnalysisError::missing_type(
            &*ty.component,
            ty.enclosing_type.as_deref().unwrap_or(&*ty.name),
        )),
    }
}

// ============================================================================
// REPORTING NAMES
// ============================================================================

/// Qualified binary name of the type a problem on `member` is reported
/// against. Local and anonymous types report against their enclosing type.
pub fn type_name(profile: &Profile, member: &ApiMember) -> Result<Arc<str>> {
    match member {
        ApiMember::Type(ty) if ty.anonymous || ty.local => {
            type_name(profile, &ApiMember::Type(enclosing_type(profile, ty)?))
        }
        ApiMember::Type(ty) => Ok(ty.name.clone()),
        _ => type_name(profile, &ApiMember::Type(declaring_type(profile, member)?)),
    }
}

/// Unqualified display name (`Outer.Inner`) of the type of `member`.
pub fn simple_type_name(profile: &Profile, member: &ApiMember) -> Result<String> {
    match member {
        ApiMember::Type(ty) if ty.anonymous || ty.local => {
            simple_type_name(profile, &ApiMember::Type(enclosing_type(profile, ty)?))
        }
        ApiMember::Type(ty) => Ok(names::display_simple_name(&ty.name)),
        _ => simple_type_name(profile, &ApiMember::Type(declaring_type(profile, member)?)),
    }
}

/// Qualified display name (`com.x.Outer.Inner`) of the type of `member`.
///
/// Local types report the top-level type enclosing them.
pub fn qualified_type_name(profile: &Profile, member: &ApiMember) -> Result<String> {
    match member {
        ApiMember::Type(ty) if ty.anonymous => {
            qualified_type_name(profile, &ApiMember::Type(enclosing_type(profile, ty)?))
        }
        ApiMember::Type(ty) if ty.local => {
            let enclosing = type_name(profile, &ApiMember::Type(enclosing_type(profile, ty)?))?;
            Ok(names::top_level_name(&enclosing).to_string())
        }
        ApiMember::Type(ty) => Ok(names::display_qualified_name(&ty.name)),
        _ => qualified_type_name(profile, &ApiMember::Type(declaring_type(profile, member)?)),
    }
}

/// Display name of a resolved or referenced type: `Outer.Inner` or
/// `com.x.Outer.Inner`.
pub fn display_type(type_name: &str, qualified: bool) -> String {
    if qualified {
        names::display_qualified_name(type_name)
    } else {
        names::display_simple_name(type_name)
    }
}

/// Flags for problems reported on an anonymous or local type.
pub fn type_flags(member: &ApiMember) -> ProblemFlags {
    match member {
        ApiMember::Type(ty) if ty.anonymous => ProblemFlags::ANONYMOUS_TYPE,
        ApiMember::Type(ty) if ty.local => ProblemFlags::LOCAL_TYPE,
        _ => ProblemFlags::NO_FLAGS,
    }
}

pub fn is_anonymous(member: &ApiMember) -> bool {
    member.as_type().is_some_and(|ty| ty.anonymous)
}

// ============================================================================
// VISIBILITY & ANNOTATIONS
// ============================================================================

/// Whether `ty` and every type enclosing it is public or protected.
///
/// An enclosing type missing from the model ends the walk as visible.
pub fn is_enclosing_type_visible(profile: &Profile, ty: &ApiType) -> bool {
    if !ty.modifiers.is_visible() {
        return false;
    }
    let mut current = match profile.enclosing_type(ty) {
        Some(enclosing) => enclosing,
        None => return true,
    };
    loop {
        if !current.modifiers.is_visible() {
            return false;
        }
        match profile.enclosing_type(current) {
            Some(enclosing) => current = enclosing,
            None => return true,
        }
    }
}

/// Annotations of a member, treating lookup failures as absent.
pub fn annotations(profile: &Profile, member: &ApiMember) -> Option<ApiAnnotations> {
    match profile.annotations_of(member) {
        Ok(annotations) => annotations,
        Err(err) => {
            tracing::debug!(member = %member, error = %err, "annotation lookup failed");
            None
        }
    }
}

/// Annotations of a type in its own component, treating failures as absent.
pub fn type_annotations(profile: &Profile, ty: &ApiType) -> Option<ApiAnnotations> {
    match profile.resolve_annotations(&ty.component, &ty.descriptor()) {
        Ok(annotations) => annotations,
        Err(err) => {
            tracing::debug!(type_name = %ty.name, error = %err, "annotation lookup failed");
            None
        }
    }
}

// ============================================================================
// COMPONENT ORIGIN
// ============================================================================

/// Whether the resolved element belongs to `owner` (or a fragment of it).
pub fn is_reference_from_component(profile: &Profile, resolved: &ApiMember, owner: &str) -> bool {
    let component = resolved.component();
    &**component == owner || profile.is_fragment_of(component, owner)
}

/// A resolved reference into `owner` from a component that is not exempt.
pub fn is_illegal_use(profile: &Profile, reference: &Reference, owner: &str) -> bool {
    let Some(resolved) = reference.resolved() else {
        return false;
    };
    if !is_reference_from_component(profile, resolved, owner) {
        tracing::trace!(reference = %reference, owner, "resolved outside the restricting component");
        return false;
    }
    !profile.is_origin_exempt(reference.origin_component(), owner)
}

// ============================================================================
// SOURCE POSITIONS
// ============================================================================

/// Locate an element in the source of the type a problem is reported against.
pub fn locate(
    profile: &Profile,
    locator: &dyn SourceLocator,
    reference: &Reference,
    element: SourceElement<'_>,
) -> Option<TextRange> {
    let type_name = type_name(profile, reference.member()).ok()?;
    let range = locator.locate(&type_name, element);
    if range.is_none() {
        tracing::trace!(type_name = %type_name, element = ?element, "no source position");
    }
    range
}

/// Locate the occurrence of `name` on the reference's line, or fall back to
/// the name of the referencing type.
pub fn locate_occurrence(
    profile: &Profile,
    locator: &dyn SourceLocator,
    reference: &Reference,
    name: &str,
) -> Option<TextRange> {
    if let Some(line) = reference.line() {
        if let Some(range) = locate(profile, locator, reference, SourceElement::Occurrence { line, name }) {
            return Some(range);
        }
    }
    locate_type_name(profile, locator, reference)
}

/// Locate the declaration name of the referencing type (or its member).
pub fn locate_declaration(
    profile: &Profile,
    locator: &dyn SourceLocator,
    reference: &Reference,
) -> Option<TextRange> {
    match reference.member() {
        ApiMember::Type(_) => locate_type_name(profile, locator, reference),
        ApiMember::Method(method) => locate(
            profile,
            locator,
            reference,
            SourceElement::Method {
                name: &method.name,
                signature: &method.signature,
            },
        ),
        ApiMember::Field(field) => {
            locate(profile, locator, reference, SourceElement::Field(&field.name))
        }
    }
}

fn locate_type_name(
    profile: &Profile,
    locator: &dyn SourceLocator,
    reference: &Reference,
) -> Option<TextRange> {
    let member = reference.member();
    let name = match member {
        ApiMember::Type(ty) if !ty.anonymous && !ty.local => ty.simple_name().to_string(),
        ApiMember::Type(ty) if ty.local => names::local_simple_name(&ty.name).to_string(),
        _ => names::simple_name(&type_name(profile, member).ok()?).to_string(),
    };
    locate(profile, locator, reference, SourceElement::TypeName(&name))
}
