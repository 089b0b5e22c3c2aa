//! API leak detectors.
//!
//! A leak is a non-API type appearing in the API surface of a component:
//! a super class, an implemented interface, a field type, a parameter type
//! or a return type of a visible member.
//!
//! A reference is a *candidate* when the referenced type lives in a non-API
//! package, in the referencing type's own package, or when the referencing
//! member is marked no-implement or no-extend. A candidate is *confirmed*
//! when the referenced type is annotated private, or has no annotations and
//! is not reachable through a visible enclosing-type chain.

use std::rc::Rc;
use std::sync::Arc;

use super::registry::NonApiPackages;
use super::{DetectionContext, support};
use crate::base::names;
use crate::error::Result;
use crate::model::{ApiMember, ApiType, Restriction};
use crate::reference::Reference;

mod extends;
mod field;
mod implements;
mod parameter;
mod return_type;

pub use extends::LeakExtendsDetector;
pub use field::LeakFieldDetector;
pub use implements::LeakImplementsDetector;
pub use parameter::LeakParameterDetector;
pub use return_type::LeakReturnTypeDetector;

/// State shared by every leak detector.
#[derive(Debug, Default)]
pub(crate) struct LeakState {
    non_api_packages: Rc<NonApiPackages>,
    retained: Vec<Rc<Reference>>,
}

impl LeakState {
    pub(crate) fn new(non_api_packages: Rc<NonApiPackages>) -> Self {
        Self {
            non_api_packages,
            retained: Vec::new(),
        }
    }

    /// Pre-resolution filter shared by the leak detectors.
    pub(crate) fn accepts(&self, ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
        is_non_api_reference(ctx, &self.non_api_packages, reference)
            && is_api_member(ctx, reference.member())
    }
}

// ============================================================================
// CANDIDATES
// ============================================================================

/// Whether the reference may expose a non-API type.
pub fn is_non_api_reference(
    ctx: &DetectionContext<'_>,
    non_api_packages: &NonApiPackages,
    reference: &Reference,
) -> bool {
    let referenced_package = names::package_name(reference.referenced_type_name());
    if non_api_packages.contains(referenced_package) {
        return true;
    }
    if names::package_name(reference.member().type_name()) == referenced_package {
        return true;
    }
    support::annotations(ctx.profile, reference.member()).is_some_and(|a| {
        a.restrictions
            .intersects(Restriction::NO_IMPLEMENT | Restriction::NO_EXTEND)
    })
}

/// Whether a member is part of the API surface: public or protected, not
/// synthetic, declared API (when described) and reachable through visible
/// enclosing types.
pub fn is_api_member(ctx: &DetectionContext<'_>, member: &ApiMember) -> bool {
    let modifiers = member.modifiers();
    if !modifiers.is_visible() || modifiers.is_synthetic() {
        return false;
    }
    if support::annotations(ctx.profile, member).is_some_and(|a| !a.visibility.is_api()) {
        return false;
    }
    match support::referencing_type(ctx.profile, member) {
        Some(ty) => support::is_enclosing_type_visible(ctx.profile, &ty),
        None => true,
    }
}

// ============================================================================
// CONFIRMATION
// ============================================================================

/// Whether a referenced type is not API.
pub fn is_leaked_type(ctx: &DetectionContext<'_>, ty: &ApiType) -> bool {
    match support::type_annotations(ctx.profile, ty) {
        Some(annotations) => annotations.visibility.is_private(),
        None => {
            if !support::is_enclosing_type_visible(ctx.profile, ty) {
                return true;
            }
            if !names::is_runtime_package(ty.package()) {
                tracing::info!(type_name = %ty.name, "visible type without API description");
            }
            false
        }
    }
}

/// The resolved type of a retained reference.
pub fn resolved_type(reference: &Reference) -> Option<&Arc<ApiType>> {
    reference.resolved().and_then(ApiMember::as_type)
}

/// Base leak rule on the resolved type.
pub fn is_leak(ctx: &DetectionContext<'_>, reference: &Reference) -> bool {
    resolved_type(reference).is_some_and(|ty| is_leaked_type(ctx, ty))
}

/// Whether the resolved type is package-default. Such a type in a visible
/// signature cannot be named by callers outside its package.
pub fn is_package_default_type(reference: &Reference) -> bool {
    resolved_type(reference).is_some_and(|ty| ty.modifiers.is_package_default())
}

/// Protected members of a type that cannot be subclassed are unreachable.
pub fn is_protected_exempt(ctx: &DetectionContext<'_>, member: &ApiMember) -> bool {
    if !member.modifiers().is_protected() {
        return false;
    }
    let Some(ty) = ctx.profile.declaring_type(member) else {
        return false;
    };
    ty.modifiers.is_final()
        || support::type_annotations(ctx.profile, ty)
            .is_some_and(|a| a.restrictions.contains(Restriction::NO_EXTEND))
}

// ============================================================================
// MESSAGE ARGUMENTS
// ============================================================================

/// `[referenced type, referencing type]`, plus `detail` when given.
pub fn leak_args(
    ctx: &DetectionContext<'_>,
    reference: &Reference,
    detail: Option<String>,
    qualified: bool,
) -> Result<Vec<String>> {
    let referencing = if qualified {
        support::qualified_type_name(ctx.profile, reference.member())?
    } else {
        support::simple_type_name(ctx.profile, reference.member())?
    };
    let mut args = vec![
        support::display_type(reference.referenced_type_name(), qualified),
        referencing,
    ];
    args.extend(detail);
    Ok(args)
}

/// Display form of the referencing method, if the member is one.
pub fn method_detail(reference: &Reference) -> Option<String> {
    reference.member().as_method().map(|m| m.display_name())
}
