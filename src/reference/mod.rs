//! References from a member to another type, method or field.
//!
//! A [`Reference`] starts unresolved. The resolver writes its target once;
//! afterwards the reference is read-only. References are shared between
//! detectors as `Rc<Reference>`.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::model::ApiMember;

mod kind;

pub use kind::{ReferenceKind, ReferenceKinds};

/// What kind of element a reference points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetType {
    Type,
    Method,
    Field,
}

bitflags! {
    /// Extra information recorded by the scanner.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ReferenceFlags: u8 {
        /// The call may dispatch to a default interface method.
        const DEFAULT_METHOD = 0x01;
    }
}

/// Structural key shared by references that resolve identically.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub component: Arc<str>,
    pub type_name: Arc<str>,
    pub member_name: Option<Arc<str>>,
    pub signature: Option<Arc<str>>,
    /// Method lookup restricted to super interfaces.
    pub interface_method: bool,
    /// Method lookup continuing into the super interfaces of classes.
    pub default_method: bool,
}

/// A reference from `member` to a type, method or field.
#[derive(Clone, Debug)]
pub struct Reference {
    member: ApiMember,
    line: Option<u32>,
    kind: ReferenceKind,
    target: TargetType,
    type_name: Arc<str>,
    member_name: Option<Arc<str>>,
    signature: Option<Arc<str>>,
    flags: ReferenceFlags,
    /// Unset until resolved; `Some(None)` once resolution failed.
    resolution: OnceCell<Option<ApiMember>>,
}

impl Reference {
    fn new(
        member: ApiMember,
        kind: ReferenceKind,
        target: TargetType,
        type_name: Arc<str>,
        member_name: Option<Arc<str>>,
        signature: Option<Arc<str>>,
    ) -> Self {
        Self {
            member,
            line: None,
            kind,
            target,
            type_name,
            member_name,
            signature,
            flags: ReferenceFlags::empty(),
            resolution: OnceCell::new(),
        }
    }

    /// A reference to a type.
    pub fn type_reference(
        member: impl Into<ApiMember>,
        type_name: impl Into<Arc<str>>,
        kind: ReferenceKind,
    ) -> Self {
        Self::new(member.into(), kind, TargetType::Type, type_name.into(), None, None)
    }

    /// A reference to a method.
    pub fn method_reference(
        member: impl Into<ApiMember>,
        type_name: impl Into<Arc<str>>,
        method_name: impl Into<Arc<str>>,
        signature: impl Into<Arc<str>>,
        kind: ReferenceKind,
    ) -> Self {
        Self::new(
            member.into(),
            kind,
            TargetType::Method,
            type_name.into(),
            Some(method_name.into()),
            Some(signature.into()),
        )
    }

    /// A reference to a field.
    pub fn field_reference(
        member: impl Into<ApiMember>,
        type_name: impl Into<Arc<str>>,
        field_name: impl Into<Arc<str>>,
        kind: ReferenceKind,
    ) -> Self {
        Self::new(
            member.into(),
            kind,
            TargetType::Field,
            type_name.into(),
            Some(field_name.into()),
            None,
        )
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_flags(mut self, flags: ReferenceFlags) -> Self {
        self.flags |= flags;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// The referencing member.
    pub fn member(&self) -> &ApiMember {
        &self.member
    }

    /// Id of the component containing the referencing member.
    pub fn origin_component(&self) -> &Arc<str> {
        self.member.component()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn target(&self) -> TargetType {
        self.target
    }

    pub fn flags(&self) -> ReferenceFlags {
        self.flags
    }

    pub fn referenced_type_name(&self) -> &Arc<str> {
        &self.type_name
    }

    pub fn referenced_member_name(&self) -> Option<&Arc<str>> {
        self.member_name.as_ref()
    }

    pub fn referenced_signature(&self) -> Option<&Arc<str>> {
        self.signature.as_ref()
    }

    pub fn resolution_key(&self) -> ResolutionKey {
        ResolutionKey {
            component: self.origin_component().clone(),
            type_name: self.type_name.clone(),
            member_name: self.member_name.clone(),
            signature: self.signature.clone(),
            interface_method: self.kind == ReferenceKind::InterfaceMethod,
            default_method: self.flags.contains(ReferenceFlags::DEFAULT_METHOD),
        }
    }

    // ========================================================================
    // RESOLUTION
    // ========================================================================

    /// Record the resolved target. Returns `false` (and keeps the first
    /// value) if the reference was already resolved.
    pub fn set_resolution(&self, target: Option<ApiMember>) -> bool {
        self.resolution.set(target).is_ok()
    }

    /// Whether resolution has been attempted.
    pub fn is_resolved(&self) -> bool {
        self.resolution.get().is_some()
    }

    /// The resolved target; `None` if unresolved or resolution failed.
    pub fn resolved(&self) -> Option<&ApiMember> {
        self.resolution.get().and_then(Option::as_ref)
    }

    /// A copy of this reference with an empty resolution slot.
    pub fn unresolved_copy(&self) -> Self {
        Self {
            resolution: OnceCell::new(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.member, self.type_name)?;
        if let Some(name) = &self.member_name {
            write!(f, "#{name}")?;
        }
        if let Some(signature) = &self.signature {
            write!(f, "{signature}")?;
        }
        write!(f, " [{}]", self.kind)?;
        if let Some(line) = self.line {
            write!(f, " line {line}")?;
        }
        Ok(())
    }
}
