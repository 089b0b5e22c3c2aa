//! Reference kinds and kind masks.

use std::fmt;

use bitflags::bitflags;

/// How a member refers to another element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Extends,
    Implements,
    Instantiate,
    Override,
    VirtualMethod,
    StaticMethod,
    SpecialMethod,
    InterfaceMethod,
    ConstructorMethod,
    GetField,
    PutField,
    GetStatic,
    PutStatic,
    Parameter,
    ReturnType,
    FieldDecl,
    AnnotationUse,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 17] = [
        ReferenceKind::Extends,
        ReferenceKind::Implements,
        ReferenceKind::Instantiate,
        ReferenceKind::Override,
        ReferenceKind::VirtualMethod,
        ReferenceKind::StaticMethod,
        ReferenceKind::SpecialMethod,
        ReferenceKind::InterfaceMethod,
        ReferenceKind::ConstructorMethod,
        ReferenceKind::GetField,
        ReferenceKind::PutField,
        ReferenceKind::GetStatic,
        ReferenceKind::PutStatic,
        ReferenceKind::Parameter,
        ReferenceKind::ReturnType,
        ReferenceKind::FieldDecl,
        ReferenceKind::AnnotationUse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Extends => "EXTENDS",
            ReferenceKind::Implements => "IMPLEMENTS",
            ReferenceKind::Instantiate => "INSTANTIATE",
            ReferenceKind::Override => "OVERRIDE",
            ReferenceKind::VirtualMethod => "VIRTUAL_METHOD",
            ReferenceKind::StaticMethod => "STATIC_METHOD",
            ReferenceKind::SpecialMethod => "SPECIAL_METHOD",
            ReferenceKind::InterfaceMethod => "INTERFACE_METHOD",
            ReferenceKind::ConstructorMethod => "CONSTRUCTOR_METHOD",
            ReferenceKind::GetField => "GET_FIELD",
            ReferenceKind::PutField => "PUT_FIELD",
            ReferenceKind::GetStatic => "GET_STATIC",
            ReferenceKind::PutStatic => "PUT_STATIC",
            ReferenceKind::Parameter => "PARAMETER",
            ReferenceKind::ReturnType => "RETURN_TYPE",
            ReferenceKind::FieldDecl => "FIELD_DECL",
            ReferenceKind::AnnotationUse => "ANNOTATION_USE",
        }
    }

    /// The single-kind mask.
    pub fn mask(self) -> ReferenceKinds {
        match self {
            ReferenceKind::Extends => ReferenceKinds::EXTENDS,
            ReferenceKind::Implements => ReferenceKinds::IMPLEMENTS,
            ReferenceKind::Instantiate => ReferenceKinds::INSTANTIATE,
            ReferenceKind::Override => ReferenceKinds::OVERRIDE,
            ReferenceKind::VirtualMethod => ReferenceKinds::VIRTUAL_METHOD,
            ReferenceKind::StaticMethod => ReferenceKinds::STATIC_METHOD,
            ReferenceKind::SpecialMethod => ReferenceKinds::SPECIAL_METHOD,
            ReferenceKind::InterfaceMethod => ReferenceKinds::INTERFACE_METHOD,
            ReferenceKind::ConstructorMethod => ReferenceKinds::CONSTRUCTOR_METHOD,
            ReferenceKind::GetField => ReferenceKinds::GET_FIELD,
            ReferenceKind::PutField => ReferenceKinds::PUT_FIELD,
            ReferenceKind::GetStatic => ReferenceKinds::GET_STATIC,
            ReferenceKind::PutStatic => ReferenceKinds::PUT_STATIC,
            ReferenceKind::Parameter => ReferenceKinds::PARAMETER,
            ReferenceKind::ReturnType => ReferenceKinds::RETURN_TYPE,
            ReferenceKind::FieldDecl => ReferenceKinds::FIELD_DECL,
            ReferenceKind::AnnotationUse => ReferenceKinds::ANNOTATION_USE,
        }
    }

    pub fn is_method_call(self) -> bool {
        ReferenceKinds::METHOD_CALLS.contains(self.mask())
    }

    pub fn is_field_access(self) -> bool {
        ReferenceKinds::FIELD_ACCESS.contains(self.mask())
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of reference kinds.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ReferenceKinds: u32 {
        const EXTENDS = 1 << 0;
        const IMPLEMENTS = 1 << 1;
        const INSTANTIATE = 1 << 2;
        const OVERRIDE = 1 << 3;
        const VIRTUAL_METHOD = 1 << 4;
        const STATIC_METHOD = 1 << 5;
        const SPECIAL_METHOD = 1 << 6;
        const INTERFACE_METHOD = 1 << 7;
        const CONSTRUCTOR_METHOD = 1 << 8;
        const GET_FIELD = 1 << 9;
        const PUT_FIELD = 1 << 10;
        const GET_STATIC = 1 << 11;
        const PUT_STATIC = 1 << 12;
        const PARAMETER = 1 << 13;
        const RETURN_TYPE = 1 << 14;
        const FIELD_DECL = 1 << 15;
        const ANNOTATION_USE = 1 << 16;

        const METHOD_CALLS = Self::VIRTUAL_METHOD.bits()
            | Self::STATIC_METHOD.bits()
            | Self::SPECIAL_METHOD.bits()
            | Self::INTERFACE_METHOD.bits()
            | Self::CONSTRUCTOR_METHOD.bits();
        const FIELD_ACCESS = Self::GET_FIELD.bits()
            | Self::PUT_FIELD.bits()
            | Self::GET_STATIC.bits()
            | Self::PUT_STATIC.bits();
        const ALL = (1 << 17) - 1;
    }
}

impl ReferenceKinds {
    /// Whether the mask includes `kind`.
    pub fn includes(self, kind: ReferenceKind) -> bool {
        self.contains(kind.mask())
    }

    /// The individual kinds of this mask, in declaration order.
    pub fn kinds(self) -> impl Iterator<Item = ReferenceKind> {
        ReferenceKind::ALL
            .into_iter()
            .filter(move |kind| self.includes(*kind))
    }
}

impl From<ReferenceKind> for ReferenceKinds {
    fn from(kind: ReferenceKind) -> Self {
        kind.mask()
    }
}

impl fmt::Display for ReferenceKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("UNKNOWN_KIND");
        }
        for (i, kind) in self.kinds().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(kind.as_str())?;
        }
        Ok(())
    }
}
