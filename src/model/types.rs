//! Types and members of a component.
//!
//! Types are built with chained setters and become immutable once added to
//! an [`ApiComponent`](super::ApiComponent), which stamps the owning
//! component id on the type and all of its members.

use std::fmt;
use std::sync::Arc;

use super::annotations::ElementDescriptor;
use super::modifiers::Modifiers;
use crate::base::{names, signatures};

/// Name of constructor methods.
pub const CONSTRUCTOR_NAME: &str = "<init>";

// ============================================================================
// TYPES
// ============================================================================

/// A class, interface, enum or annotation type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiType {
    pub name: Arc<str>,
    /// Id of the owning component (set when added to a component).
    pub component: Arc<str>,
    pub modifiers: Modifiers,
    pub superclass: Option<Arc<str>>,
    pub super_interfaces: Vec<Arc<str>>,
    /// Qualified name of the enclosing type for nested, local and anonymous types.
    pub enclosing_type: Option<Arc<str>>,
    /// Name and signature of the method declaring a local or anonymous type.
    pub enclosing_method: Option<(Arc<str>, Arc<str>)>,
    pub local: bool,
    pub anonymous: bool,
    pub methods: Vec<Arc<ApiMethod>>,
    pub fields: Vec<Arc<ApiField>>,
}

impl ApiType {
    fn new(name: impl Into<Arc<str>>, modifiers: Modifiers) -> Self {
        let name = name.into();
        let enclosing_type = names::unqualified_name(&name)
            .rfind(names::NESTED_SEPARATOR)
            .map(|idx| {
                let package_len = name.len() - names::unqualified_name(&name).len();
                Arc::from(&name[..package_len + idx])
            });
        Self {
            name,
            component: Arc::from(""),
            modifiers,
            superclass: None,
            super_interfaces: Vec::new(),
            enclosing_type,
            enclosing_method: None,
            local: false,
            anonymous: false,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// A public class.
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, Modifiers::PUBLIC)
    }

    /// A public interface.
    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT)
    }

    /// A public annotation type.
    pub fn annotation(name: impl Into<Arc<str>>) -> Self {
        Self::new(
            name,
            Modifiers::PUBLIC | Modifiers::INTERFACE | Modifiers::ABSTRACT | Modifiers::ANNOTATION,
        )
    }

    /// Replace the modifiers, keeping the interface/annotation kind bits.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        let kind = self.modifiers & (Modifiers::INTERFACE | Modifiers::ANNOTATION | Modifiers::ENUM);
        self.modifiers = modifiers | kind;
        self
    }

    pub fn extends(mut self, superclass: impl Into<Arc<str>>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<Arc<str>>) -> Self {
        self.super_interfaces.push(interface.into());
        self
    }

    /// Mark as a local type declared in the given method.
    pub fn local_in(mut self, method: &str, signature: &str) -> Self {
        self.local = true;
        self.enclosing_method = Some((Arc::from(method), Arc::from(signature)));
        self
    }

    /// Mark as an anonymous type declared in the given method.
    pub fn anonymous_in(mut self, method: &str, signature: &str) -> Self {
        self.anonymous = true;
        self.enclosing_method = Some((Arc::from(method), Arc::from(signature)));
        self
    }

    pub fn with_method(mut self, method: ApiMethod) -> Self {
        let mut method = method;
        method.enclosing_type = self.name.clone();
        self.methods.push(Arc::new(method));
        self
    }

    pub fn with_field(mut self, field: ApiField) -> Self {
        let mut field = field;
        field.enclosing_type = self.name.clone();
        self.fields.push(Arc::new(field));
        self
    }

    pub(crate) fn set_component(&mut self, component: &Arc<str>) {
        self.component = component.clone();
        for method in &mut self.methods {
            Arc::make_mut(method).component = component.clone();
        }
        for field in &mut self.fields {
            Arc::make_mut(field).component = component.clone();
        }
    }

    pub fn is_interface(&self) -> bool {
        self.modifiers.is_interface()
    }

    pub fn is_annotation(&self) -> bool {
        self.modifiers.is_annotation()
    }

    pub fn is_member_type(&self) -> bool {
        self.enclosing_type.is_some() && !self.local && !self.anonymous
    }

    pub fn package(&self) -> &str {
        names::package_name(&self.name)
    }

    pub fn simple_name(&self) -> &str {
        names::simple_name(&self.name)
    }

    /// Finds a declared method by name and signature.
    pub fn method(&self, name: &str, signature: &str) -> Option<&Arc<ApiMethod>> {
        self.methods
            .iter()
            .find(|m| &*m.name == name && &*m.signature == signature)
    }

    /// Finds a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Arc<ApiField>> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub fn descriptor(&self) -> ElementDescriptor {
        ElementDescriptor::of_type(self.name.clone())
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

/// A method or constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiMethod {
    pub name: Arc<str>,
    /// Method descriptor, e.g. `(Ljava/lang/String;)V`.
    pub signature: Arc<str>,
    pub modifiers: Modifiers,
    pub enclosing_type: Arc<str>,
    pub component: Arc<str>,
    /// A non-abstract interface method.
    pub default_method: bool,
}

impl ApiMethod {
    pub fn new(name: impl Into<Arc<str>>, signature: impl Into<Arc<str>>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
            modifiers,
            enclosing_type: Arc::from(""),
            component: Arc::from(""),
            default_method: false,
        }
    }

    /// A public constructor.
    pub fn constructor(signature: impl Into<Arc<str>>) -> Self {
        Self::new(CONSTRUCTOR_NAME, signature, Modifiers::PUBLIC)
    }

    /// Mark as a default interface method.
    pub fn default_method(mut self) -> Self {
        self.default_method = true;
        self
    }

    pub fn is_constructor(&self) -> bool {
        &*self.name == CONSTRUCTOR_NAME
    }

    pub fn is_synthetic(&self) -> bool {
        self.modifiers.is_synthetic()
    }

    /// Display form, e.g. `foo(String, int)`; constructors use the type's simple name.
    pub fn display_name(&self) -> String {
        let name = if self.is_constructor() {
            names::simple_name(&self.enclosing_type)
        } else {
            &self.name
        };
        signatures::display_method(name, &self.signature)
    }

    pub fn descriptor(&self) -> ElementDescriptor {
        ElementDescriptor::of_method(
            self.enclosing_type.clone(),
            self.name.clone(),
            self.signature.clone(),
        )
    }
}

/// A field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiField {
    pub name: Arc<str>,
    /// Qualified name of the field's declared type (`int` for primitives).
    pub field_type: Arc<str>,
    pub modifiers: Modifiers,
    pub enclosing_type: Arc<str>,
    pub component: Arc<str>,
}

impl ApiField {
    pub fn new(name: impl Into<Arc<str>>, field_type: impl Into<Arc<str>>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            modifiers,
            enclosing_type: Arc::from(""),
            component: Arc::from(""),
        }
    }

    pub fn descriptor(&self) -> ElementDescriptor {
        ElementDescriptor::of_field(self.enclosing_type.clone(), self.name.clone())
    }
}

/// Any type or member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiMember {
    Type(Arc<ApiType>),
    Method(Arc<ApiMethod>),
    Field(Arc<ApiField>),
}

impl ApiMember {
    pub fn name(&self) -> &str {
        match self {
            ApiMember::Type(t) => &t.name,
            ApiMember::Method(m) => &m.name,
            ApiMember::Field(f) => &f.name,
        }
    }

    /// The owning component id.
    pub fn component(&self) -> &Arc<str> {
        match self {
            ApiMember::Type(t) => &t.component,
            ApiMember::Method(m) => &m.component,
            ApiMember::Field(f) => &f.component,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            ApiMember::Type(t) => t.modifiers,
            ApiMember::Method(m) => m.modifiers,
            ApiMember::Field(f) => f.modifiers,
        }
    }

    /// The type itself, or the type declaring the member.
    pub fn type_name(&self) -> &Arc<str> {
        match self {
            ApiMember::Type(t) => &t.name,
            ApiMember::Method(m) => &m.enclosing_type,
            ApiMember::Field(f) => &f.enclosing_type,
        }
    }

    /// The enclosing type's name; for types, the type enclosing them.
    pub fn enclosing_type(&self) -> Option<&Arc<str>> {
        match self {
            ApiMember::Type(t) => t.enclosing_type.as_ref(),
            ApiMember::Method(m) => Some(&m.enclosing_type),
            ApiMember::Field(f) => Some(&f.enclosing_type),
        }
    }

    pub fn as_type(&self) -> Option<&Arc<ApiType>> {
        match self {
            ApiMember::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Arc<ApiMethod>> {
        match self {
            ApiMember::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&Arc<ApiField>> {
        match self {
            ApiMember::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> ElementDescriptor {
        match self {
            ApiMember::Type(t) => t.descriptor(),
            ApiMember::Method(m) => m.descriptor(),
            ApiMember::Field(f) => f.descriptor(),
        }
    }

    /// Whether both handles point at the same declaration.
    pub fn same_declaration(&self, other: &ApiMember) -> bool {
        match (self, other) {
            (ApiMember::Type(a), ApiMember::Type(b)) => Arc::ptr_eq(a, b),
            (ApiMember::Method(a), ApiMember::Method(b)) => Arc::ptr_eq(a, b),
            (ApiMember::Field(a), ApiMember::Field(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for ApiMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiMember::Type(t) => write!(f, "{}", t.name),
            ApiMember::Method(m) => write!(f, "{}#{}{}", m.enclosing_type, m.name, m.signature),
            ApiMember::Field(field) => write!(f, "{}#{}", field.enclosing_type, field.name),
        }
    }
}

impl From<Arc<ApiType>> for ApiMember {
    fn from(t: Arc<ApiType>) -> Self {
        ApiMember::Type(t)
    }
}

impl From<Arc<ApiMethod>> for ApiMember {
    fn from(m: Arc<ApiMethod>) -> Self {
        ApiMember::Method(m)
    }
}

impl From<Arc<ApiField>> for ApiMember {
    fn from(f: Arc<ApiField>) -> Self {
        ApiMember::Field(f)
    }
}
