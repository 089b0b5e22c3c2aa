//! API visibility, restrictions and per-component API descriptions.
//!
//! An [`ApiDescription`] records annotations for packages, types and
//! members. Resolution follows the element path
//! (package → outer types → type → member): visibility is inherited from the
//! closest annotated ancestor, restrictions apply only to the element that
//! declares them.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::base::names;

bitflags! {
    /// Declared API visibility of an element.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Visibility: u8 {
        const API = 0x01;
        const SPI = 0x02;
        const PRIVATE = 0x04;
        const PRIVATE_PERMISSIBLE = 0x08;
        const ALL = Self::API.bits() | Self::SPI.bits() | Self::PRIVATE.bits() | Self::PRIVATE_PERMISSIBLE.bits();
    }
}

impl Visibility {
    pub fn is_api(self) -> bool {
        self.contains(Visibility::API)
    }

    pub fn is_private(self) -> bool {
        self.contains(Visibility::PRIVATE)
    }
}

bitflags! {
    /// Restrictions placed on clients of an element.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Restriction: u8 {
        const NO_EXTEND = 0x01;
        const NO_IMPLEMENT = 0x02;
        const NO_INSTANTIATE = 0x04;
        const NO_REFERENCE = 0x08;
        const NO_OVERRIDE = 0x10;
        const ALL = Self::NO_EXTEND.bits()
            | Self::NO_IMPLEMENT.bits()
            | Self::NO_INSTANTIATE.bits()
            | Self::NO_REFERENCE.bits()
            | Self::NO_OVERRIDE.bits();
    }
}

impl Restriction {
    pub const UNRESTRICTED: Restriction = Restriction::empty();

    pub fn is_unrestricted(self) -> bool {
        self.is_empty()
    }
}

/// Resolved annotations of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ApiAnnotations {
    pub visibility: Visibility,
    pub restrictions: Restriction,
}

impl ApiAnnotations {
    pub fn new(visibility: Visibility, restrictions: Restriction) -> Self {
        Self {
            visibility,
            restrictions,
        }
    }

    /// API visibility without restrictions.
    pub fn api() -> Self {
        Self::new(Visibility::API, Restriction::UNRESTRICTED)
    }
}

impl fmt::Display for ApiAnnotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} / {:?}", self.visibility, self.restrictions)
    }
}

// ============================================================================
// ELEMENT DESCRIPTORS
// ============================================================================

/// Identifies an annotatable element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementDescriptor {
    Package(Arc<str>),
    Type(Arc<str>),
    Method {
        type_name: Arc<str>,
        name: Arc<str>,
        signature: Arc<str>,
    },
    Field {
        type_name: Arc<str>,
        name: Arc<str>,
    },
}

impl ElementDescriptor {
    pub fn of_package(name: impl Into<Arc<str>>) -> Self {
        Self::Package(name.into())
    }

    pub fn of_type(name: impl Into<Arc<str>>) -> Self {
        Self::Type(name.into())
    }

    pub fn of_method(
        type_name: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        signature: impl Into<Arc<str>>,
    ) -> Self {
        Self::Method {
            type_name: type_name.into(),
            name: name.into(),
            signature: signature.into(),
        }
    }

    pub fn of_field(type_name: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self::Field {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// The package containing this element.
    pub fn package(&self) -> &str {
        match self {
            ElementDescriptor::Package(name) => name,
            ElementDescriptor::Type(name) => names::package_name(name),
            ElementDescriptor::Method { type_name, .. }
            | ElementDescriptor::Field { type_name, .. } => names::package_name(type_name),
        }
    }

    /// The type this element is or belongs to, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ElementDescriptor::Package(_) => None,
            ElementDescriptor::Type(name) => Some(name),
            ElementDescriptor::Method { type_name, .. }
            | ElementDescriptor::Field { type_name, .. } => Some(type_name),
        }
    }

    /// Descriptors from the package down to this element.
    pub fn path(&self) -> Vec<ElementDescriptor> {
        let mut path = vec![ElementDescriptor::of_package(self.package())];
        if let Some(type_name) = self.type_name() {
            path.extend(names::nested_prefixes(type_name).map(ElementDescriptor::of_type));
        }
        if !matches!(self, ElementDescriptor::Package(_) | ElementDescriptor::Type(_)) {
            path.push(self.clone());
        }
        path
    }
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementDescriptor::Package(name) => write!(f, "package {name}"),
            ElementDescriptor::Type(name) => write!(f, "{name}"),
            ElementDescriptor::Method {
                type_name,
                name,
                signature,
            } => write!(f, "{type_name}#{name}{signature}"),
            ElementDescriptor::Field { type_name, name } => write!(f, "{type_name}#{name}"),
        }
    }
}

// ============================================================================
// API DESCRIPTION
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Node {
    /// `None` inherits from the parent node.
    visibility: Option<Visibility>,
    restrictions: Restriction,
}

/// Declared annotations of one component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiDescription {
    nodes: IndexMap<ElementDescriptor, Node>,
}

impl ApiDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the visibility of an element.
    pub fn set_visibility(&mut self, element: ElementDescriptor, visibility: Visibility) {
        self.node_mut(element).visibility = Some(visibility);
    }

    /// Declare the restrictions of an element.
    pub fn set_restrictions(&mut self, element: ElementDescriptor, restrictions: Restriction) {
        self.node_mut(element).restrictions = restrictions;
    }

    /// Builder-style: a package with the given visibility.
    pub fn with_package(mut self, package: &str, visibility: Visibility) -> Self {
        self.set_visibility(ElementDescriptor::of_package(package), visibility);
        self
    }

    /// Builder-style: restrictions on an element.
    pub fn with_restrictions(mut self, element: ElementDescriptor, restrictions: Restriction) -> Self {
        self.set_restrictions(element, restrictions);
        self
    }

    /// Builder-style: visibility of an element.
    pub fn with_visibility(mut self, element: ElementDescriptor, visibility: Visibility) -> Self {
        self.set_visibility(element, visibility);
        self
    }

    /// Inserts the element's whole path. Packages default to API, types and
    /// members inherit.
    fn node_mut(&mut self, element: ElementDescriptor) -> &mut Node {
        for ancestor in element.path() {
            if ancestor == element {
                break;
            }
            let visibility = match ancestor {
                ElementDescriptor::Package(_) => Some(Visibility::API),
                _ => None,
            };
            self.nodes.entry(ancestor).or_insert(Node {
                visibility,
                restrictions: Restriction::UNRESTRICTED,
            });
        }
        let visibility = match element {
            ElementDescriptor::Package(_) => Some(Visibility::API),
            _ => None,
        };
        self.nodes.entry(element).or_insert(Node {
            visibility,
            restrictions: Restriction::UNRESTRICTED,
        })
    }

    /// Resolve the annotations of an element, or `None` if nothing is known
    /// about its package.
    pub fn resolve_annotations(&self, element: &ElementDescriptor) -> Option<ApiAnnotations> {
        let path = element.path();
        let depth = path
            .iter()
            .position(|desc| !self.nodes.contains_key(desc))
            .unwrap_or(path.len());
        if depth == 0 {
            return None;
        }
        let closest = &path[depth - 1];
        let visibility = path[..depth]
            .iter()
            .rev()
            .find_map(|desc| self.nodes.get(desc).and_then(|node| node.visibility))
            .unwrap_or(Visibility::API);
        let restrictions = match self.nodes.get(closest) {
            Some(node) if closest == element => node.restrictions,
            _ => Restriction::UNRESTRICTED,
        };
        Some(ApiAnnotations::new(visibility, restrictions))
    }

    /// Every element with explicit restrictions, in declaration order.
    pub fn restricted_elements(&self) -> impl Iterator<Item = (&ElementDescriptor, Restriction)> {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.restrictions.is_unrestricted())
            .map(|(desc, node)| (desc, node.restrictions))
    }

    /// Every package with its declared visibility, in declaration order.
    pub fn packages(&self) -> impl Iterator<Item = (&str, Visibility)> {
        self.nodes.iter().filter_map(|(desc, node)| match desc {
            ElementDescriptor::Package(name) => {
                Some((name.as_ref(), node.visibility.unwrap_or(Visibility::API)))
            }
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
