//! Source positions for reported problems.
//!
//! Mapping a reference back to source text is done by an external locator;
//! the analyzer only asks for the range of a named element inside a type.

use rustc_hash::FxHashMap;
use text_size::TextRange;

/// The element of a type whose source range is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceElement<'a> {
    /// The name of a type declaration (the type itself or a nested type by simple name).
    TypeName(&'a str),
    /// The name of a method declaration.
    Method { name: &'a str, signature: &'a str },
    /// The name of a field declaration.
    Field(&'a str),
    /// An annotation usage by simple name.
    Annotation(&'a str),
    /// An occurrence of `name` on a (1-based) line, e.g. a call site.
    Occurrence { line: u32, name: &'a str },
}

/// Looks up source ranges of named elements.
///
/// `type_name` is the qualified name of the type whose source contains the
/// element. Returns `None` when no position is known.
pub trait SourceLocator {
    fn locate(&self, type_name: &str, element: SourceElement<'_>) -> Option<TextRange>;
}

/// A locator that never knows any position.
impl SourceLocator for () {
    fn locate(&self, _type_name: &str, _element: SourceElement<'_>) -> Option<TextRange> {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum SourceKey {
    TypeName(String),
    Method(String, String),
    Field(String),
    Annotation(String),
    Occurrence(u32, String),
}

impl From<SourceElement<'_>> for SourceKey {
    fn from(element: SourceElement<'_>) -> Self {
        match element {
            SourceElement::TypeName(name) => SourceKey::TypeName(name.to_string()),
            SourceElement::Method { name, signature } => {
                SourceKey::Method(name.to_string(), signature.to_string())
            }
            SourceElement::Field(name) => SourceKey::Field(name.to_string()),
            SourceElement::Annotation(name) => SourceKey::Annotation(name.to_string()),
            SourceElement::Occurrence { line, name } => {
                SourceKey::Occurrence(line, name.to_string())
            }
        }
    }
}

/// An in-memory [`SourceLocator`] populated by the caller.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    ranges: FxHashMap<(String, SourceKey), TextRange>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the range of an element in the given type.
    pub fn insert(&mut self, type_name: &str, element: SourceElement<'_>, range: TextRange) {
        self.ranges
            .insert((type_name.to_string(), element.into()), range);
    }

    /// Builder-style variant of [`SourceMap::insert`].
    pub fn with(mut self, type_name: &str, element: SourceElement<'_>, range: TextRange) -> Self {
        self.insert(type_name, element, range);
        self
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl SourceLocator for SourceMap {
    fn locate(&self, type_name: &str, element: SourceElement<'_>) -> Option<TextRange> {
        self.ranges
            .get(&(type_name.to_string(), element.into()))
            .copied()
    }
}
