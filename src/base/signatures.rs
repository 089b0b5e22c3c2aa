//! Method descriptor helpers.
//!
//! Signatures are class-file method descriptors such as
//! `(Ljava/lang/String;I[Lcom/x/Foo$Bar;)V`. Malformed descriptors are
//! parsed as far as possible; the remainder is ignored.

use super::names;

/// A type appearing in a method descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorType {
    /// A primitive type (`int`, `boolean`, `void`, ...).
    Primitive(&'static str),
    /// A reference type, as a qualified name (`com.x.Foo$Bar`).
    Class(String),
    /// A type variable (`T`).
    TypeVariable(String),
    /// An array of the component type.
    Array(Box<DescriptorType>),
}

impl DescriptorType {
    /// Returns the qualified name of the referenced class, looking through arrays.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            DescriptorType::Class(name) => Some(name),
            DescriptorType::Array(component) => component.class_name(),
            _ => None,
        }
    }

    /// Renders the type for messages.
    pub fn display(&self, qualified: bool) -> String {
        match self {
            DescriptorType::Primitive(name) => (*name).to_string(),
            DescriptorType::TypeVariable(name) => name.clone(),
            DescriptorType::Class(name) if qualified => names::display_qualified_name(name),
            DescriptorType::Class(name) => names::display_simple_name(name),
            DescriptorType::Array(component) => format!("{}[]", component.display(qualified)),
        }
    }
}

fn parse_type(chars: &[u8], pos: &mut usize) -> Option<DescriptorType> {
    let c = *chars.get(*pos)?;
    *pos += 1;
    let primitive = match c {
        b'B' => "byte",
        b'C' => "char",
        b'D' => "double",
        b'F' => "float",
        b'I' => "int",
        b'J' => "long",
        b'S' => "short",
        b'Z' => "boolean",
        b'V' => "void",
        b'[' => return parse_type(chars, pos).map(|t| DescriptorType::Array(Box::new(t))),
        b'L' | b'T' => {
            let start = *pos;
            let len = chars[start..].iter().position(|&b| b == b';')?;
            *pos = start + len + 1;
            let name = std::str::from_utf8(&chars[start..start + len]).ok()?;
            return Some(if c == b'L' {
                DescriptorType::Class(name.replace('/', "."))
            } else {
                DescriptorType::TypeVariable(name.to_string())
            });
        }
        _ => return None,
    };
    Some(DescriptorType::Primitive(primitive))
}

/// Returns the parameter types of a method descriptor.
pub fn parameter_types(signature: &str) -> Vec<DescriptorType> {
    let chars = signature.as_bytes();
    let mut params = Vec::new();
    if chars.first() != Some(&b'(') {
        return params;
    }
    let mut pos = 1;
    while pos < chars.len() && chars[pos] != b')' {
        match parse_type(chars, &mut pos) {
            Some(ty) => params.push(ty),
            None => break,
        }
    }
    params
}

/// Returns the return type of a method descriptor, or `None` for `void`.
pub fn return_type(signature: &str) -> Option<DescriptorType> {
    let close = signature.find(')')?;
    let chars = signature.as_bytes();
    let mut pos = close + 1;
    match parse_type(chars, &mut pos)? {
        DescriptorType::Primitive("void") => None,
        ty => Some(ty),
    }
}

/// Returns the qualified names of every class-typed parameter.
pub fn parameter_class_names(signature: &str) -> Vec<String> {
    parameter_types(signature)
        .iter()
        .filter_map(|ty| ty.class_name().map(str::to_string))
        .collect()
}

/// Renders a method for messages, e.g. `foo(String, int[])`.
pub fn display_method(name: &str, signature: &str) -> String {
    render_method(name, signature, false)
}

/// Renders a method with qualified parameter types.
pub fn display_method_qualified(name: &str, signature: &str) -> String {
    render_method(name, signature, true)
}

fn render_method(name: &str, signature: &str, qualified: bool) -> String {
    let params: Vec<String> = parameter_types(signature)
        .iter()
        .map(|p| p.display(qualified))
        .collect();
    format!("{}({})", name, params.join(", "))
}
