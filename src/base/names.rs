//! Qualified type name helpers.
//!
//! Type names use `.` between package segments and `$` between nested
//! types, e.g. `com.example.Outer$Inner`. Local and anonymous types follow
//! the binary naming scheme (`Outer$1Local`, `Outer$1`).

/// Separator between a nested type and its enclosing type.
pub const NESTED_SEPARATOR: char = '$';

/// Separator between package segments.
pub const PACKAGE_SEPARATOR: char = '.';

/// Returns the package of a qualified type name (empty for the default package).
pub fn package_name(type_name: &str) -> &str {
    match type_name.rfind(PACKAGE_SEPARATOR) {
        Some(idx) => &type_name[..idx],
        None => "",
    }
}

/// Returns the type name without its package, keeping nested separators.
///
/// `com.x.Outer$Inner` → `Outer$Inner`
pub fn unqualified_name(type_name: &str) -> &str {
    match type_name.rfind(PACKAGE_SEPARATOR) {
        Some(idx) => &type_name[idx + 1..],
        None => type_name,
    }
}

/// Returns the innermost simple name.
///
/// `com.x.Outer$Inner` → `Inner`
pub fn simple_name(type_name: &str) -> &str {
    let unqualified = unqualified_name(type_name);
    match unqualified.rfind(NESTED_SEPARATOR) {
        Some(idx) => &unqualified[idx + 1..],
        None => unqualified,
    }
}

/// Returns the name of a local type as written in source.
///
/// Binary names of local types carry a numeric prefix (`Outer$1Local`).
pub fn local_simple_name(type_name: &str) -> &str {
    simple_name(type_name).trim_start_matches(|c: char| c.is_ascii_digit())
}

/// Returns the display form of the unqualified name (`Outer.Inner`).
pub fn display_simple_name(type_name: &str) -> String {
    unqualified_name(type_name).replace(NESTED_SEPARATOR, ".")
}

/// Returns the display form of the qualified name (`com.x.Outer.Inner`).
pub fn display_qualified_name(type_name: &str) -> String {
    type_name.replace(NESTED_SEPARATOR, ".")
}

/// Returns the top-level type enclosing a (possibly nested) type name.
pub fn top_level_name(type_name: &str) -> &str {
    let package_len = match type_name.rfind(PACKAGE_SEPARATOR) {
        Some(idx) => idx + 1,
        None => 0,
    };
    match type_name[package_len..].find(NESTED_SEPARATOR) {
        Some(idx) => &type_name[..package_len + idx],
        None => type_name,
    }
}

/// Iterates over a type name and every enclosing type name, outermost first.
///
/// `com.x.A$B$C` yields `com.x.A`, `com.x.A$B`, `com.x.A$B$C`.
pub fn nested_prefixes(type_name: &str) -> impl Iterator<Item = &str> {
    let package_len = match type_name.rfind(PACKAGE_SEPARATOR) {
        Some(idx) => idx + 1,
        None => 0,
    };
    type_name[package_len..]
        .match_indices(NESTED_SEPARATOR)
        .map(move |(idx, _)| &type_name[..package_len + idx])
        .chain(std::iter::once(type_name))
}

/// Returns `true` for packages reserved by the platform runtime.
///
/// Members in these packages are routinely visible without carrying API
/// descriptions, so their absence is not worth reporting.
pub fn is_runtime_package(package: &str) -> bool {
    package == "java" || package.starts_with("java.")
}
