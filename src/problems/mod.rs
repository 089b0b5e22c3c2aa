//! Problems reported by the detectors.
//!
//! An [`ApiProblem`] carries structured data only (kind, element type,
//! flags, message arguments); [`ApiProblem::message`] renders a plain
//! English description for reporting layers that want one.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use text_size::TextRange;

mod config;
mod severity;

pub use config::AnalysisConfig;
pub use severity::{Severity, SeverityConfig, keys};

// ============================================================================
// PROBLEM CLASSIFICATION
// ============================================================================

/// Category of an API use problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    IllegalExtend,
    IllegalImplement,
    IllegalInstantiate,
    IllegalReference,
    IllegalOverride,
    ApiLeak,
}

impl ProblemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemKind::IllegalExtend => "ILLEGAL_EXTEND",
            ProblemKind::IllegalImplement => "ILLEGAL_IMPLEMENT",
            ProblemKind::IllegalInstantiate => "ILLEGAL_INSTANTIATE",
            ProblemKind::IllegalReference => "ILLEGAL_REFERENCE",
            ProblemKind::IllegalOverride => "ILLEGAL_OVERRIDE",
            ProblemKind::ApiLeak => "API_LEAK",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of element a problem is reported against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Type,
    Method,
    Field,
}

bitflags! {
    /// Refinements of a problem kind. The empty set means "no flags".
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ProblemFlags: u32 {
        const LEAK_EXTENDS = 1 << 0;
        const LEAK_IMPLEMENTS = 1 << 1;
        const LEAK_FIELD = 1 << 2;
        const LEAK_RETURN_TYPE = 1 << 3;
        const LEAK_METHOD_PARAMETER = 1 << 4;
        const LEAK_CONSTRUCTOR_PARAMETER = 1 << 5;
        const CONSTRUCTOR_METHOD = 1 << 6;
        const METHOD = 1 << 7;
        const FIELD = 1 << 8;
        const INDIRECT_REFERENCE = 1 << 9;
        const INDIRECT_LOCAL_REFERENCE = 1 << 10;
        const LOCAL_TYPE = 1 << 11;
        const ANONYMOUS_TYPE = 1 << 12;
        const ANNOTATION = 1 << 13;
    }
}

impl ProblemFlags {
    pub const NO_FLAGS: ProblemFlags = ProblemFlags::empty();
}

// ============================================================================
// PROBLEM RECORD
// ============================================================================

/// A detected API use problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiProblem {
    pub kind: ProblemKind,
    pub element_type: ElementType,
    pub flags: ProblemFlags,
    /// Message arguments using simple names.
    pub message_args: Vec<String>,
    /// Message arguments using qualified names.
    pub qualified_message_args: Vec<String>,
    /// Qualified name of the type the problem is reported against.
    pub type_name: Arc<str>,
    /// 1-based line of the offending reference, if known.
    pub line: Option<u32>,
    /// Source range of the offending element, if known.
    pub range: Option<TextRange>,
    /// Severity category key (see [`keys`]).
    pub severity_key: &'static str,
    pub severity: Severity,
}

impl ApiProblem {
    /// Render an English description of the problem.
    pub fn message(&self) -> String {
        format_message(self.template(), &self.message_args)
    }

    /// Render the description using qualified names.
    pub fn qualified_message(&self) -> String {
        format_message(self.template(), &self.qualified_message_args)
    }

    fn template(&self) -> &'static str {
        let flags = self.flags;
        match self.kind {
            ProblemKind::IllegalExtend if flags.contains(ProblemFlags::ANONYMOUS_TYPE) => {
                "An anonymous type illegally extends {0}"
            }
            ProblemKind::IllegalExtend if flags.contains(ProblemFlags::LOCAL_TYPE) => {
                "The local type {1} illegally extends {0}"
            }
            ProblemKind::IllegalExtend => "{1} illegally extends {0}",
            ProblemKind::IllegalImplement
                if flags.intersects(
                    ProblemFlags::INDIRECT_REFERENCE | ProblemFlags::INDIRECT_LOCAL_REFERENCE,
                ) =>
            {
                "{1} illegally implements {2} via {0}"
            }
            ProblemKind::IllegalImplement if flags.contains(ProblemFlags::ANONYMOUS_TYPE) => {
                "An anonymous type illegally implements {0}"
            }
            ProblemKind::IllegalImplement if flags.contains(ProblemFlags::LOCAL_TYPE) => {
                "The local type {1} illegally implements {0}"
            }
            ProblemKind::IllegalImplement => "{1} illegally implements {0}",
            ProblemKind::IllegalInstantiate => "Illegally instantiates {0}",
            ProblemKind::IllegalOverride => "{2} illegally overrides {0}.{1}",
            ProblemKind::IllegalReference if flags.contains(ProblemFlags::ANNOTATION) => {
                "Illegal use of annotation @{0}"
            }
            ProblemKind::IllegalReference if flags.contains(ProblemFlags::CONSTRUCTOR_METHOD) => {
                "Illegal reference to constructor {1} of {0} from {2}"
            }
            ProblemKind::IllegalReference if flags.contains(ProblemFlags::FIELD) => {
                "Illegal reference to field {0}.{1} from {2}"
            }
            ProblemKind::IllegalReference => "Illegal reference to method {0}.{1} from {2}",
            ProblemKind::ApiLeak if flags.contains(ProblemFlags::LEAK_EXTENDS) => {
                "{1} extends non-API type {0}"
            }
            ProblemKind::ApiLeak if flags.contains(ProblemFlags::LEAK_IMPLEMENTS) => {
                "{1} implements non-API interface {0}"
            }
            ProblemKind::ApiLeak if flags.contains(ProblemFlags::LEAK_FIELD) => {
                "Field {1}.{2} leaks non-API type {0}"
            }
            ProblemKind::ApiLeak if flags.contains(ProblemFlags::LEAK_CONSTRUCTOR_PARAMETER) => {
                "Constructor {1}.{2} leaks non-API type {0} through a parameter"
            }
            ProblemKind::ApiLeak if flags.contains(ProblemFlags::LEAK_METHOD_PARAMETER) => {
                "Method {1}.{2} leaks non-API type {0} through a parameter"
            }
            ProblemKind::ApiLeak if flags.contains(ProblemFlags::LEAK_RETURN_TYPE) => {
                "Method {1}.{2} leaks non-API type {0} through its return type"
            }
            ProblemKind::ApiLeak => "{1} leaks non-API type {0}",
        }
    }
}

impl fmt::Display for ApiProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.type_name, line, self.message()),
            None => write!(f, "{}: {}", self.type_name, self.message()),
        }
    }
}

/// Substitute `{n}` placeholders with the matching argument.
///
/// Placeholders without an argument are left as written.
fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let arg = after.find('}').and_then(|close| {
            after[..close]
                .parse::<usize>()
                .ok()
                .and_then(|idx| args.get(idx))
                .map(|arg| (arg, close))
        });
        match arg {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
