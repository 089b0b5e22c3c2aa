//! Registries of restricted elements, keyed by structural name.
//!
//! Each maps a restricted element to the id of the component declaring the
//! restriction. Registries are filled by
//! [`ProblemDetectorBuilder`](super::ProblemDetectorBuilder) before scanning
//! and only read afterwards.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::names;

/// Restricted types by qualified name.
#[derive(Clone, Debug, Default)]
pub struct IllegalTypes {
    types: FxHashMap<Arc<str>, Arc<str>>,
}

impl IllegalTypes {
    pub fn add(&mut self, type_name: Arc<str>, component: Arc<str>) {
        self.types.insert(type_name, component);
    }

    /// Owner of exactly this type.
    pub fn owner(&self, type_name: &str) -> Option<&Arc<str>> {
        self.types.get(type_name)
    }

    /// Owner of this type or of any type enclosing it, outermost first.
    pub fn owner_of_nested(&self, type_name: &str) -> Option<&Arc<str>> {
        names::nested_prefixes(type_name).find_map(|prefix| self.types.get(prefix))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Restricted methods and fields by (type, name, signature).
///
/// Fields are registered with an empty signature.
#[derive(Clone, Debug, Default)]
pub struct IllegalMembers {
    members: FxHashMap<String, Arc<str>>,
}

fn member_key(type_name: &str, name: &str, signature: &str) -> String {
    format!("{type_name}#{name}#{signature}")
}

impl IllegalMembers {
    pub fn add(&mut self, type_name: &str, name: &str, signature: &str, component: Arc<str>) {
        self.members
            .insert(member_key(type_name, name, signature), component);
    }

    /// Owner of the exactly matching member.
    pub fn owner(&self, type_name: &str, name: &str, signature: &str) -> Option<&Arc<str>> {
        self.members.get(&member_key(type_name, name, signature))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Packages that are not API in the analyzed component or its prerequisites.
#[derive(Clone, Debug, Default)]
pub struct NonApiPackages {
    packages: FxHashSet<Arc<str>>,
}

impl NonApiPackages {
    pub fn add(&mut self, package: impl Into<Arc<str>>) {
        self.packages.insert(package.into());
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains(package)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
