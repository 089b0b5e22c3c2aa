//! Components: units of deployment with their own types and API description.

use std::sync::Arc;

use indexmap::IndexMap;

use super::annotations::ApiDescription;
use super::types::ApiType;

/// A component (bundle) of a [`Profile`](super::Profile).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiComponent {
    pub id: Arc<str>,
    pub version: Arc<str>,
    /// Ids of required components.
    pub prerequisites: Vec<Arc<str>>,
    /// Required components that are re-exported to this component's clients.
    pub reexports: Vec<Arc<str>>,
    /// Host component id if this component is a fragment.
    pub host: Option<Arc<str>>,
    /// A system library (runtime), never analyzed itself.
    pub system: bool,
    pub description: ApiDescription,
    types: IndexMap<Arc<str>, Arc<ApiType>>,
}

impl ApiComponent {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            version: Arc::from("0.0.0"),
            prerequisites: Vec::new(),
            reexports: Vec::new(),
            host: None,
            system: false,
            description: ApiDescription::new(),
            types: IndexMap::new(),
        }
    }

    /// A system library component.
    pub fn system(id: impl Into<Arc<str>>) -> Self {
        let mut component = Self::new(id);
        component.system = true;
        component
    }

    pub fn with_version(mut self, version: impl Into<Arc<str>>) -> Self {
        self.version = version.into();
        self
    }

    pub fn requires(mut self, id: impl Into<Arc<str>>) -> Self {
        self.prerequisites.push(id.into());
        self
    }

    /// Require a component and re-export it.
    pub fn reexports(mut self, id: impl Into<Arc<str>>) -> Self {
        let id = id.into();
        self.prerequisites.push(id.clone());
        self.reexports.push(id);
        self
    }

    /// Make this component a fragment of `host`.
    pub fn fragment_of(mut self, host: impl Into<Arc<str>>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_description(mut self, description: ApiDescription) -> Self {
        self.description = description;
        self
    }

    pub fn with_type(mut self, ty: ApiType) -> Self {
        self.add_type(ty);
        self
    }

    /// Add a type, stamping this component's id on it and its members.
    pub fn add_type(&mut self, mut ty: ApiType) {
        ty.set_component(&self.id);
        self.types.insert(ty.name.clone(), Arc::new(ty));
    }

    pub fn find_type(&self, name: &str) -> Option<&Arc<ApiType>> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<ApiType>> {
        self.types.values()
    }

    /// Whether any type of this component lives in `package`.
    pub fn contains_package(&self, package: &str) -> bool {
        self.types.values().any(|t| t.package() == package)
    }

    pub fn is_fragment(&self) -> bool {
        self.host.is_some()
    }
}
