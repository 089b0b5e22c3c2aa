//! Component and symbol model.
//!
//! - [`ApiType`], [`ApiMethod`], [`ApiField`], [`ApiMember`] - declarations
//! - [`ApiDescription`] - declared visibility and restrictions
//! - [`ApiComponent`] - a component with its types and description
//! - [`Profile`] - the component graph analyzed together

mod annotations;
mod component;
mod modifiers;
mod profile;
mod types;

pub use annotations::{ApiAnnotations, ApiDescription, ElementDescriptor, Restriction, Visibility};
pub use component::ApiComponent;
pub use modifiers::Modifiers;
pub use profile::Profile;
pub use types::{ApiField, ApiMember, ApiMethod, ApiType, CONSTRUCTOR_NAME};
