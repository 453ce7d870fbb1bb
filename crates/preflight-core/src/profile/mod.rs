//! Validation profiles.
//!
//! A profile is the data-driven check list for one integration: which
//! environment keys hold which endpoints, what those URLs should look like,
//! which files and packages the project must contain. Profiles are YAML or
//! JSON validated against an embedded JSON Schema.

mod builtin;
mod parser;
mod schema;

pub use builtin::{builtin, builtin_names};
pub use parser::{EndpointSpec, FileRequirement, PackageRequirement, ProfileError, ValidationProfile};
pub use schema::validate_profile_schema;
