//! Profiles shipped with the binary.

use super::parser::{ProfileError, ValidationProfile};

/// Built-in profile sources, keyed by the name used on the command line.
const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("neon-auth", include_str!("../../profiles/neon-auth.yaml")),
    ("neon-js", include_str!("../../profiles/neon-js.yaml")),
];

/// Names of all built-in profiles.
pub fn builtin_names() -> Vec<&'static str> {
    BUILTIN_PROFILES.iter().map(|(name, _)| *name).collect()
}

/// Load a built-in profile by name.
pub fn builtin(name: &str) -> Result<ValidationProfile, ProfileError> {
    let (_, source) = BUILTIN_PROFILES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .ok_or_else(|| ProfileError::Unknown {
            name: name.to_string(),
            available: builtin_names().join(", "),
        })?;

    ValidationProfile::from_yaml(source)
}
