//! JSON Schema validation for profiles.
//!
//! Every profile, built-in or user-supplied, is checked against
//! `schema/profile.schema.json` before it is deserialized.

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

const PROFILE_SCHEMA_JSON: &str = include_str!("../../schema/profile.schema.json");

/// Compiled once; a broken embedded schema is reported on every call.
static PROFILE_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

fn compile() -> Result<Validator, String> {
    let schema: Value = serde_json::from_str(PROFILE_SCHEMA_JSON)
        .map_err(|e| format!("Embedded profile schema is not JSON: {}", e))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| format!("Embedded profile schema does not compile: {}", e))
}

/// Validate a profile document against the schema.
///
/// Returns one message per violation, each naming the offending location.
pub fn validate_profile_schema(profile: &Value) -> Result<(), Vec<String>> {
    let validator = PROFILE_SCHEMA
        .get_or_init(compile)
        .as_ref()
        .map_err(|e| vec![e.clone()])?;

    let violations: Vec<String> = validator
        .iter_errors(profile)
        .map(|e| {
            let location = e.instance_path.to_string();
            if location.is_empty() {
                e.to_string()
            } else {
                format!("{} at {}", e, location)
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_passes_schema() {
        let value = serde_json::json!({
            "name": "Minimal",
            "endpoints": []
        });
        assert!(validate_profile_schema(&value).is_ok());
    }

    #[test]
    fn test_missing_endpoints_fails() {
        let value = serde_json::json!({ "name": "No endpoints" });
        let errors = validate_profile_schema(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_invalid_env_key_fails() {
        let value = serde_json::json!({
            "name": "Bad key",
            "endpoints": [{
                "key": "not a key",
                "label": "x",
                "url_pattern": "^x$",
                "expected_format": "x"
            }]
        });
        assert!(validate_profile_schema(&value).is_err());
    }

    #[test]
    fn test_status_out_of_range_fails() {
        let value = serde_json::json!({
            "name": "Bad status",
            "endpoints": [{
                "key": "X_URL",
                "label": "x",
                "url_pattern": "^x$",
                "expected_format": "x",
                "healthy_statuses": [42]
            }]
        });
        assert!(validate_profile_schema(&value).is_err());
    }

    #[test]
    fn test_empty_file_paths_fail() {
        let value = serde_json::json!({
            "name": "Files",
            "endpoints": [],
            "files": [{ "description": "Route", "paths": [] }]
        });
        assert!(validate_profile_schema(&value).is_err());
    }
}
