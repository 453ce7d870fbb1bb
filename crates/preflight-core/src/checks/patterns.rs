//! Shared parsing patterns for checks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `KEY=value` line in a dotenv file, with an optional `export ` prefix.
    pub static ref ENV_LINE_PATTERN: Regex = Regex::new(
        r"^\s*(?:export\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=(.*)$"
    ).unwrap();
}

/// Split one dotenv line into key and cleaned value.
///
/// Comments, blank lines and empty values yield `None`.
pub fn parse_env_line(line: &str) -> Option<(String, String)> {
    if line.trim_start().starts_with('#') {
        return None;
    }

    let captures = ENV_LINE_PATTERN.captures(line)?;
    let key = captures.get(1)?.as_str().to_string();
    let value = unquote(captures.get(2)?.as_str().trim());

    if value.is_empty() {
        None
    } else {
        Some((key, value.to_string()))
    }
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_assignment() {
        assert_eq!(
            parse_env_line("NEON_AUTH_BASE_URL=https://x/auth"),
            Some(("NEON_AUTH_BASE_URL".to_string(), "https://x/auth".to_string()))
        );
    }

    #[test]
    fn test_export_and_quotes() {
        assert_eq!(
            parse_env_line("export KEY=\"quoted value\"  "),
            Some(("KEY".to_string(), "quoted value".to_string()))
        );
        assert_eq!(
            parse_env_line("KEY='single'"),
            Some(("KEY".to_string(), "single".to_string()))
        );
    }

    #[test]
    fn test_comments_and_empty_values() {
        assert_eq!(parse_env_line("# KEY=value"), None);
        assert_eq!(parse_env_line("KEY="), None);
        assert_eq!(parse_env_line("KEY=   "), None);
        assert_eq!(parse_env_line(""), None);
        assert_eq!(parse_env_line("not an assignment"), None);
    }

    #[test]
    fn test_lone_quote_is_kept() {
        assert_eq!(
            parse_env_line("KEY=\""),
            Some(("KEY".to_string(), "\"".to_string()))
        );
    }
}
