//! Role and tag normalization.
//!
//! Roles and tags are always stored trimmed and upper-cased with empty
//! entries dropped. Normalization is idempotent: re-normalizing an already
//! normalized token is a fixed point.

use crate::settings::DocumentSettings;

/// Trim surrounding whitespace and upper-case the token.
pub fn normalize_token(token: &str) -> String {
    token.trim().to_uppercase()
}

/// Normalize the submitted roles and keep only those present in the
/// settings' valid-roles table.
pub fn valid_roles(roles: &[String], settings: &DocumentSettings) -> Vec<String> {
    roles
        .iter()
        .map(|r| normalize_token(r))
        .filter(|r| settings.valid_roles.iter().any(|v| v == r))
        .collect()
}

/// Normalize the submitted tags, dropping entries that are empty after
/// trimming.
pub fn valid_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| normalize_token(t))
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(roles: &[&str]) -> DocumentSettings {
        DocumentSettings::new(
            "data",
            "testaccount",
            roles.iter().map(|r| r.to_string()).collect(),
        )
    }

    #[test]
    fn test_normalize_trims_and_uppercases() {
        assert_eq!(normalize_token("  nurse "), "NURSE");
        assert_eq!(normalize_token("Admin"), "ADMIN");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for token in ["NURSE", "  doctor ", "", "Mixed Case "] {
            let once = normalize_token(token);
            assert_eq!(normalize_token(&once), once);
        }
    }

    #[test]
    fn test_valid_roles_filters_unknown() {
        let settings = settings(&["NURSE", "DOCTOR"]);
        let roles = vec![
            "nurse".to_string(),
            " doctor ".to_string(),
            "intruder".to_string(),
        ];
        assert_eq!(valid_roles(&roles, &settings), vec!["NURSE", "DOCTOR"]);
    }

    #[test]
    fn test_valid_tags_drops_empty() {
        let tags = vec!["  ".to_string(), "intake".to_string(), "".to_string()];
        assert_eq!(valid_tags(&tags), vec!["INTAKE"]);
    }
}
