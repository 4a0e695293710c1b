//! Service settings.

use serde::{Deserialize, Serialize};

/// Immutable configuration for the document services.
///
/// The valid-roles table is normalized once at construction and treated as
/// read-only afterwards; the settings value is shared by reference, never
/// through a mutable global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Root path under which all document blobs are allocated.
    pub storage_root: String,
    /// Storage account identifier, checked by the health probe.
    pub account_name: String,
    /// Role tokens that may be attached to documents, normalized upper-case.
    pub valid_roles: Vec<String>,
}

impl DocumentSettings {
    pub fn new(
        storage_root: impl Into<String>,
        account_name: impl Into<String>,
        valid_roles: Vec<String>,
    ) -> Self {
        Self {
            storage_root: storage_root.into(),
            account_name: account_name.into(),
            valid_roles,
        }
        .normalized()
    }

    /// Normalize the valid-roles table (trim + upper-case, drop empties).
    pub fn normalized(mut self) -> Self {
        self.valid_roles = self
            .valid_roles
            .iter()
            .map(|r| crate::normalize::normalize_token(r))
            .filter(|r| !r.is_empty())
            .collect();
        self
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            storage_root: "data".to_string(),
            account_name: String::new(),
            valid_roles: Vec::new(),
        }
    }
}
