//! Document metadata model types.
//!
//! A [`Document`] is the persisted metadata row for one stored blob. Its
//! lifecycle state is carried by two independent flags (`is_enabled`,
//! `is_removed`) plus a removal timestamp; the effective
//! [`DocumentStatus`] is derived functionally from the flags rather than
//! modeled as a type hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted metadata row for one stored document blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Externally visible identifier. Opaque, immutable.
    pub public_id: Uuid,
    /// Allocated storage path relative to the process storage root.
    /// Unique, immutable, never reused even after removal.
    pub location: String,
    /// File name as supplied by the uploader.
    pub original_name: String,
    /// File extension including the leading dot (".pdf").
    pub extension: String,
    /// Coarse content category from the extension classifier ("image", ...).
    pub extension_group: String,
    /// Byte length at upload time. Immutable.
    pub size: i64,
    /// Free-text remarks, mutable by authorized updaters.
    pub remarks: String,
    /// Role tokens controlling visibility for non-owners. Always stored
    /// normalized (trimmed, upper-case, non-empty).
    pub roles: Vec<String>,
    /// Searchable tags, normalized the same way as roles.
    pub tags: Vec<String>,
    /// Logical process that owns the upload; becomes part of the base path.
    pub process_name: String,
    /// Dublin Core resource type code attached to upload metadata.
    pub dcmi_type: i32,
    /// Owning user. Immutable.
    pub created_by: Uuid,
    pub created: DateTime<Utc>,
    /// Set when soft-deleted, otherwise None.
    pub removed: Option<DateTime<Utc>>,
    /// Last mutating user, written on every audited commit.
    pub modified_by: Option<Uuid>,
    pub modified: Option<DateTime<Utc>>,
    /// Owner-only visibility; roles are ignored entirely when set.
    pub is_private: bool,
    /// Soft on/off switch, independent of removal.
    pub is_enabled: bool,
    /// Soft-delete flag. Terminal once set.
    pub is_removed: bool,
}

impl Document {
    /// Effective lifecycle state derived from the two flags.
    pub fn status(&self) -> DocumentStatus {
        if self.is_removed {
            DocumentStatus::Removed
        } else if !self.is_enabled {
            DocumentStatus::Disabled
        } else {
            DocumentStatus::Active
        }
    }
}

/// Effective lifecycle state of a document record.
///
/// `Removed` is terminal: no transition leaves it regardless of the
/// enabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Active,
    Disabled,
    Removed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Disabled => write!(f, "disabled"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Outward projection of a document row returned to callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInformation {
    pub public_id: Uuid,
    /// The storage location, used as the document identifier by callers.
    pub document_identifier: String,
    pub file_name: String,
    pub extension: String,
    pub roles: Vec<String>,
    pub tags: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub uploaded_by: Uuid,
    pub size: i64,
    pub remarks: String,
    pub is_enabled: bool,
}

impl From<&Document> for DocumentInformation {
    fn from(document: &Document) -> Self {
        Self {
            public_id: document.public_id,
            document_identifier: document.location.clone(),
            file_name: document.original_name.clone(),
            extension: document.extension.clone(),
            roles: document.roles.clone(),
            tags: document.tags.clone(),
            created: Some(document.created),
            uploaded_by: document.created_by,
            size: document.size,
            remarks: document.remarks.clone(),
            is_enabled: document.is_enabled,
        }
    }
}

/// Caller-declared metadata accompanying a create or update request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadForm {
    pub file_name: String,
    pub process_name: String,
    pub remarks: String,
    pub roles: Vec<String>,
    pub tags: Vec<String>,
    pub dcmi_type: i32,
    pub is_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(is_enabled: bool, is_removed: bool) -> Document {
        Document {
            public_id: Uuid::new_v4(),
            location: "01/02/03/04/file.pdf".to_string(),
            original_name: "file.pdf".to_string(),
            extension: ".pdf".to_string(),
            extension_group: "pdf".to_string(),
            size: 10,
            remarks: String::new(),
            roles: vec![],
            tags: vec![],
            process_name: "forms".to_string(),
            dcmi_type: 0,
            created_by: Uuid::new_v4(),
            created: Utc::now(),
            removed: None,
            modified_by: None,
            modified: None,
            is_private: false,
            is_enabled,
            is_removed,
        }
    }

    #[test]
    fn test_status_active() {
        assert_eq!(document(true, false).status(), DocumentStatus::Active);
    }

    #[test]
    fn test_status_disabled() {
        assert_eq!(document(false, false).status(), DocumentStatus::Disabled);
    }

    #[test]
    fn test_status_removed_is_terminal_over_enabled() {
        // A removed row is Removed even if the enabled bit was left on.
        assert_eq!(document(true, true).status(), DocumentStatus::Removed);
        assert_eq!(document(false, true).status(), DocumentStatus::Removed);
    }

    #[test]
    fn test_information_projection() {
        let doc = document(true, false);
        let info = DocumentInformation::from(&doc);
        assert_eq!(info.public_id, doc.public_id);
        assert_eq!(info.document_identifier, doc.location);
        assert_eq!(info.file_name, doc.original_name);
        assert_eq!(info.uploaded_by, doc.created_by);
        assert_eq!(info.size, doc.size);
        assert!(info.is_enabled);
    }
}
