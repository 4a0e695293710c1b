//! # docvault-core
//!
//! Core types, traits, and abstractions for the docvault document store.
//!
//! This crate provides the data model for document metadata rows, the
//! authorization engine that decides visibility and lifecycle transitions,
//! the extension classifier, and the trait seams (`StorageGateway`,
//! `BinaryStorage`, `DocumentRepository`) that storage and database crates
//! implement.

pub mod access;
pub mod error;
pub mod extensions;
pub mod identity;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod traits;

// Re-export commonly used types at crate root
pub use access::{can_delete, can_update, can_view, AccessDecision};
pub use error::{Error, Result};
pub use extensions::{classify, is_accepted, FileKind};
pub use identity::UserContext;
pub use models::{Document, DocumentInformation, DocumentStatus, UploadForm};
pub use normalize::{normalize_token, valid_roles, valid_tags};
pub use settings::DocumentSettings;
pub use traits::{
    BinaryStorage, DocumentChanges, DocumentLookup, DocumentQuery, DocumentRepository,
    StorageGateway, UploadReceipt,
};
