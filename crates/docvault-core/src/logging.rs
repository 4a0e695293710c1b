//! Structured logging field name constants for docvault.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized names across the
//! storage and service layers.

/// Logical operation name.
/// Examples: "allocate", "create_document", "delete_document", "health"
pub const OPERATION: &str = "op";

/// Public document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Storage identifier (container-relative path) of a blob.
pub const IDENTIFIER: &str = "identifier";

/// Top-level storage container name.
pub const CONTAINER: &str = "container";

/// Acting user UUID.
pub const USER_ID: &str = "user_id";

/// Byte length of an upload or download.
pub const SIZE_BYTES: &str = "size_bytes";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";
