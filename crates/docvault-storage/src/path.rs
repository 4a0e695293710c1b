//! Shard-path computation.
//!
//! A storage path is the lower-cased base path plus exactly four two-hex-digit
//! segments taken from the first four bytes of a freshly generated document
//! id. Each shard level contributes 256-way branching, which bounds the
//! number of objects per terminal directory and avoids flat-namespace
//! hot-spotting in the backend.
//!
//! Input paths may use either backslash or forward slash; everything is
//! normalized to `/` and lower-cased because object-storage container names
//! are case-restricted.

use docvault_core::{Error, Result};
use uuid::Uuid;

/// Canonical separator for container/object splitting.
pub const SEPARATOR: char = '/';

/// Reserved name for the backend's default container, used when an
/// identifier has no leading path segment.
pub const ROOT_CONTAINER: &str = "$root";

/// Total segment capacity of an allocated path.
pub const PATH_CAPACITY: usize = 10;

/// Number of shard segments appended to every base path.
pub const SHARD_DEPTH: usize = 4;

/// Split a path on either separator, lower-case each segment, and drop
/// empty segments.
pub fn split_segments(path: &str) -> Vec<String> {
    path.split(['\\', '/'])
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

/// The four shard segments for a document id: the lower-case two-hex-digit
/// representation of its first four bytes, in byte order.
pub fn shard_segments(id: Uuid) -> [String; SHARD_DEPTH] {
    let bytes = id.as_bytes();
    [
        format!("{:02x}", bytes[0]),
        format!("{:02x}", bytes[1]),
        format!("{:02x}", bytes[2]),
        format!("{:02x}", bytes[3]),
    ]
}

/// Compute the storage path for a new document: normalized base segments
/// plus the four shard segments, joined canonically.
///
/// Deterministic: the same inputs always produce the same path. Fails with
/// `InvalidInput` when the base path is empty or exceeds the fixed segment
/// capacity.
pub fn allocate_path(base_path: &str, id: Uuid) -> Result<String> {
    if base_path.is_empty() {
        return Err(Error::InvalidInput("base path must not be empty".into()));
    }

    let mut parts = split_segments(base_path);
    if parts.is_empty() {
        return Err(Error::InvalidInput(
            "base path contains no path segments".into(),
        ));
    }
    if parts.len() > PATH_CAPACITY - SHARD_DEPTH {
        return Err(Error::InvalidInput(format!(
            "base path has {} segments, capacity is {}",
            parts.len(),
            PATH_CAPACITY - SHARD_DEPTH
        )));
    }

    parts.extend(shard_segments(id));
    Ok(parts.join(&SEPARATOR.to_string()))
}

/// Split a document identifier into (container, object name).
///
/// The first segment becomes the container; remaining segments join with the
/// canonical separator as the object name. A single-segment identifier lands
/// in the reserved `$root` container.
pub fn split_identifier(identifier: &str) -> Result<(String, String)> {
    let segments = split_segments(identifier);
    match segments.split_first() {
        None => Err(Error::InvalidInput(
            "document identifier must not be empty".into(),
        )),
        Some((first, rest)) if rest.is_empty() => {
            Ok((ROOT_CONTAINER.to_string(), first.clone()))
        }
        Some((first, rest)) => Ok((first.clone(), rest.join(&SEPARATOR.to_string()))),
    }
}
