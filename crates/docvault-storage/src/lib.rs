//! # docvault-storage
//!
//! Storage layer for docvault:
//! - deterministic shard-path allocation ([`path`])
//! - [`StorageGateway`](docvault_core::StorageGateway) adapters: a
//!   filesystem backend ([`FsGateway`]) and an in-memory fake
//!   ([`MemoryGateway`]) for tests
//! - [`BinaryStore`], the binary-storage service the document lifecycle
//!   layer consumes (allocation, document read/write/delete, health probe)

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub mod fs;
pub mod memory;
pub mod path;
pub mod store;

/// MD5 content hash, base64-encoded. Computed by the backend adapters over
/// uploaded bytes; stable for identical bytes.
pub(crate) fn content_hash(data: &[u8]) -> String {
    BASE64.encode(md5::compute(data).0)
}

pub use fs::FsGateway;
pub use memory::MemoryGateway;
pub use path::{shard_segments, split_identifier, split_segments, ROOT_CONTAINER};
pub use store::BinaryStore;
