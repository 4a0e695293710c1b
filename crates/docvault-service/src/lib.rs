//! # docvault-service
//!
//! Document lifecycle orchestration: create, fetch, search, update, and
//! soft-delete of document records, tying the shard-path allocator and the
//! storage gateway to the metadata repository under the authorization
//! engine's decisions.

pub mod documents;

#[cfg(test)]
mod tests;

pub use documents::DocumentService;
