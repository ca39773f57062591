//! Core data models for the asset store.
//!
//! Records are transient: they are built per request and serialized
//! as JSON via `serde`. Nothing here is persisted besides the blobs.

pub mod asset;
pub mod namespace;
