//! Domain logic for the Tontext release backend.
//!
//! Everything here is independent of HTTP and of the database: release
//! naming rules, the version resolver, client hashing, and the
//! [`storage::BlobStore`] capability that both deployment variants
//! (local filesystem and S3-compatible object storage) implement.

pub mod error;
pub mod hashing;
pub mod release;
pub mod resolver;
pub mod storage;
pub mod types;
