//! Object-storage deployment variant.
//!
//! Provides [`s3::S3BlobStore`], a [`tontext_core::storage::BlobStore`]
//! backed by any S3-compatible service (MinIO in the default deployment).

pub mod s3;

pub use s3::{S3BlobStore, S3Config};
