//! Request extractors.
//!
//! - [`admin::RequireAdmin`] -- Requires valid HTTP Basic admin credentials.
//! - [`client_addr::ClientAddr`] -- The peer address, when the server knows it.

pub mod admin;
pub mod client_addr;
