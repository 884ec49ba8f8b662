//! Shared SHA-256 hex digest utility.
//!
//! Used for the privacy-preserving client identifier stored with each
//! download event.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the client address digest.
pub const IP_HASH_LEN: usize = 16;

/// Hashed in place of the client address when none is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Hash a client address for the download ledger.
///
/// Returns the first [`IP_HASH_LEN`] hex characters of SHA-256 over the
/// literal address string, or over `"unknown"` when the address is
/// missing or empty. The hash is unsalted, so equal addresses always
/// produce equal values.
pub fn client_ip_hash(client_addr: Option<&str>) -> String {
    let addr = client_addr
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_CLIENT);
    let mut digest = sha256_hex(addr.as_bytes());
    digest.truncate(IP_HASH_LEN);
    digest
}
