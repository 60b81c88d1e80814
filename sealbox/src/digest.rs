//! Search digest generation for equality lookups over encrypted fields.
//!
//! A search digest is a deterministic keyed hash stored alongside a
//! ciphertext so the storage layer can answer exact-match queries without
//! decrypting anything. It is computed independently of the ciphertext and
//! never derived from it.
//!
//! # Security Warning
//!
//! The digest is deterministic by design: identical plaintext and pepper
//! always yield the identical digest. A deterministic hash of a low-entropy
//! field (names, emails) is subject to dictionary and frequency attacks if
//! the pepper leaks. This is an accepted limitation of the scheme, not a
//! substitute for the cipher's confidentiality guarantee.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use crate::secrets::Secrets;

/// Search digest output size (32 bytes, SHA-256).
pub const DIGEST_SIZE: usize = 32;

/// Computes the search digest for a plaintext value.
///
/// The digest is `SHA-256(value || pepper)`. The pepper is appended to the
/// value rather than used as a MAC key; equality filtering only needs a
/// stable secret-dependent mapping, and this matches the stored data format.
///
/// Pure function: same inputs always produce the same output.
///
/// # Example
///
/// ```ignore
/// use sealbox::digest::search_digest;
/// use sealbox::secrets::Secrets;
///
/// let secrets = Secrets::new(vec![0u8; 32], b"pepper".to_vec())?;
/// let digest = search_digest(&secrets, b"alice@example.com");
/// assert_eq!(digest.len(), 32);
/// ```
#[must_use]
pub fn search_digest(secrets: &Secrets, value: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(value);
    hasher.update(secrets.pepper().expose_secret());
    hasher.finalize().to_vec()
}
