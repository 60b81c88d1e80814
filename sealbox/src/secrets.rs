//! Process-wide secret material for field encryption and search digests.
//!
//! The key and pepper are supplied once at process startup and held
//! immutable for the process lifetime. Rotating either invalidates
//! decryption of previously written ciphertexts and digests; rotation is a
//! deployment concern outside this crate.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use secrecy::SecretVec;

use crate::error::Error;

/// Key lengths accepted by the cipher (AES-128 and AES-256).
pub const KEY_LENGTHS: [usize; 2] = [16, 32];

/// Byte length of generated keys and peppers (256 bits).
pub const GENERATED_SECRET_SIZE: usize = 32;

/// Secret material injected into the cipher at construction.
///
/// Holds the symmetric key used for field encryption and the pepper mixed
/// into search digests. Both are wrapped in [`SecretVec`], which zeroizes
/// on drop and redacts `Debug` output.
pub struct Secrets {
    key: SecretVec<u8>,
    pepper: SecretVec<u8>,
}

impl Secrets {
    /// Creates secret material from raw key and pepper bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] unless the key is 16 or 32 bytes.
    pub fn new(key: Vec<u8>, pepper: Vec<u8>) -> Result<Self, Error> {
        if !KEY_LENGTHS.contains(&key.len()) {
            return Err(Error::InvalidKeyLength { actual: key.len() });
        }
        Ok(Self { key: SecretVec::new(key), pepper: SecretVec::new(pepper) })
    }

    /// Returns the symmetric encryption key.
    pub(crate) const fn key(&self) -> &SecretVec<u8> {
        &self.key
    }

    /// Returns the search digest pepper.
    pub(crate) const fn pepper(&self) -> &SecretVec<u8> {
        &self.pepper
    }
}

/// Generates a fresh random 32-byte key suitable for AES-256-GCM.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if the OS random source fails.
pub fn generate_key() -> Result<Vec<u8>, Error> {
    random_bytes(GENERATED_SECRET_SIZE)
}

/// Generates a fresh random 32-byte pepper for search digests.
///
/// # Errors
///
/// Returns [`Error::EntropyUnavailable`] if the OS random source fails.
pub fn generate_pepper() -> Result<Vec<u8>, Error> {
    random_bytes(GENERATED_SECRET_SIZE)
}

fn random_bytes(len: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| Error::EntropyUnavailable(e.to_string()))?;
    Ok(bytes)
}
