//! Authenticated field encryption using AES-GCM.
//!
//! Every encryption draws a fresh random 96-bit nonce from the OS CSPRNG,
//! so encrypting the same plaintext twice yields different blobs. The blob
//! is self-contained: `nonce(12) || ciphertext+tag`. No associated data is
//! used.
//!
//! Random nonces tolerate a negligible collision probability at the volumes
//! expected for one key lifetime, not indefinitely; periodic key rotation
//! is a deployment responsibility.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes128Gcm, Aes256Gcm, Nonce,
};
use secrecy::ExposeSecret;

use crate::digest::search_digest;
use crate::error::Error;
use crate::secrets::Secrets;

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Capability interface for field-level crypto.
///
/// Combines non-deterministic AEAD encryption (confidentiality) with a
/// deterministic keyed digest (equality search) over the same plaintext.
/// The two outputs are computed independently and never derived from each
/// other.
///
/// Implementations must be thread-safe (`Send + Sync`); all operations are
/// stateless and safe to invoke concurrently.
pub trait FieldCrypto: Send + Sync {
    /// Encrypts a plaintext field, returning `nonce || ciphertext+tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the OS random source cannot
    /// supply a nonce, or [`Error::EncryptionFailed`] on an internal AEAD
    /// failure.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Decrypts a blob produced by [`FieldCrypto::encrypt`], returning the
    /// exact original bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlobTooShort`] if the blob cannot contain a nonce,
    /// or [`Error::AuthenticationFailed`] if the tag check fails (tampering,
    /// wrong key, or corruption). Never returns partial plaintext.
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, Error>;

    /// Computes the deterministic search digest for a plaintext field.
    fn digest(&self, plaintext: &[u8]) -> Vec<u8>;
}

/// AES-GCM variant selected by the secret key length.
enum AesGcmVariant {
    /// 16-byte key.
    Aes128(Aes128Gcm),
    /// 32-byte key.
    Aes256(Aes256Gcm),
}

/// AES-GCM field cipher holding the process secrets.
///
/// # Example
///
/// ```ignore
/// use sealbox::cipher::{AesGcmCipher, FieldCrypto};
/// use sealbox::secrets::Secrets;
///
/// let secrets = Secrets::new(vec![0u8; 32], b"pepper".to_vec())?;
/// let crypto = AesGcmCipher::new(secrets)?;
///
/// let blob = crypto.encrypt(b"Jane Doe")?;
/// assert_eq!(crypto.decrypt(&blob)?, b"Jane Doe");
/// ```
pub struct AesGcmCipher {
    variant: AesGcmVariant,
    secrets: Secrets,
}

impl AesGcmCipher {
    /// Creates a cipher from the process secrets. The key length selects
    /// the AES variant: 16 bytes for AES-128-GCM, 32 for AES-256-GCM.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] for any other key length.
    pub fn new(secrets: Secrets) -> Result<Self, Error> {
        let variant = {
            let key = secrets.key().expose_secret();
            match key.len() {
                16 => Aes128Gcm::new_from_slice(key)
                    .map(AesGcmVariant::Aes128)
                    .map_err(|_| Error::InvalidKeyLength { actual: key.len() })?,
                32 => Aes256Gcm::new_from_slice(key)
                    .map(AesGcmVariant::Aes256)
                    .map_err(|_| Error::InvalidKeyLength { actual: key.len() })?,
                actual => return Err(Error::InvalidKeyLength { actual }),
            }
        };

        Ok(Self { variant, secrets })
    }
}

impl FieldCrypto for AesGcmCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = match &self.variant {
            AesGcmVariant::Aes128(cipher) => cipher.encrypt(nonce, plaintext),
            AesGcmVariant::Aes256(cipher) => cipher.encrypt(nonce, plaintext),
        }
        .map_err(|e| Error::EncryptionFailed(format!("AES-GCM seal failed: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&sealed);
        Ok(blob)
    }

    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, Error> {
        if blob.len() < NONCE_SIZE {
            return Err(Error::BlobTooShort(blob.len()));
        }

        let (nonce_bytes, sealed) = blob.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        match &self.variant {
            AesGcmVariant::Aes128(cipher) => cipher.decrypt(nonce, sealed),
            AesGcmVariant::Aes256(cipher) => cipher.decrypt(nonce, sealed),
        }
        .map_err(|_| Error::AuthenticationFailed)
    }

    fn digest(&self, plaintext: &[u8]) -> Vec<u8> {
        search_digest(&self.secrets, plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DIGEST_SIZE;

    fn test_cipher(key_len: usize) -> AesGcmCipher {
        let secrets = Secrets::new(vec![0x42; key_len], b"test_pepper".to_vec()).unwrap();
        AesGcmCipher::new(secrets).unwrap()
    }

    #[test]
    fn test_round_trip_aes256() {
        let crypto = test_cipher(32);
        let plaintext = b"alice@example.com";

        let blob = crypto.encrypt(plaintext).expect("encryption failed");
        let decrypted = crypto.decrypt(&blob).expect("decryption failed");

        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_round_trip_aes128() {
        let crypto = test_cipher(16);
        let plaintext = b"alice@example.com";

        let blob = crypto.encrypt(plaintext).expect("encryption failed");
        let decrypted = crypto.decrypt(&blob).expect("decryption failed");

        assert_eq!(plaintext, &decrypted[..]);
    }

    #[test]
    fn test_encryption_is_non_deterministic() {
        let crypto = test_cipher(32);
        let plaintext = b"alice@example.com";

        let blob1 = crypto.encrypt(plaintext).unwrap();
        let blob2 = crypto.encrypt(plaintext).unwrap();

        // Fresh nonce per call: same plaintext, different blobs.
        assert_ne!(blob1, blob2);
        assert_eq!(crypto.decrypt(&blob1).unwrap(), crypto.decrypt(&blob2).unwrap());
    }

    #[test]
    fn test_blob_layout_nonce_prefix() {
        let crypto = test_cipher(32);
        let plaintext = b"x";

        let blob = crypto.encrypt(plaintext).unwrap();

        // nonce(12) + ciphertext(len) + tag(16)
        assert_eq!(blob.len(), NONCE_SIZE + plaintext.len() + 16);
    }

    #[test]
    fn test_tampering_any_byte_fails_authentication() {
        let crypto = test_cipher(32);
        let blob = crypto.encrypt(b"Jane Doe").unwrap();

        for i in 0..blob.len() {
            let mut tampered = blob.clone();
            tampered[i] ^= 0x01;

            let result = crypto.decrypt(&tampered);
            assert!(
                matches!(result, Err(Error::AuthenticationFailed)),
                "flipped byte {i} must fail authentication"
            );
        }
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let crypto = test_cipher(32);
        let other = {
            let secrets = Secrets::new(vec![0x43; 32], b"test_pepper".to_vec()).unwrap();
            AesGcmCipher::new(secrets).unwrap()
        };

        let blob = crypto.encrypt(b"secret").unwrap();
        let result = other.decrypt(&blob);

        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_truncated_blob_too_short() {
        let crypto = test_cipher(32);

        for len in 0..NONCE_SIZE {
            let result = crypto.decrypt(&vec![0u8; len]);
            assert!(
                matches!(result, Err(Error::BlobTooShort(actual)) if actual == len),
                "blob of {len} bytes must be rejected as too short"
            );
        }
    }

    #[test]
    fn test_nonce_only_blob_fails_authentication() {
        // Exactly 12 bytes leaves no room for the tag; the tag check fails.
        let crypto = test_cipher(32);
        let result = crypto.decrypt(&[0u8; NONCE_SIZE]);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let crypto = test_cipher(32);
        let blob = crypto.encrypt(b"").unwrap();
        assert_eq!(crypto.decrypt(&blob).unwrap(), b"");
    }

    #[test]
    fn test_large_plaintext_round_trip() {
        let crypto = test_cipher(32);
        let plaintext = vec![0x42; 10_000];

        let blob = crypto.encrypt(&plaintext).unwrap();
        assert_eq!(crypto.decrypt(&blob).unwrap(), plaintext);
    }

    #[test]
    fn test_digest_matches_free_function() {
        let crypto = test_cipher(32);
        let secrets = Secrets::new(vec![9u8; 32], b"test_pepper".to_vec()).unwrap();

        // Digest depends on the pepper only, so a cipher with a different
        // key but the same pepper produces the same digest.
        assert_eq!(crypto.digest(b"Jane Doe"), search_digest(&secrets, b"Jane Doe"));
        assert_eq!(crypto.digest(b"Jane Doe").len(), DIGEST_SIZE);
    }

    #[test]
    fn test_digest_and_ciphertext_are_independent() {
        let crypto = test_cipher(32);
        let plaintext = b"alice@example.com";

        let blob = crypto.encrypt(plaintext).unwrap();
        let digest = crypto.digest(plaintext);

        assert!(!blob.windows(digest.len()).any(|w| w == digest.as_slice()));
    }
}
