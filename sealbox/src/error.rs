//! Error types for `Sealbox` operations.

/// Main error type for `Sealbox` crypto operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Secret key length does not select a supported AES variant
    #[error("invalid key length: {actual} bytes (expected 16 or 32)")]
    InvalidKeyLength {
        /// The length of the rejected key
        actual: usize,
    },

    /// The OS random source could not supply nonce or key material
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),

    /// Ciphertext blob is shorter than the nonce prefix
    #[error("ciphertext blob too short: {0} bytes")]
    BlobTooShort(usize),

    /// Authentication tag verification failed (data may be corrupted or tampered)
    #[error("authentication failed: ciphertext may be corrupted or tampered")]
    AuthenticationFailed,

    /// Encryption operation failed
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}
