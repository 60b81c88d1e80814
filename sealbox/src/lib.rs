//! # Sealbox
//!
//! Field-level encryption for personally-identifiable data with keyed
//! search digests for exact-match lookup.
//!
//! ## Features
//!
//! - AEAD encryption (AES-128-GCM / AES-256-GCM selected by key length)
//! - Fresh random nonce per encryption; blob layout `nonce || ciphertext+tag`
//! - Deterministic keyed search digests for equality queries
//! - Secret key and pepper held in [`secrecy`] wrappers, injected at
//!   construction
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealbox::prelude::*;
//!
//! let secrets = Secrets::new(key_bytes, pepper_bytes)?;
//! let crypto = AesGcmCipher::new(secrets)?;
//!
//! let blob = crypto.encrypt(b"jane@example.com")?;
//! let digest = crypto.digest(b"jane@example.com");
//! let plaintext = crypto.decrypt(&blob)?;
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cipher;
pub mod digest;
pub mod error;
pub mod secrets;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::cipher::{AesGcmCipher, FieldCrypto};
    pub use crate::digest::search_digest;
    pub use crate::error::Error;
    pub use crate::secrets::Secrets;
}
