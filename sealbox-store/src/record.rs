//! Record types for the encrypted user store.
//!
//! Two representations exist for every user: the plaintext form exposed to
//! callers and the storage form holding ciphertext blobs plus the search
//! digest. Only the [`crate::codec::RecordCodec`] converts between them;
//! the persistence layer exclusively handles the storage form.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plaintext request to create a user. Both fields are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Full name; searchable by exact match.
    pub name: String,
    /// Email address; encrypted but not searchable.
    pub email: String,
}

/// Decrypted user as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier assigned at creation; immutable.
    pub id: Uuid,
    /// Decrypted name. Empty when the field failed to decrypt (see
    /// [`crate::codec::RecordCodec::to_domain`]).
    pub name: String,
    /// Decrypted email. Empty when the field failed to decrypt.
    pub email: String,
    /// Creation timestamp in the configured time zone; immutable.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<FixedOffset>,
}

/// Storage-level user row. Never contains plaintext.
#[derive(Debug, Clone)]
pub struct StoredUser {
    /// Opaque identifier, primary key.
    pub id: Uuid,
    /// AEAD blob for the name: `nonce || ciphertext+tag`.
    pub name_ciphertext: Vec<u8>,
    /// Deterministic search digest of the name.
    pub name_digest: Vec<u8>,
    /// AEAD blob for the email.
    pub email_ciphertext: Vec<u8>,
    /// Creation timestamp, stored as RFC 3339 text.
    pub created_at: DateTime<FixedOffset>,
}

/// Plaintext equality filter for lookups. An empty filter matches all.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Exact name to match, if any.
    pub name: Option<String>,
}

/// Filter after digest rewriting; compared against stored digests only.
#[derive(Debug, Clone, Default)]
pub struct DigestFilter {
    /// Search digest of the name filter, if one was given.
    pub name_digest: Option<Vec<u8>>,
}
