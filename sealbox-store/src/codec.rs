//! Codec between plaintext user records and their storage form.
//!
//! The codec is the only component that touches both representations: it
//! encrypts and digests sensitive fields on the way into storage and
//! decrypts them on the way out. It also owns identifier and timestamp
//! assignment, so a record's id and `created_at` are fixed before the
//! gateway ever sees it.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use sealbox::cipher::FieldCrypto;
use tracing::error;
use uuid::Uuid;

use crate::error::Result;
use crate::record::{DigestFilter, NewUser, StoredUser, User, UserFilter};

/// Maps application records to/from storage records, one field at a time.
///
/// All operations are stateless and safe to invoke concurrently.
pub struct RecordCodec {
    crypto: Arc<dyn FieldCrypto>,
    offset: FixedOffset,
}

impl RecordCodec {
    /// Creates a codec over the given field crypto. Timestamps default to
    /// UTC.
    #[must_use]
    pub fn new(crypto: Arc<dyn FieldCrypto>) -> Self {
        Self { crypto, offset: Utc.fix() }
    }

    /// Sets the time zone offset applied to creation timestamps.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Builds the storage form of a new user.
    ///
    /// Name and email are each encrypted with a fresh nonce; the name, being
    /// searchable, additionally gets a search digest. A new random id and
    /// the current timestamp are assigned here and are immutable once
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns the cipher error if encryption fails; an encrypt failure is
    /// fatal to the write.
    pub fn to_storage(&self, request: &NewUser) -> Result<StoredUser> {
        Ok(StoredUser {
            id: Uuid::new_v4(),
            name_ciphertext: self.crypto.encrypt(request.name.as_bytes())?,
            name_digest: self.crypto.digest(request.name.as_bytes()),
            email_ciphertext: self.crypto.encrypt(request.email.as_bytes())?,
            created_at: Utc::now().with_timezone(&self.offset),
        })
    }

    /// Decrypts a stored row back into a plaintext user.
    ///
    /// A field that fails to decrypt is logged and surfaced as an empty
    /// string instead of failing the record or the response. Callers
    /// needing strict integrity must treat an empty decrypted field plus
    /// the accompanying error log as a data-integrity alert.
    #[must_use]
    pub fn to_domain(&self, record: &StoredUser) -> User {
        User {
            id: record.id,
            name: self.decrypt_or_empty(&record.name_ciphertext, record.id, "name"),
            email: self.decrypt_or_empty(&record.email_ciphertext, record.id, "email"),
            created_at: record.created_at,
        }
    }

    /// Rewrites a plaintext equality filter into its digest form for the
    /// persistence gateway.
    #[must_use]
    pub fn digest_filter(&self, filter: &UserFilter) -> DigestFilter {
        DigestFilter {
            name_digest: filter.name.as_deref().map(|name| self.crypto.digest(name.as_bytes())),
        }
    }

    fn decrypt_or_empty(&self, blob: &[u8], id: Uuid, field: &'static str) -> String {
        match self.crypto.decrypt(blob) {
            Ok(plaintext) => String::from_utf8_lossy(&plaintext).into_owned(),
            Err(err) => {
                error!(%id, field, %err, "field decryption failed, returning empty value");
                String::new()
            }
        }
    }
}
