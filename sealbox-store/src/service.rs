//! Orchestration of plaintext requests over the codec and the gateway.

use std::sync::Arc;

use tracing::error;

use crate::codec::RecordCodec;
use crate::error::{Result, StoreError};
use crate::record::{NewUser, User, UserFilter};
use crate::repository::UserRepository;

/// Drives the record codec and the persistence gateway for plaintext
/// requests and assembles plaintext responses.
///
/// Stateless and safe for concurrent use; no retries are performed here,
/// the caller owns retry policy.
pub struct UserService {
    codec: RecordCodec,
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Creates a service over the given codec and repository.
    #[must_use]
    pub fn new(codec: RecordCodec, repository: Arc<dyn UserRepository>) -> Self {
        Self { codec, repository }
    }

    /// Creates a user with encrypted name and email.
    ///
    /// The response echoes the request plaintext together with the assigned
    /// identifier and creation timestamp; nothing is re-read from storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] when a required field is blank,
    /// the cipher error when encrypt-on-write fails (fatal to the write),
    /// and the typed storage error from the gateway otherwise.
    pub fn create(&self, request: NewUser) -> Result<User> {
        validate(&request)?;

        let record = self.codec.to_storage(&request).map_err(|err| {
            error!(%err, "encrypt-on-write failed");
            err
        })?;
        let id = self.repository.save(&record)?;

        Ok(User {
            id,
            name: request.name,
            email: request.email,
            created_at: record.created_at,
        })
    }

    /// Equality lookup by plaintext name, or all users when the filter is
    /// empty.
    ///
    /// The filter value is digested and compared against stored digests;
    /// matching rows are decrypted per field, tolerating individual field
    /// failures (see [`RecordCodec::to_domain`]). Records come back in
    /// storage order.
    ///
    /// # Errors
    ///
    /// Returns the typed storage error on query failure. An empty result is
    /// success.
    pub fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let digest_filter = self.codec.digest_filter(filter);
        let records = self.repository.find_many(&digest_filter)?;

        Ok(records.iter().map(|record| self.codec.to_domain(record)).collect())
    }
}

fn validate(request: &NewUser) -> Result<()> {
    if request.name.trim().is_empty() {
        return Err(StoreError::InvalidInput("name is required".to_string()));
    }
    if request.email.trim().is_empty() {
        return Err(StoreError::InvalidInput("email is required".to_string()));
    }
    Ok(())
}
