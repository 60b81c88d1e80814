//! Persistence gateway abstraction for storage-level user rows.

use uuid::Uuid;

use crate::error::Result;
use crate::record::{DigestFilter, StoredUser};

/// Capability interface for the persistence gateway.
///
/// Implementations store ciphertext blobs and search digests only; equality
/// filters are compared against stored digests, never against plaintext or
/// ciphertext. Implementations must be thread-safe (`Send + Sync`);
/// correctness of concurrent writes relies on the storage layer's own
/// isolation and uniqueness enforcement.
pub trait UserRepository: Send + Sync {
    /// Inserts a storage-level record, returning its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError::Conflict`] when a uniqueness
    /// constraint is violated (duplicate identifier) and
    /// [`crate::error::StoreError::Internal`] on any other driver failure.
    /// `NotFound` is never raised on write.
    fn save(&self, record: &StoredUser) -> Result<Uuid>;

    /// Returns rows whose stored digest equals the filter digest, in
    /// storage order. With an empty filter, returns all rows (unbounded).
    ///
    /// An empty result set is success, not `NotFound`. Only exact digest
    /// equality is possible; range, prefix, or partial matches cannot be
    /// expressed over a hash.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StoreError::Internal`] on driver or query
    /// failure.
    fn find_many(&self, filter: &DigestFilter) -> Result<Vec<StoredUser>>;
}
