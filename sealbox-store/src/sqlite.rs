//! SQLite-backed persistence gateway.
//!
//! One `users` table keyed by the opaque identifier, with a ciphertext
//! column per sensitive field, an indexed digest column for the searchable
//! field, and a creation timestamp stored as RFC 3339 text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::DateTime;
use rusqlite::{params, Connection, Transaction};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::record::{DigestFilter, StoredUser};
use crate::repository::UserRepository;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id               TEXT PRIMARY KEY,
    name_ciphertext  BLOB NOT NULL,
    name_digest      BLOB NOT NULL,
    email_ciphertext BLOB NOT NULL,
    created_at       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_name_digest ON users (name_digest);
";

/// SQLite implementation of the persistence gateway.
///
/// The connection lives behind a mutex; every operation acquires it for
/// its duration and releases it on all exit paths.
pub struct SqliteUserRepository {
    conn: Mutex<Connection>,
}

impl SqliteUserRepository {
    /// Opens (or creates) a database file and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the file cannot be opened or the
    /// schema cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database, for tests and ephemeral use.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Internal`] if the connection cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Runs `f` inside a transaction scoped to this call.
    ///
    /// Commits when `f` returns `Ok`; rolls back when it returns `Err` or
    /// panics (the unfinished transaction rolls back on drop). This is the
    /// write path for callers that batch multiple inserts atomically.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or [`StoreError`] mapped from the driver
    /// if the transaction cannot begin or commit.
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let conn = self.lock_conn()?;
        let tx = conn.unchecked_transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Inserts a record using the supplied transaction. Commit and rollback
    /// stay with the transaction owner.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a duplicate identifier and
    /// [`StoreError::Internal`] on any other driver failure.
    pub fn save_in_tx(tx: &Transaction<'_>, record: &StoredUser) -> Result<Uuid> {
        tx.execute(
            "INSERT INTO users (id, name_ciphertext, name_digest, email_ciphertext, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.to_string(),
                record.name_ciphertext,
                record.name_digest,
                record.email_ciphertext,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(record.id)
    }

    /// Lock the connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("connection mutex poisoned".to_string()))
    }
}

impl UserRepository for SqliteUserRepository {
    fn save(&self, record: &StoredUser) -> Result<Uuid> {
        self.with_transaction(|tx| Self::save_in_tx(tx, record))
    }

    fn find_many(&self, filter: &DigestFilter) -> Result<Vec<StoredUser>> {
        let conn = self.lock_conn()?;

        let mut sql = String::from(
            "SELECT id, name_ciphertext, name_digest, email_ciphertext, created_at FROM users",
        );
        let mut bindings: Vec<&dyn rusqlite::ToSql> = Vec::new();
        if let Some(digest) = &filter.name_digest {
            sql.push_str(" WHERE name_digest = ?1");
            bindings.push(digest);
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(bindings.as_slice(), |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name_ciphertext: row.get(1)?,
                name_digest: row.get(2)?,
                email_ciphertext: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(StoredUser::try_from(row?)?);
        }
        Ok(records)
    }
}

/// Raw row data from the users table, before parsing into [`StoredUser`].
struct UserRow {
    id: String,
    name_ciphertext: Vec<u8>,
    name_digest: Vec<u8>,
    email_ciphertext: Vec<u8>,
    created_at: String,
}

impl TryFrom<UserRow> for StoredUser {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| StoreError::Internal(format!("invalid user UUID: {e}")))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| StoreError::Internal(format!("invalid timestamp: {e}")))?;

        Ok(Self {
            id,
            name_ciphertext: row.name_ciphertext,
            name_digest: row.name_digest,
            email_ciphertext: row.email_ciphertext,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn stored_user(digest_byte: u8) -> StoredUser {
        let offset = FixedOffset::east_opt(0).unwrap();
        StoredUser {
            id: Uuid::new_v4(),
            name_ciphertext: vec![1, 2, 3],
            name_digest: vec![digest_byte; 32],
            email_ciphertext: vec![4, 5, 6],
            created_at: offset.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_save_and_find_all() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();

        let record = stored_user(0xAA);
        let id = repo.save(&record).unwrap();
        assert_eq!(id, record.id);

        let rows = repo.find_many(&DigestFilter::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, record.id);
        assert_eq!(rows[0].name_ciphertext, record.name_ciphertext);
        assert_eq!(rows[0].created_at, record.created_at);
    }

    #[test]
    fn test_find_filters_by_digest_equality() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();

        let alice = stored_user(0xAA);
        let bob = stored_user(0xBB);
        repo.save(&alice).unwrap();
        repo.save(&bob).unwrap();

        let filter = DigestFilter { name_digest: Some(vec![0xAA; 32]) };
        let rows = repo.find_many(&filter).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, alice.id);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();
        repo.save(&stored_user(0xAA)).unwrap();

        let filter = DigestFilter { name_digest: Some(vec![0xCC; 32]) };
        let rows = repo.find_many(&filter).unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_duplicate_id_is_conflict() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();

        let record = stored_user(0xAA);
        repo.save(&record).unwrap();

        let mut duplicate = stored_user(0xBB);
        duplicate.id = record.id;

        let result = repo.save(&duplicate);
        assert!(matches!(result, Err(StoreError::Conflict)));
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();
        let record = stored_user(0xAA);

        let result: Result<()> = repo.with_transaction(|tx| {
            SqliteUserRepository::save_in_tx(tx, &record)?;
            Err(StoreError::Internal("forced failure".to_string()))
        });
        assert!(result.is_err());

        let rows = repo.find_many(&DigestFilter::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_transaction_batches_multiple_inserts() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();
        let first = stored_user(0xAA);
        let second = stored_user(0xBB);

        repo.with_transaction(|tx| {
            SqliteUserRepository::save_in_tx(tx, &first)?;
            SqliteUserRepository::save_in_tx(tx, &second)?;
            Ok(())
        })
        .unwrap();

        let rows = repo.find_many(&DigestFilter::default()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let repo = SqliteUserRepository::open_in_memory().unwrap();

        let first = stored_user(0xAA);
        let second = stored_user(0xBB);
        repo.save(&first).unwrap();
        repo.save(&second).unwrap();

        let rows = repo.find_many(&DigestFilter::default()).unwrap();
        assert_eq!(rows[0].id, first.id);
        assert_eq!(rows[1].id, second.id);
    }
}
