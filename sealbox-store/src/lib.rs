//! # Sealbox store
//!
//! Encrypted user store built on the `sealbox` crypto core.
//!
//! Sensitive fields are persisted as AEAD ciphertext blobs; equality search
//! runs against deterministic keyed digests stored alongside them, so the
//! storage layer never sees or compares plaintext.
//!
//! ## Components
//!
//! - [`codec::RecordCodec`] — maps plaintext records to/from their storage
//!   form, encrypting and digesting per field
//! - [`repository::UserRepository`] — persistence gateway abstraction, with
//!   a SQLite backend in [`sqlite`]
//! - [`service::UserService`] — orchestrates codec and gateway for
//!   plaintext requests and responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealbox_store::prelude::*;
//!
//! let repository = Arc::new(SqliteUserRepository::open(path)?);
//! let codec = RecordCodec::new(Arc::new(crypto));
//! let service = UserService::new(codec, repository);
//!
//! let user = service.create(NewUser {
//!     name: "Jane Doe".into(),
//!     email: "jane@example.com".into(),
//! })?;
//! let found = service.find_many(&UserFilter { name: Some("Jane Doe".into()) })?;
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod error;
pub mod record;
pub mod repository;
pub mod service;
pub mod sqlite;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::codec::RecordCodec;
    pub use crate::error::{Result, StoreError};
    pub use crate::record::{NewUser, User, UserFilter};
    pub use crate::repository::UserRepository;
    pub use crate::service::UserService;
    pub use crate::sqlite::SqliteUserRepository;
}
