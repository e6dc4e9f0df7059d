//! A directory-sharded item storage engine.
//!
//! Items are opaque byte payloads addressed by a validated name. Each name maps
//! deterministically to a leaf file nested under two-character shard directories, so
//! the filesystem itself is the index and the only source of truth for content.
//!
//! # Core Features
//!
//! - **Name Validation**: names are 1 to 64 characters from `[A-Za-z0-9_-]`, checked
//!   before any filesystem access.
//! - **Sharding**: `test_file_1` lands at `<root>/te/st/_f/test_file_1.storage` with an
//!   imbrication level of 3.
//! - **Self-Healing**: a directory found where a leaf belongs is removed and the slot
//!   treated as empty.
//! - **Live Counting**: the item count is taken once at startup and kept current with
//!   atomic increments and decrements.
//! - **Atomic Writes**: content is written to a temporary sibling, synced, and renamed
//!   into place.
//! - **Pattern Queries**: whole-name regular expression matching over all stored items.
//!
//! # Architectural Overview
//!
//! 1.  **[`Storage`]**: the thread-safe handle and single entry point.
//! 2.  **[`StorageBuilder`]**: a type-safe fluent builder for configuration.
//! 3.  **[`ItemStore`]**: the backend capability implemented by [`Storage`].
//!
//! # Examples
//!
//! ```rust
//! use fstore_storage::{ErrorKind, Storage, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let storage = Storage::builder().root(&root).connect().await?;
//!
//!     storage.create("foo", b"foo_content").await?;
//!     storage.update("foo", b"replaced").await?;
//!     assert_eq!(storage.read_bytes("foo").await?, b"replaced");
//!
//!     let err = storage.create("foo", b"again").await.unwrap_err();
//!     assert_eq!(err.kind(), ErrorKind::AlreadyExists);
//!
//!     storage.delete("foo").await?;
//!     assert_eq!(storage.count(), 0);
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod layout;
mod locks;
mod maintenance;
mod name;
mod recovery;
mod scan;
mod store;

pub use builder::{DEFAULT_IMBRICATION_LEVEL, StorageBuilder};
pub use engine::Storage;
pub use error::{ErrorKind, StorageError, StorageErrorExt};
pub use layout::{CHUNK_SIZE, ITEM_EXTENSION, Layout, ResolvedPath};
pub use name::{ItemName, MAX_NAME_LEN, NamePattern, validate_name, validate_pattern};
pub use recovery::Presence;
pub use store::ItemStore;
