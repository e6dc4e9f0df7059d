//! The storage engine: validated, sharded create/read/update/delete with a live item count.
//!
//! Every operation runs the same pipeline: validate the name, resolve its leaf path,
//! check existence (recovering a stray directory if needed), then act. Nothing is held
//! between the check and the act unless per-name serialization was enabled at build time.

use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::layout::{Layout, ResolvedPath};
use crate::locks::NameLocks;
use crate::name::{ItemName, NamePattern};
use crate::recovery::{self, Presence};
use crate::{maintenance, scan};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};

/// The internal shared state of a [`Storage`] instance.
#[derive(Debug)]
pub struct StorageInner {
    /// Canonical root plus the sharding rule.
    pub(crate) layout: Layout,
    /// Items under the root; seeded by a walk at startup, then maintained incrementally.
    pub(crate) items: AtomicU64,
    /// Source of unique temporary file names.
    pub(crate) tmp_counter: AtomicU64,
    pub(crate) locks: NameLocks,
}

/// A thread-safe handle to the storage engine.
///
/// Cloning is cheap (`Arc`); all clones share the same root and item counter.
///
/// # Example
///
/// ```rust
/// use fstore_storage::{Storage, StorageError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("data");
///     let storage = Storage::builder().root(&root).imbrication_level(3).connect().await?;
///
///     storage.create("test_file_1", b"hello").await?;
///     assert_eq!(storage.read_bytes("test_file_1").await?, b"hello");
///
///     // <root>/te/st/_f/test_file_1.storage
///     let resolved = storage.resolve("test_file_1")?;
///     assert_eq!(resolved.segments, ["te", "st", "_f"]);
///
///     assert_eq!(storage.count(), 1);
///     assert_eq!(storage.scan("test.*").await?, ["test_file_1"]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// The canonical storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    #[must_use]
    pub fn imbrication_level(&self) -> usize {
        self.layout.imbrication_level()
    }

    /// Validates `name` and computes where it lives on disk. No I/O.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] if the name fails validation.
    pub fn resolve<N>(&self, name: N) -> Result<ResolvedPath, StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        Ok(self.layout.resolve(&name.try_into()?))
    }

    /// Reports whether `name` currently holds an item.
    ///
    /// A directory found at the leaf position is removed and reported as absent.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] for invalid names,
    /// [`StorageError::CorruptionDetected`] if a stray directory could not be removed.
    pub async fn exists<N>(&self, name: N) -> Result<Presence, StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        let resolved = self.resolve(name)?;
        recovery::check(&resolved.path).await
    }

    /// Stores a new item.
    ///
    /// The counter is incremented only after the data has been renamed into place.
    ///
    /// # Errors
    /// * [`StorageError::InvalidName`] before any filesystem access.
    /// * [`StorageError::AlreadyExists`] if the item is present; its content and the
    ///   counter are left untouched.
    /// * [`StorageError::CorruptionDetected`] if a stray directory blocks the slot and
    ///   cannot be removed.
    /// * [`StorageError::Service`] if the write fails.
    pub async fn create<N>(&self, name: N, data: &[u8]) -> Result<(), StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        let name = name.try_into()?;
        let resolved = self.layout.resolve(&name);
        let _guard = self.locks.acquire(name.as_str()).await;

        if recovery::check(&resolved.path).await?.is_present() {
            return Err(StorageError::AlreadyExists {
                message: name.into_inner().into(),
                context: None,
            });
        }

        self.write_atomic(&resolved.path, data).await?;
        self.items.fetch_add(1, Ordering::AcqRel);

        debug!(name = %name, path = %resolved.path.display(), "Item created");
        Ok(())
    }

    /// Opens an item for reading. The handle reads whatever is on disk, no caching.
    ///
    /// # Errors
    /// * [`StorageError::InvalidName`] before any filesystem access.
    /// * [`StorageError::Missing`] if no item exists, including when a stray directory
    ///   occupied the slot.
    /// * [`StorageError::Service`] if the file cannot be opened.
    pub async fn read<N>(&self, name: N) -> Result<fs::File, StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        let name = name.try_into()?;
        let resolved = self.require_present(&name).await?;

        match fs::File::open(&resolved.path).await {
            Ok(file) => Ok(file),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::missing(name.as_str()))
            },
            Err(err) => Err(err).context(format!("Read failed: {}", resolved.path.display())),
        }
    }

    /// Reads the entire content of an item.
    ///
    /// # Errors
    /// Same as [`Storage::read`].
    pub async fn read_bytes<N>(&self, name: N) -> Result<Vec<u8>, StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        let mut file = self.read(name).await?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).await.context("Read failed")?;
        Ok(data)
    }

    /// Replaces the full content of an existing item. Never creates; the counter is unchanged.
    ///
    /// # Errors
    /// * [`StorageError::InvalidName`] before any filesystem access.
    /// * [`StorageError::Missing`] if no item exists.
    /// * [`StorageError::Service`] if the write fails; the previous content stays in place.
    pub async fn update<N>(&self, name: N, data: &[u8]) -> Result<(), StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        let name = name.try_into()?;
        let _guard = self.locks.acquire(name.as_str()).await;
        let resolved = self.require_present(&name).await?;

        self.write_atomic(&resolved.path, data).await?;

        debug!(name = %name, path = %resolved.path.display(), "Item updated");
        Ok(())
    }

    /// Removes an item and decrements the counter.
    ///
    /// # Errors
    /// * [`StorageError::InvalidName`] before any filesystem access.
    /// * [`StorageError::Missing`] if no item exists.
    /// * [`StorageError::CorruptionDetected`] if the confirmed-present leaf cannot be removed.
    pub async fn delete<N>(&self, name: N) -> Result<(), StorageError>
    where
        N: TryInto<ItemName, Error = StorageError>,
    {
        let name = name.try_into()?;
        let _guard = self.locks.acquire(name.as_str()).await;
        let resolved = self.require_present(&name).await?;

        if let Err(err) = fs::remove_file(&resolved.path).await {
            return Err(StorageError::CorruptionDetected {
                message: resolved.path.display().to_string().into(),
                context: Some(format!("Failed to delete item: {err}").into()),
            });
        }

        // Saturating: files removed behind the engine's back must not wrap the counter.
        let _ = self.items.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));

        debug!(name = %name, path = %resolved.path.display(), "Item deleted");
        Ok(())
    }

    /// Number of stored items. No I/O.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.load(Ordering::Acquire)
    }

    /// Names of all stored items whose whole name matches `pattern`. Order is unspecified.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidPattern`] for blank or unparseable patterns, before
    /// any filesystem access.
    pub async fn scan(&self, pattern: &str) -> Result<Vec<String>, StorageError> {
        let pattern = NamePattern::new(pattern)?;
        scan::scan(self.layout.root(), pattern).await
    }

    /// Resolves `name` and fails with [`StorageError::Missing`] unless an item is present.
    ///
    /// An unrecoverable stray directory is reported as missing too: the likeliest story
    /// is that the item was never created and something else made the directory.
    async fn require_present(&self, name: &ItemName) -> Result<ResolvedPath, StorageError> {
        let resolved = self.layout.resolve(name);
        mask_corruption(recovery::check(&resolved.path).await, name)?;
        Ok(resolved)
    }

    /// Writes `data` next to `target` and renames it into place.
    ///
    /// Shard directories are created on demand. A failed write leaves the previous
    /// content (or absence) of `target` untouched.
    async fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create shards for {}", target.display()))?;
        }

        let temp = unique_tmp_path(target, &self.tmp_counter);

        let written = async {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
            fs::rename(&temp, target)
                .await
                .context(format!("Atomic swap failed: {} -> {}", temp.display(), target.display()))
        }
        .await;

        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&temp).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                warn!(path = %temp.display(), error = %cleanup, "Temp file cleanup failed");
            }
            return Err(err);
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent).await;
        }
        Ok(())
    }

    pub(crate) async fn bootstrap(&self) -> Result<(), StorageError> {
        maintenance::purge_tmp(self.layout.root()).await?;
        let items = maintenance::count_items(self.layout.root()).await?;
        self.items.store(items, Ordering::Release);
        Ok(())
    }
}

/// Turns an existence check into "present or `Missing`", folding an unrecoverable
/// leaf directory into `Missing` while keeping its context.
fn mask_corruption(
    checked: Result<Presence, StorageError>,
    name: &ItemName,
) -> Result<(), StorageError> {
    match checked {
        Ok(Presence::Present) => Ok(()),
        Ok(Presence::Absent) => Err(StorageError::missing(name.as_str())),
        Err(StorageError::CorruptionDetected { context, .. }) => {
            warn!(name = %name, "Treating unrecoverable leaf directory as a missing item");
            Err(StorageError::Missing { message: name.as_str().to_owned().into(), context })
        },
        Err(err) => Err(err),
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                debug!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("item");
    target.with_file_name(format!("{file_name}{}{counter}", maintenance::TMP_MARKER))
}
