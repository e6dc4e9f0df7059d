use crate::engine::{Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use crate::layout::Layout;
use crate::locks::NameLocks;
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

/// Nesting depth used when none is configured.
pub const DEFAULT_IMBRICATION_LEVEL: usize = 3;

#[derive(Debug, Clone)]
struct StorageConfig {
    imbrication_level: usize,
    create: bool,
    serialize_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { imbrication_level: DEFAULT_IMBRICATION_LEVEL, create: true, serialize_writes: false }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StorageBuilder<S: Sealed = NoRoot> {
    state: S,
    config: StorageConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> StorageBuilder<S> {
    /// Maximum number of two-character shard directories above each leaf.
    ///
    /// Zero is rejected by [`StorageBuilder::connect`].
    #[must_use = "Sets the sharding depth of the storage engine"]
    pub const fn imbrication_level(mut self, level: usize) -> Self {
        self.config.imbrication_level = level;
        self
    }

    #[must_use = "Sets whether the storage root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    /// Serializes create/update/delete on the same name through a per-name lock held
    /// across the existence check and the write.
    ///
    /// Off by default: concurrent same-name creates may then both succeed, with the
    /// last writer winning and the item counted twice.
    #[must_use = "Sets whether same-name mutations are serialized"]
    pub const fn serialize_writes(mut self, enable: bool) -> Self {
        self.config.serialize_writes = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> StorageBuilder<N> {
        StorageBuilder { state, config: self.config }
    }
}

impl StorageBuilder<NoRoot> {
    #[must_use = "Creates a new storage builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory path for the storage engine"]
    pub fn root(self, path: impl Into<PathBuf>) -> StorageBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl StorageBuilder<WithRoot> {
    /// Consumes the configuration and initializes the storage engine.
    ///
    /// Boot sequence:
    /// 1. **Validation**: rejects a zero imbrication level before touching the disk.
    /// 2. **Bootstrapping**: creates the root and its ancestors if `create(true)` (default).
    /// 3. **Canonicalization**: resolves the root to its physical path.
    /// 4. **Self-Healing**: removes temporary files left by interrupted writes.
    /// 5. **Counting**: walks the root once and seeds the item counter with the
    ///    number of non-directory entries. The counter is never rescanned afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfiguration`] if the imbrication level is zero or
    /// the root does not exist while `create(false)` is set.
    /// Returns [`StorageError::Service`] if the root cannot be created, resolved or walked.
    pub async fn connect(self) -> Result<Storage, StorageError> {
        let root = &self.state.0;
        Layout::new(root, self.config.imbrication_level)?;

        if self.config.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap storage root: {}", root.display()))?;
        }

        let canonical = match fs::canonicalize(root).await {
            Ok(canonical) => canonical,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::InvalidConfiguration {
                    message: root.display().to_string().into(),
                    context: Some("Storage root does not exist and creation is disabled".into()),
                });
            },
            Err(err) => {
                return Err(err)
                    .context(format!("Failed to resolve storage root: {}", root.display()));
            },
        };

        let storage = Storage {
            inner: Arc::new(StorageInner {
                layout: Layout::new(canonical, self.config.imbrication_level)?,
                items: AtomicU64::new(0),
                tmp_counter: AtomicU64::new(1),
                locks: NameLocks::new(self.config.serialize_writes),
            }),
        };

        storage.bootstrap().await?;

        info!(
            root = %storage.root().display(),
            imbrication_level = storage.imbrication_level(),
            items = storage.count(),
            serialize_writes = self.config.serialize_writes,
            "Storage engine ready"
        );
        Ok(storage)
    }
}
