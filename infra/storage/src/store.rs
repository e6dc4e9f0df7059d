use crate::engine::Storage;
use crate::error::StorageError;
use std::future::Future;
use tokio::io::AsyncRead;

/// The capability a transport layer needs from an item backend.
///
/// [`Storage`] is the local implementation; a forwarding backend would implement
/// the same surface against a remote instance.
pub trait ItemStore: Send + Sync {
    /// Readable handle over an item's current content.
    type Reader: AsyncRead + Send + Unpin;

    fn create(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn read(&self, name: &str) -> impl Future<Output = Result<Self::Reader, StorageError>> + Send;

    fn update(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn count(&self) -> u64;

    fn scan(&self, pattern: &str) -> impl Future<Output = Result<Vec<String>, StorageError>> + Send;
}

impl ItemStore for Storage {
    type Reader = tokio::fs::File;

    async fn create(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        Self::create(self, name, data).await
    }

    async fn read(&self, name: &str) -> Result<Self::Reader, StorageError> {
        Self::read(self, name).await
    }

    async fn update(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        Self::update(self, name, data).await
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        Self::delete(self, name).await
    }

    fn count(&self) -> u64 {
        Self::count(self)
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StorageError> {
        Self::scan(self, pattern).await
    }
}
