use crate::error::{StorageError, StorageErrorExt};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Infix of in-flight write files: `<leaf>.fstmp.<n>`.
pub(crate) const TMP_MARKER: &str = ".fstmp.";

/// Paths of non-directory entries below `root`, without following symlinks.
pub(crate) fn leaf_entries(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "Skipping unreadable storage entry");
                None
            },
        })
        .filter(|entry| !entry.file_type().is_dir())
        .map(DirEntry::into_path)
}

/// Removes temporary files left behind by writes that never completed.
///
/// The root is owned by a single engine, so at startup every temporary file is orphaned.
pub(crate) async fn purge_tmp(root: &Path) -> Result<(), StorageError> {
    let root = root.to_path_buf();
    let (removed, failed) = tokio::task::spawn_blocking(move || remove_orphans(&root))
        .await
        .map_err(std::io::Error::other)
        .context("Temp file cleanup task panicked")?;

    if removed > 0 || failed > 0 {
        info!(removed, failed, "Cleaned up temporary files");
    }
    Ok(())
}

fn remove_orphans(root: &Path) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    for path in leaf_entries(root).filter(|p| is_tmp(p)) {
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Temp file removal failed");
                failed += 1;
            },
        }
    }

    (removed, failed)
}

fn is_tmp(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(TMP_MARKER))
}

/// Counts every non-directory entry under `root`.
pub(crate) async fn count_items(root: &Path) -> Result<u64, StorageError> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || {
        u64::try_from(leaf_entries(&root).count()).unwrap_or(u64::MAX)
    })
        .await
        .map_err(std::io::Error::other)
        .context("Item counting task panicked")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn counts_files_at_every_depth() {
        let temp = TempDir::new().unwrap();
        assert_eq!(count_items(temp.path()).await.unwrap(), 0);

        std::fs::create_dir_all(temp.path().join("sub/dir")).unwrap();
        assert_eq!(count_items(temp.path()).await.unwrap(), 0);

        std::fs::write(temp.path().join("sub/dir/a"), b"").unwrap();
        std::fs::write(temp.path().join("sub/b"), b"").unwrap();
        std::fs::write(temp.path().join("c"), b"").unwrap();
        assert_eq!(count_items(temp.path()).await.unwrap(), 3);

        std::fs::remove_dir_all(temp.path().join("sub")).unwrap();
        assert_eq!(count_items(temp.path()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn purge_removes_only_temporary_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("fo")).unwrap();
        std::fs::write(temp.path().join("fo/foo.storage"), b"keep").unwrap();
        std::fs::write(temp.path().join("fo/foo.storage.fstmp.7"), b"drop").unwrap();

        purge_tmp(temp.path()).await.unwrap();

        assert!(temp.path().join("fo/foo.storage").exists());
        assert!(!temp.path().join("fo/foo.storage.fstmp.7").exists());
    }
}
