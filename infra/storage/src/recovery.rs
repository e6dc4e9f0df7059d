//! Existence checks with self-healing for the one known corruption mode: a
//! directory sitting where a leaf file belongs. The engine never creates
//! directories at leaf positions, so such a directory is external interference.

use crate::error::{StorageError, StorageErrorExt};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Outcome of an existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// Reports whether an item leaf exists at `path`, clearing a stray directory if one is found.
///
/// Symlinks are inspected, not followed.
///
/// # Errors
/// Returns [`StorageError::CorruptionDetected`] when a directory occupies the leaf
/// position and could not be removed completely, or [`StorageError::Service`]
/// when the metadata lookup itself fails.
pub(crate) async fn check(path: &Path) -> Result<Presence, StorageError> {
    match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            recover(path).await?;
            Ok(Presence::Absent)
        },
        Ok(_) => Ok(Presence::Present),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Presence::Absent),
        Err(err) => Err(err).context(format!("Failed to inspect {}", path.display())),
    }
}

async fn recover(path: &Path) -> Result<(), StorageError> {
    error!(
        path = %path.display(),
        "Found a directory where an item was expected. Storage might have been corrupted"
    );
    info!(path = %path.display(), "Recovering storage: deleting directory");

    let target = path.to_path_buf();
    let failed = tokio::task::spawn_blocking(move || remove_tree(&target))
        .await
        .map_err(std::io::Error::other)
        .context("Recovery task panicked")?;

    if failed == 0 {
        info!(path = %path.display(), "Recovering storage finished successfully");
        Ok(())
    } else {
        error!(path = %path.display(), failed, "Recovering storage failed! Fix it manually");
        Err(StorageError::CorruptionDetected {
            message: path.display().to_string().into(),
            context: Some(format!("{failed} entries could not be removed").into()),
        })
    }
}

/// Removes `root` and everything below it without following symlinks.
///
/// Keeps going past individual failures and returns how many entries it could
/// not remove; zero means `root` is gone.
pub(crate) fn remove_tree(root: &Path) -> usize {
    let mut failed = 0;

    for entry in WalkDir::new(root).follow_links(false).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.io_error().is_some_and(|e| e.kind() == ErrorKind::NotFound) {
                    continue;
                }
                warn!(path = ?err.path().map(Path::display), error = %err, "Walk failed");
                failed += 1;
                continue;
            },
        };

        let path = entry.path();
        let removal = if entry.file_type().is_dir() {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        };

        match removal {
            Ok(()) => {},
            Err(err) if err.kind() == ErrorKind::NotFound => {},
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Could not be deleted. Skipping it");
                failed += 1;
            },
        }
    }

    if failed == 0 && root.symlink_metadata().is_ok() {
        failed += 1;
    }

    failed
}
