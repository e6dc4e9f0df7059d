use crate::error::{StorageError, StorageErrorExt};
use crate::layout::name_from_leaf;
use crate::maintenance::leaf_entries;
use crate::name::{NamePattern, validate_name};
use std::path::Path;
use tracing::debug;

/// Walks `root` and returns the names of all items whose whole name matches `pattern`.
///
/// Files without the marker extension (foreign files, in-flight writes) are ignored,
/// as are leaves whose stem is not a valid item name. Order is unspecified.
pub(crate) async fn scan(root: &Path, pattern: NamePattern) -> Result<Vec<String>, StorageError> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || matching_names(&root, &pattern))
        .await
        .map_err(std::io::Error::other)
        .context("Scan task panicked")
}

fn matching_names(root: &Path, pattern: &NamePattern) -> Vec<String> {
    let names: Vec<String> = leaf_entries(root)
        .filter_map(|path| item_name(&path))
        .filter(|name| pattern.is_match(name))
        .collect();

    debug!(pattern = pattern.as_str(), matches = names.len(), "Scan finished");
    names
}

fn item_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = name_from_leaf(file_name)?;
    validate_name(name).ok()?;
    Some(name.to_owned())
}
