//! Name-to-path sharding.
//!
//! An item named `test_file_1` with imbrication level 3 lands at
//! `<root>/te/st/_f/test_file_1.storage`: the name is consumed in two-character
//! chunks, one directory per chunk, until the level is reached or the name runs out.
//! A trailing odd character never becomes a directory.

use crate::error::StorageError;
use crate::name::ItemName;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Suffix of every leaf file. Part of the on-disk format: changing it orphans existing items.
pub const ITEM_EXTENSION: &str = ".storage";

/// Characters of the name consumed per directory level.
pub const CHUNK_SIZE: usize = 2;

/// Where an item lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Chunk directories, outermost first.
    pub segments: Vec<String>,
    /// `<name>.storage`
    pub leaf: String,
    /// `root/segments.../leaf`
    pub path: PathBuf,
}

impl ResolvedPath {
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// Deterministic mapping from item names to leaf paths under one root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    imbrication_level: NonZeroUsize,
}

impl Layout {
    /// # Errors
    /// Returns [`StorageError::InvalidConfiguration`] when `imbrication_level` is zero.
    pub fn new(root: impl Into<PathBuf>, imbrication_level: usize) -> Result<Self, StorageError> {
        let imbrication_level = NonZeroUsize::new(imbrication_level).ok_or_else(|| {
            StorageError::InvalidConfiguration {
                message: "imbrication level must be greater than zero".into(),
                context: None,
            }
        })?;

        Ok(Self { root: root.into(), imbrication_level })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn imbrication_level(&self) -> usize {
        self.imbrication_level.get()
    }

    #[must_use]
    pub fn resolve(&self, name: &ItemName) -> ResolvedPath {
        let segments = chunk_segments(name.as_str(), self.imbrication_level.get());
        let leaf = leaf_name(name.as_str());

        let mut path = self.root.clone();
        path.extend(&segments);
        path.push(&leaf);

        ResolvedPath { segments, leaf, path }
    }
}

/// Splits `name` into at most `max_levels` full chunks.
fn chunk_segments(name: &str, max_levels: usize) -> Vec<String> {
    // Names are ASCII after validation; `chunks_exact` drops the odd tail.
    name.as_bytes()
        .chunks_exact(CHUNK_SIZE)
        .take(max_levels)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

#[must_use]
pub(crate) fn leaf_name(name: &str) -> String {
    format!("{name}{ITEM_EXTENSION}")
}

/// Recovers the logical name from a leaf file name, if it carries the marker extension.
#[must_use]
pub(crate) fn name_from_leaf(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(ITEM_EXTENSION).filter(|stem| !stem.is_empty())
}
