//! `src/fs/entry.rs`
//! ============================================================
//! One file in the backing store, as reported by a query.
//!
//! Entries are rebuilt from disk on every enumeration. Nothing is cached and
//! two entries are the same file when their paths are equal. Symlinks are
//! always followed: a link is listed under its own name and path with the
//! size and kind of its target.

use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;

use crate::error::PageOutcome;
use crate::fs::digest::sha256_file;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Final path component, lossily decoded
    pub display_name: CompactString,

    pub absolute_path: PathBuf,

    /// Byte length (0 for directories)
    pub size: u64,

    pub is_dir: bool,
}

impl Entry {
    /// Builds an entry from already-fetched metadata.
    #[must_use]
    pub fn from_metadata(path: &Path, meta: &Metadata) -> Self {
        let display_name = CompactString::new(
            path.file_name()
                .map(OsStr::to_string_lossy)
                .unwrap_or_default(),
        );

        let is_dir = meta.is_dir();

        Self {
            display_name,
            absolute_path: path.to_path_buf(),
            size: if is_dir { 0 } else { meta.len() },
            is_dir,
        }
    }

    /// Stats `path` and builds an entry for it. Symlinks are followed.
    pub async fn from_path(path: &Path) -> PageOutcome<Self> {
        let meta = tokio_fs::metadata(path).await?;
        Ok(Self::from_metadata(path, &meta))
    }

    #[inline]
    #[must_use]
    pub fn human_size(&self) -> String {
        ByteSize::b(self.size).to_string()
    }

    /// Lowercase hex SHA-256 of the file contents.
    pub async fn sha256(&self) -> PageOutcome<String> {
        sha256_file(&self.absolute_path).await
    }
}
