//! ``src/fs/enumerator.rs``
//!
//! # `BackingStore`: Live Directory Enumeration
//!
//! Lists the files of one fixed directory. Every call goes back to the
//! filesystem; results come back in the order `read_dir` yields them and
//! are not sorted. Two calls are only consistent with each other if nothing
//! touched the directory in between.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::fs::{self, DirEntry, ReadDir};
use tracing::{debug, info, warn};

use crate::config::SeedConfig;
use crate::error::{PageError, PageOutcome};
use crate::fs::entry::Entry;

#[derive(Debug, Clone)]
pub struct BackingStore {
    root: PathBuf,
    show_hidden: bool,
}

impl BackingStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            show_hidden: false,
        }
    }

    /// Include entries whose name starts with `.`.
    #[must_use]
    pub const fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the directory and returns its entries in filesystem order.
    ///
    /// Failing to open or iterate the directory fails the whole call. An
    /// entry that disappears before it can be stat'ed is skipped, as is a
    /// dangling symlink. Symlinks are followed, as in [`Entry::from_path`].
    pub async fn enumerate(&self) -> PageOutcome<Vec<Entry>> {
        let start_time = Instant::now();

        let mut read_dir = self.open().await?;
        let mut entries: Vec<Entry> = Vec::new();

        while let Some(dir_entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| PageError::backing_store(&self.root, e))?
        {
            if self.should_skip(&dir_entry) {
                continue;
            }

            let entry_path = dir_entry.path();
            match fs::metadata(&entry_path).await {
                Ok(meta) => entries.push(Entry::from_metadata(&entry_path, &meta)),

                Err(e) => {
                    warn!("Failed to stat {:?}, skipping: {}", entry_path, e);
                }
            }
        }

        let duration: Duration = start_time.elapsed();
        debug!(
            marker = "ENUMERATE_COMPLETE",
            operation_type = "enumerate",
            count = entries.len(),
            duration_us = duration.as_micros() as u64,
            "Enumerated {} in {:?}",
            self.root.display(),
            duration
        );

        Ok(entries)
    }

    /// Populates an empty store with demo files.
    ///
    /// Creates the root if needed. A store that already has an entry
    /// `enumerate` would list is left untouched, so repeated calls write nothing. Returns the number
    /// of files written.
    pub async fn ensure_seeded(&self, seed: &SeedConfig) -> PageOutcome<usize> {
        if !seed.enabled {
            return Ok(0);
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PageError::backing_store(&self.root, e))?;

        if self.has_visible_entry().await? {
            debug!("Backing store {} already populated", self.root.display());
            return Ok(0);
        }

        for index in 0..seed.count {
            let path = self.root.join(seed_file_name(seed, index));
            fs::write(&path, seed_contents(index))
                .await
                .map_err(|e| PageError::backing_store(&path, e))?;
        }

        info!(
            marker = "STORE_SEEDED",
            operation_type = "ensure_seeded",
            count = seed.count,
            "Seeded {} with {} files",
            self.root.display(),
            seed.count
        );

        Ok(seed.count)
    }

    // Emptiness as `enumerate` would see it: skipped entries don't count.
    async fn has_visible_entry(&self) -> PageOutcome<bool> {
        let mut read_dir = self.open().await?;

        while let Some(dir_entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| PageError::backing_store(&self.root, e))?
        {
            if !self.should_skip(&dir_entry) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn open(&self) -> PageOutcome<ReadDir> {
        fs::read_dir(&self.root)
            .await
            .map_err(|e| PageError::backing_store(&self.root, e))
    }

    fn should_skip(&self, entry: &DirEntry) -> bool {
        if self.show_hidden {
            return false;
        }

        entry
            .path()
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with('.'))
    }
}

fn seed_file_name(seed: &SeedConfig, index: usize) -> String {
    if seed.extension.is_empty() {
        format!("{}{index:03}", seed.prefix)
    } else {
        format!("{}{index:03}.{}", seed.prefix, seed.extension)
    }
}

// Sizes grow with the index so listings show distinct values.
fn seed_contents(index: usize) -> String {
    format!("seed file {index}\n").repeat(index + 1)
}
