//! src/error.rs
//! ============================================================================
//! # `PageError`: Unified Error Type for Paged Listing
//!
//! Every fallible operation in the crate returns `PageOutcome<T>`. Invalid
//! paging arguments and backing-store failures are both terminal for the
//! query that raised them; nothing here is retried.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type PageOutcome<T> = Result<T, PageError>;

#[derive(Debug, Error)]
pub enum PageError {
    /// A query argument was outside its accepted range.
    #[error("Invalid argument: {field} = {value}")]
    InvalidArgument { field: &'static str, value: i64 },

    /// The backing directory could not be read or populated.
    #[error("Backing store unreadable at {path:?}: {source}")]
    BackingStore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config value rejected during validation.
    #[error("Invalid config: {0}")]
    ConfigInvalid(String),

    /// No platform directory could be derived for config or data.
    #[error("Could not determine {0} directory")]
    ConfigDir(&'static str),

    #[error("Not a regular file: {0:?}")]
    NotAFile(PathBuf),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl PageError {
    /// Create an invalid-argument error for a named query argument.
    #[must_use]
    pub const fn invalid_argument(field: &'static str, value: i64) -> Self {
        Self::InvalidArgument { field, value }
    }

    /// Wrap an IO failure against the backing directory.
    pub fn backing_store<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::BackingStore {
            path: path.into(),
            source,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Whether the error came from the filesystem rather than the request.
    #[inline]
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::BackingStore { .. } | Self::Io(_) | Self::NotAFile(_))
    }
}
