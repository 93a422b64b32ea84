//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate. A missing file is
//! replaced by the defaults, which are written back so the user has
//! something to edit.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! let provider = PagingProvider::open(&config).await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs as TokioFs;
use tracing::info;

use crate::error::{PageError, PageOutcome};
use crate::logging::LoggingConfig;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "dirpage";
const APPLICATION: &str = "dirpage";

/// Demo bootstrap for an empty backing directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,

    /// Number of files written into an empty store
    pub count: usize,

    pub prefix: String,

    pub extension: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 25,
            prefix: "file_".to_string(),
            extension: "txt".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory whose contents are paged; `None` uses the platform data dir
    pub backing_dir: Option<PathBuf>,

    /// Entries requested per client fetch
    pub page_size: usize,

    pub show_hidden: bool,

    pub seed: SeedConfig,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backing_dir: None,
            page_size: 10,
            show_hidden: false,
            seed: SeedConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the platform config dir, or creates it with defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/dirpage/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> PageOutcome<Self> {
        let path = Self::config_path()?;

        if TokioFs::try_exists(&path).await? {
            Self::load_from(&path).await
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    /// Reads and validates a config file at an explicit path.
    pub async fn load_from(path: &Path) -> PageOutcome<Self> {
        info!("Loading config from {}", path.display());

        let text = TokioFs::read_to_string(path).await?;
        let cfg: Self = toml::from_str(&text)?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Writes the config as pretty TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> PageOutcome<()> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    pub fn validate(&self) -> PageOutcome<()> {
        if self.page_size == 0 {
            return Err(PageError::ConfigInvalid(
                "page_size must be greater than zero".to_string(),
            ));
        }

        if self.seed.enabled && self.seed.prefix.is_empty() {
            return Err(PageError::ConfigInvalid(
                "seed.prefix must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Backing directory to page over, falling back to `<data dir>/files`.
    pub fn resolved_backing_dir(&self) -> PageOutcome<PathBuf> {
        match &self.backing_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs("data")?.data_dir().join("files")),
        }
    }

    /// Returns the canonical config file path.
    pub fn config_path() -> PageOutcome<PathBuf> {
        Ok(Self::project_dirs("config")?
            .config_dir()
            .join("config.toml"))
    }

    fn project_dirs(kind: &'static str) -> PageOutcome<ProjectDirs> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(PageError::ConfigDir(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_then_load_preserves_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            backing_dir: Some(temp_dir.path().join("store")),
            page_size: 7,
            show_hidden: true,
            ..Config::default()
        };

        config.save_to(&path).await.unwrap();
        let loaded = Config::load_from(&path).await.unwrap();

        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn missing_sections_fall_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        TokioFs::write(&path, "page_size = 3\n").await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();

        assert_eq!(loaded.page_size, 3);
        assert_eq!(loaded.seed, SeedConfig::default());
        assert!(loaded.backing_dir.is_none());
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        TokioFs::write(&path, "page_size = 0\n").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();

        assert!(matches!(err, PageError::ConfigInvalid(_)));
    }

    #[test]
    fn explicit_backing_dir_wins() {
        let config = Config {
            backing_dir: Some(PathBuf::from("/srv/files")),
            ..Config::default()
        };

        assert_eq!(
            config.resolved_backing_dir().unwrap(),
            PathBuf::from("/srv/files")
        );
    }
}
