use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{err, file_utils, IntoIoError, JsonFileError};

/// Stop walking a directory tree after visiting this many files.
pub const DEFAULT_FILE_LIMIT: usize = 50_000;
pub const DEFAULT_JOBS: usize = 64;

/// Global settings for ServerProbe, stored in `config.json`
/// inside the probe directory (see [`file_utils::get_probe_dir`]).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProbeConfig {
    /// How many files a recursive archive search may visit
    /// before it gives up on descending further.
    #[serde(default = "default_file_limit")]
    pub file_limit: usize,
    /// File extensions (lowercase, no dot) treated as archives.
    #[serde(default = "default_extensions")]
    pub archive_extensions: Vec<String>,
    /// Directories (relative to the server's working directory)
    /// holding mod archives.
    #[serde(default = "default_mod_dirs")]
    pub mod_directories: Vec<String>,
    /// Limit on concurrently running detection jobs.
    /// `None` or `0` means unbounded.
    #[serde(default = "default_jobs")]
    pub max_concurrent_jobs: Option<usize>,
}

fn default_file_limit() -> usize {
    DEFAULT_FILE_LIMIT
}

fn default_extensions() -> Vec<String> {
    ["jar", "zip", "mcdr", "pyz"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_mod_dirs() -> Vec<String> {
    vec!["mods".to_owned()]
}

#[allow(clippy::unnecessary_wraps)]
fn default_jobs() -> Option<usize> {
    Some(DEFAULT_JOBS)
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            file_limit: default_file_limit(),
            archive_extensions: default_extensions(),
            mod_directories: default_mod_dirs(),
            max_concurrent_jobs: default_jobs(),
        }
    }
}

impl ProbeConfig {
    /// Loads the config from the probe directory,
    /// creating it with defaults if it doesn't exist.
    ///
    /// A corrupt config is replaced by the defaults (in memory only).
    pub async fn load() -> Result<Self, JsonFileError> {
        let config_path = file_utils::get_probe_dir()?.join("config.json");
        Self::load_from(&config_path).await
    }

    pub async fn load_from(config_path: &Path) -> Result<Self, JsonFileError> {
        if !config_path.exists() {
            let config = ProbeConfig::default();
            config.save_to(config_path).await?;
            return Ok(config);
        }

        let config = tokio::fs::read_to_string(config_path)
            .await
            .path(config_path)?;
        Ok(match serde_json::from_str(&config) {
            Ok(config) => config,
            Err(error) => {
                err!("Invalid probe config at {config_path:?}, using defaults! Error: {error}");
                ProbeConfig::default()
            }
        })
    }

    pub async fn save(&self) -> Result<(), JsonFileError> {
        let config_path = file_utils::get_probe_dir()?.join("config.json");
        self.save_to(&config_path).await
    }

    pub async fn save_to(&self, config_path: &Path) -> Result<(), JsonFileError> {
        let config = serde_json::to_string_pretty(self)?;
        tokio::fs::write(config_path, config.as_bytes())
            .await
            .path(config_path)?;
        Ok(())
    }

    /// Whether a path has one of the configured archive extensions.
    #[must_use]
    pub fn is_archive(&self, path: &Path) -> bool {
        file_utils::extension_lowercase(path)
            .is_some_and(|ext| self.archive_extensions.iter().any(|n| *n == ext))
    }

    #[must_use]
    pub fn job_limit(&self) -> Option<usize> {
        self.max_concurrent_jobs.filter(|n| *n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = ProbeConfig::load_from(&path).await.unwrap();
        assert_eq!(config, ProbeConfig::default());
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn corrupt_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = ProbeConfig::load_from(&path).await.unwrap();
        assert_eq!(config.file_limit, DEFAULT_FILE_LIMIT);
    }

    #[tokio::test]
    async fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"file_limit": 10, "max_concurrent_jobs": null}"#,
        )
        .unwrap();

        let config = ProbeConfig::load_from(&path).await.unwrap();
        assert_eq!(config.file_limit, 10);
        assert_eq!(config.job_limit(), None);
        assert!(config.is_archive(Path::new("x/fabric-api.JAR")));
        assert!(!config.is_archive(Path::new("x/server.properties")));
    }
}
