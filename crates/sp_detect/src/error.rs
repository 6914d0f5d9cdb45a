use std::path::PathBuf;

use sp_core::IoError;
use thiserror::Error;

const ARCHIVE_ERR_PREFIX: &str = "while reading archive:\n";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{ARCHIVE_ERR_PREFIX}{0}")]
    Io(#[from] IoError),
    #[error("{ARCHIVE_ERR_PREFIX}malformed zip {path:?}:\n{error}")]
    Zip {
        error: zip::result::ZipError,
        path: PathBuf,
    },
    #[error("{ARCHIVE_ERR_PREFIX}while reading entry {name} of {path:?}:\n{error}")]
    Entry {
        error: std::io::Error,
        name: String,
        path: PathBuf,
    },
}

const DETECT_ERR_PREFIX: &str = "while detecting server contents:\n";

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("{DETECT_ERR_PREFIX}{0}")]
    Archive(#[from] ArchiveError),
    #[error("{DETECT_ERR_PREFIX}{0}")]
    Io(#[from] IoError),
    #[error("{DETECT_ERR_PREFIX}invalid json in {file}:\n{error}")]
    Json {
        error: serde_json::Error,
        file: String,
    },
    #[error("{DETECT_ERR_PREFIX}invalid toml in {file}:\n{error}")]
    Toml { error: toml::de::Error, file: String },
    #[error("{DETECT_ERR_PREFIX}invalid yaml in {file}:\n{error}")]
    Yaml {
        error: serde_yaml_ng::Error,
        file: String,
    },
}
