use std::path::{Path, PathBuf};

use crate::{IntoIoError, IoError};

const PROBE_DIR_NAME: &str = "ServerProbe";

/// Returns the path to the ServerProbe root folder
/// (holding `config.json` and `logs/`).
///
/// This uses the current dir or executable location (portable mode)
/// if a `spdir.txt` is found, otherwise it uses the system config dir:
/// - `~/.config` on Linux
/// - `~/AppData/Roaming` on Windows
/// - `~/Library/Application Support` on macOS
///
/// # Errors
/// - if config dir is not found
/// - if the directory could not be created (permissions issue)
#[allow(clippy::doc_markdown)]
pub fn get_probe_dir() -> Result<PathBuf, IoError> {
    let probe_directory = if let Some(n) = check_spdir_file() {
        n
    } else {
        dirs::config_dir()
            .ok_or(IoError::ConfigDirNotFound)?
            .join(PROBE_DIR_NAME)
    };

    std::fs::create_dir_all(&probe_directory).path(&probe_directory)?;
    Ok(probe_directory)
}

fn first_line(input: &str) -> String {
    input
        .trim()
        .lines()
        .next()
        .map(|n| n.trim().to_owned())
        .unwrap_or_default()
}

fn check_spdir_file() -> Option<PathBuf> {
    const PORTABLE_FILENAME: &str = "spdir.txt";

    let places = [
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_owned)),
        std::env::current_dir().ok(),
    ];

    for place in places.into_iter().flatten() {
        let spdir_path = place.join(PORTABLE_FILENAME);
        let Ok(contents) = std::fs::read_to_string(&spdir_path) else {
            continue;
        };
        return Some(resolve_spdir_line(
            &first_line(&contents),
            place,
            dirs::home_dir(),
        ));
    }

    None
}

/// `.` (or nothing) means the marker's own location,
/// anything else is a parent for the `ServerProbe` folder.
fn resolve_spdir_line(path: &str, place: PathBuf, home: Option<PathBuf>) -> PathBuf {
    if let (Some(stripped), Some(home)) = (path.strip_prefix('~'), home) {
        home.join(stripped.trim_start_matches(['/', '\\']))
            .join(PROBE_DIR_NAME)
    } else if path == "." || path.is_empty() {
        place
    } else {
        PathBuf::from(path).join(PROBE_DIR_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct DirItem {
    pub name: String,
    pub path: PathBuf,
    pub is_file: bool,
    pub is_dir: bool,
    /// The entry itself is a symlink (to either).
    pub is_symlink: bool,
}

/// Reads all the entries from a directory into a `Vec<DirItem>`.
/// This includes both files and folders.
///
/// Symlinks are followed when deciding `is_file`/`is_dir`.
///
/// # Errors
/// - `dir` doesn't exist
/// - User doesn't have access to `dir`
///
/// Additionally, this skips any file/folder names
/// that has broken encoding (not UTF-8 or ASCII).
pub async fn read_dir_items<P: AsRef<Path>>(dir: P) -> Result<Vec<DirItem>, IoError> {
    let dir: &Path = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir).await.dir(dir)?;
    let mut items = Vec::new();

    while let Some(entry) = entries.next_entry().await.dir(dir)? {
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let path = entry.path();
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|n| n.is_symlink());
        let Ok(metadata) = tokio::fs::metadata(&path).await else {
            // Broken symlink
            continue;
        };
        items.push(DirItem {
            name,
            is_file: metadata.is_file(),
            is_dir: metadata.is_dir(),
            is_symlink,
            path,
        });
    }

    Ok(items)
}

/// Returns the lowercase extension of a path, if any.
#[must_use]
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|n| n.to_str())
        .map(str::to_lowercase)
}
