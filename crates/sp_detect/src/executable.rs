use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sp_core::Platform;

/// What a server executable runs: the game version
/// and the loader (which is the game itself for vanilla).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableInfo {
    pub path: PathBuf,
    /// Raw version token, eg. `1.20.4` or `23w13a`.
    pub game_version: String,
    pub loader_platform: Platform,
    /// Raw version token of the loader.
    pub loader_version: String,
}

impl ExecutableInfo {
    /// The result when no detector (or more than one) matched.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            path: PathBuf::new(),
            game_version: String::new(),
            loader_platform: Platform::Unknown,
            loader_version: String::new(),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.loader_platform == Platform::Unknown
    }
}
