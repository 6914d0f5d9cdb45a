use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// What was found in a server directory
/// besides archives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// The directory that was inspected.
    pub root: PathBuf,
    pub mcdr: Option<McdrEnvironment>,
    pub server_properties: Option<ServerProperties>,
}

impl EnvironmentInfo {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_owned(),
            mcdr: None,
            server_properties: None,
        }
    }

    /// Where the Minecraft server itself lives.
    ///
    /// This is the MCDR working directory if the
    /// server is wrapped by MCDR, otherwise the root.
    #[must_use]
    pub fn working_directory(&self) -> PathBuf {
        self.mcdr
            .as_ref()
            .map_or_else(|| self.root.clone(), |n| n.working_directory.clone())
    }

    #[must_use]
    pub fn plugin_directories(&self) -> &[PathBuf] {
        match &self.mcdr {
            Some(mcdr) => &mcdr.plugin_directories,
            None => &[],
        }
    }
}

/// An MCDReforged installation, from its `config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McdrEnvironment {
    pub config_path: PathBuf,
    /// Absolute (joined onto the root if relative).
    pub working_directory: PathBuf,
    /// Absolute (joined onto the root if relative).
    pub plugin_directories: Vec<PathBuf>,
    /// Which server handler MCDR uses, eg. `vanilla_handler`.
    pub handler: Option<String>,
    pub language: Option<String>,
}

/// The `server.properties` of a server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerProperties {
    pub entries: BTreeMap<String, String>,
}

impl ServerProperties {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn level_name(&self) -> Option<&str> {
        self.get("level-name")
    }

    #[must_use]
    pub fn server_port(&self) -> Option<u16> {
        self.get("server-port")?.parse().ok()
    }
}
