//! The three detector families and their implementations.
//!
//! Every detector inspects one thing (an archive, or a directory
//! for environment detectors) and either produces a record or
//! reports no match. Detectors hold no state.

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize};
use sp_versions::Package;

use crate::{Archive, DetectError, EnvironmentInfo, ExecutableInfo};

mod fabric;
mod forge;
mod mcdr;
mod server_properties;
mod vanilla;

pub use fabric::{FabricLauncher, FabricMod, FabricSingleFile};
pub use forge::{ForgeMods, ForgeServer};
pub use mcdr::{McdrEnvironmentDetector, McdrPlugin};
pub use server_properties::ServerPropertiesDetector;
pub use vanilla::Vanilla;

/// Identifies the server's runnable archive.
pub trait ExecutableDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` if the archive isn't of this kind,
    /// or declares itself more than once.
    fn detect(&self, archive: &mut Archive) -> Result<Option<ExecutableInfo>, DetectError>;
}

/// Identifies the mods/plugins declared in an archive.
pub trait PackageDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// An empty list if the archive isn't of this kind.
    fn detect(&self, archive: &mut Archive) -> Result<Vec<Package>, DetectError>;
}

/// Looks for marker files in a server directory.
pub trait EnvironmentDetector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Adds findings to `env`, returning whether anything was found.
    ///
    /// Detectors run in registration order, so later ones
    /// may use what earlier ones found (e.g. the MCDR working directory).
    fn detect(&self, dir: &Path, env: &mut EnvironmentInfo) -> Result<bool, DetectError>;
}

/// Reads the single entry `name`, or `None` if it's missing.
///
/// If the archive has the entry more than once,
/// it's ambiguous and also treated as missing.
fn read_identifying_file(
    archive: &mut Archive,
    name: &str,
) -> Result<Option<String>, DetectError> {
    let mut found = None;
    for index in archive.indices_of(name) {
        if found.is_some() {
            sp_core::pt!("{:?} declares {name} more than once, ignoring", archive.path());
            return Ok(None);
        }
        found = Some(archive.read_string(index)?);
    }
    Ok(found)
}

fn from_json<T: DeserializeOwned>(text: &str, file: &str) -> Result<T, DetectError> {
    serde_json::from_str(text).map_err(|error| DetectError::Json {
        error,
        file: file.to_owned(),
    })
}

fn from_toml<T: DeserializeOwned>(text: &str, file: &str) -> Result<T, DetectError> {
    toml::from_str(text).map_err(|error| DetectError::Toml {
        error,
        file: file.to_owned(),
    })
}

fn from_yaml<T: DeserializeOwned>(text: &str, file: &str) -> Result<T, DetectError> {
    serde_yaml_ng::from_str(text).map_err(|error| DetectError::Yaml {
        error,
        file: file.to_owned(),
    })
}

/// Metadata fields that may be a single string or a list.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(n) => vec![n],
            OneOrMany::Many(n) => n,
        }
    }
}
