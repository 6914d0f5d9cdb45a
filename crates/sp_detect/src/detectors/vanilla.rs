use serde::Deserialize;
use sp_core::Platform;

use super::{from_json, read_identifying_file, ExecutableDetector};
use crate::{Archive, DetectError, ExecutableInfo};

const VERSION_JSON: &str = "version.json";

/// Official server jars (1.14+) carry a `version.json`
/// describing the game version they run.
#[derive(Deserialize)]
struct VersionJson {
    id: String,
}

pub struct Vanilla;

impl ExecutableDetector for Vanilla {
    fn name(&self) -> &'static str {
        "vanilla"
    }

    fn detect(&self, archive: &mut Archive) -> Result<Option<ExecutableInfo>, DetectError> {
        let Some(text) = read_identifying_file(archive, VERSION_JSON)? else {
            return Ok(None);
        };
        let json: VersionJson = from_json(&text, VERSION_JSON)?;

        Ok(Some(ExecutableInfo {
            path: archive.path().to_owned(),
            loader_version: json.id.clone(),
            game_version: json.id,
            loader_platform: Platform::Minecraft,
        }))
    }
}
