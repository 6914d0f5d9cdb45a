use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use sp_core::{pt, IntoIoError, Platform};
use sp_versions::{
    parse_range, Dependency, Grammar, Package, PackageId, PackageInformation, Scheme,
};

use super::{
    from_json, from_yaml, read_identifying_file, EnvironmentDetector, OneOrMany, PackageDetector,
};
use crate::{Archive, DetectError, EnvironmentInfo, McdrEnvironment};

const PLUGIN_JSON: &str = "mcdreforged.plugin.json";
const CONFIG_YML: &str = "config.yml";
const DEFAULT_WORKING_DIRECTORY: &str = "server";
const DEFAULT_LANGUAGE: &str = "en_us";

/// Either a plain string or a map of
/// language codes to translations.
#[derive(Deserialize)]
#[serde(untagged)]
enum Translatable {
    Plain(String),
    Translated(BTreeMap<String, String>),
}

impl Translatable {
    fn into_string(self) -> String {
        match self {
            Translatable::Plain(n) => n,
            Translatable::Translated(mut map) => map
                .remove(DEFAULT_LANGUAGE)
                .or_else(|| map.into_values().next())
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct PluginJson {
    id: String,
    version: String,
    name: Option<Translatable>,
    description: Option<Translatable>,
    author: Option<OneOrMany>,
    link: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// MCDReforged plugins, packed as `.mcdr`/`.pyz`
/// (or `.zip`) with a `mcdreforged.plugin.json`.
pub struct McdrPlugin;

impl PackageDetector for McdrPlugin {
    fn name(&self) -> &'static str {
        "mcdr plugin"
    }

    fn detect(&self, archive: &mut Archive) -> Result<Vec<Package>, DetectError> {
        let Some(text) = read_identifying_file(archive, PLUGIN_JSON)? else {
            return Ok(Vec::new());
        };
        let json: PluginJson = from_json(&text, PLUGIN_JSON)?;

        let dependencies = json
            .dependencies
            .into_iter()
            .map(|(id, range)| {
                let platform = Platform::of_dependency(&id, Platform::Mcdr);
                Dependency {
                    id: PackageId::target(platform, &id),
                    constraint: parse_range(
                        &range,
                        Grammar::Npm,
                        Scheme::for_dependency(platform, &range),
                    ),
                    mandatory: true,
                }
            })
            .collect();

        Ok(vec![Package {
            id: PackageId::new(Platform::Mcdr, &json.id, &json.version),
            dependencies,
            information: PackageInformation {
                title: json
                    .name
                    .map_or_else(|| json.id.clone(), Translatable::into_string),
                description: json
                    .description
                    .map(Translatable::into_string)
                    .unwrap_or_default(),
                authors: json.author.map(OneOrMany::into_vec).unwrap_or_default(),
                urls: json.link.into_iter().collect(),
                license: None,
            },
        }])
    }
}

#[derive(Deserialize)]
struct McdrConfig {
    working_directory: Option<String>,
    plugin_directories: Option<Vec<String>>,
    handler: Option<String>,
    language: Option<String>,
}

impl McdrConfig {
    /// Plenty of programs have a `config.yml`.
    /// MCDR's always has at least one of these.
    fn looks_like_mcdr(&self) -> bool {
        self.working_directory.is_some()
            || self.plugin_directories.is_some()
            || self.handler.is_some()
    }
}

/// An MCDReforged installation: `config.yml` in
/// the server root, pointing at the actual server
/// (`working_directory`) and the plugin folders.
pub struct McdrEnvironmentDetector;

impl EnvironmentDetector for McdrEnvironmentDetector {
    fn name(&self) -> &'static str {
        "mcdr environment"
    }

    fn detect(&self, dir: &Path, env: &mut EnvironmentInfo) -> Result<bool, DetectError> {
        let config_path = dir.join(CONFIG_YML);
        if !config_path.is_file() {
            return Ok(false);
        }
        let text = std::fs::read_to_string(&config_path).path(&config_path)?;
        // An empty YAML document is `null`, not a mapping
        let Ok(config) = from_yaml::<Option<McdrConfig>>(&text, CONFIG_YML) else {
            pt!("{config_path:?} isn't an MCDR config, skipping");
            return Ok(false);
        };
        let Some(config) = config.filter(McdrConfig::looks_like_mcdr) else {
            return Ok(false);
        };

        let resolve = |n: &str| -> PathBuf { dir.join(n) };
        env.mcdr = Some(McdrEnvironment {
            working_directory: resolve(
                config
                    .working_directory
                    .as_deref()
                    .unwrap_or(DEFAULT_WORKING_DIRECTORY),
            ),
            plugin_directories: config
                .plugin_directories
                .unwrap_or_default()
                .iter()
                .map(|n| resolve(n))
                .collect(),
            handler: config.handler,
            language: config.language,
            config_path,
        });
        Ok(true)
    }
}
