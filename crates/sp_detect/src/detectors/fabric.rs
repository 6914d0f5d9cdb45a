use std::collections::BTreeMap;

use serde::Deserialize;
use sp_core::{pt, Platform};
use sp_versions::{
    parse_range, ConstraintExpression, Dependency, Grammar, Package, PackageId,
    PackageInformation, Scheme,
};

use super::{
    from_json, read_identifying_file, ExecutableDetector, OneOrMany, PackageDetector,
};
use crate::{
    text::{manifest_attribute, manifest_lines, maven_path_version, parse_properties},
    Archive, DetectError, ExecutableInfo,
};

const INSTALL_PROPERTIES: &str = "install.properties";
const LAUNCH_PROPERTIES: &str = "fabric-server-launch.properties";
const MANIFEST: &str = "META-INF/MANIFEST.MF";
const FABRIC_MOD_JSON: &str = "fabric.mod.json";

const KNOT_SERVER_MARKERS: &[&str] = &[
    "launch.mainClass=net.fabricmc.loader.impl.launch.knot.KnotServer",
    // Loader versions before 0.12
    "launch.mainClass=net.fabricmc.loader.launch.knot.KnotServer",
];

/// The single-file server launcher from `meta.fabricmc.net`,
/// which downloads everything on first start.
pub struct FabricSingleFile;

impl ExecutableDetector for FabricSingleFile {
    fn name(&self) -> &'static str {
        "fabric single-file"
    }

    fn detect(&self, archive: &mut Archive) -> Result<Option<ExecutableInfo>, DetectError> {
        let Some(text) = read_identifying_file(archive, INSTALL_PROPERTIES)? else {
            return Ok(None);
        };
        let mut properties = parse_properties(&text);
        let Some(loader_version) = properties.remove("fabric-loader-version") else {
            pt!(
                "{INSTALL_PROPERTIES} without fabric-loader-version in {:?}",
                archive.path()
            );
            return Ok(None);
        };

        Ok(Some(ExecutableInfo {
            path: archive.path().to_owned(),
            game_version: properties.remove("game-version").unwrap_or_default(),
            loader_platform: Platform::Fabric,
            loader_version,
        }))
    }
}

/// `fabric-server-launch.jar` made by the Fabric installer.
/// Its manifest `Class-Path` points at the loader and
/// intermediary libraries, which name their versions.
pub struct FabricLauncher;

impl ExecutableDetector for FabricLauncher {
    fn name(&self) -> &'static str {
        "fabric launcher"
    }

    fn detect(&self, archive: &mut Archive) -> Result<Option<ExecutableInfo>, DetectError> {
        let Some(text) = read_identifying_file(archive, LAUNCH_PROPERTIES)? else {
            return Ok(None);
        };
        if !text
            .lines()
            .any(|line| KNOT_SERVER_MARKERS.contains(&line.trim()))
        {
            return Ok(None);
        }

        let Some(manifest) = archive.read_named(MANIFEST)? else {
            pt!("Fabric launcher {:?} has no manifest", archive.path());
            return Ok(None);
        };
        let lines = manifest_lines(&manifest);
        let class_path = manifest_attribute(&lines, "Class-Path").unwrap_or_default();

        let mut loader_version = None;
        let mut game_version = None;
        for token in class_path.split_whitespace() {
            loader_version = loader_version.or(maven_path_version(token, "fabric-loader"));
            game_version = game_version.or(maven_path_version(token, "intermediary"));
        }

        let Some(loader_version) = loader_version else {
            pt!("Fabric launcher {:?} doesn't reference fabric-loader", archive.path());
            return Ok(None);
        };

        Ok(Some(ExecutableInfo {
            path: archive.path().to_owned(),
            game_version: game_version.unwrap_or_default().to_owned(),
            loader_platform: Platform::Fabric,
            loader_version: loader_version.to_owned(),
        }))
    }
}

#[derive(Deserialize)]
struct FabricModJson {
    id: String,
    version: String,
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    authors: Vec<Person>,
    license: Option<OneOrMany>,
    #[serde(default)]
    contact: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    depends: BTreeMap<String, OneOrMany>,
    #[serde(default)]
    recommends: BTreeMap<String, OneOrMany>,
    #[serde(default)]
    suggests: BTreeMap<String, OneOrMany>,
    #[serde(default)]
    breaks: BTreeMap<String, OneOrMany>,
    #[serde(default)]
    conflicts: BTreeMap<String, OneOrMany>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Person {
    Name(String),
    Detailed { name: String },
}

/// A Fabric mod, described by `fabric.mod.json`.
pub struct FabricMod;

impl PackageDetector for FabricMod {
    fn name(&self) -> &'static str {
        "fabric mod"
    }

    fn detect(&self, archive: &mut Archive) -> Result<Vec<Package>, DetectError> {
        let Some(text) = read_identifying_file(archive, FABRIC_MOD_JSON)? else {
            return Ok(Vec::new());
        };
        let json: FabricModJson = from_json(&text, FABRIC_MOD_JSON)?;

        let mut dependencies = Vec::new();
        // (declarations, mandatory, inverted)
        let kinds = [
            (&json.depends, true, false),
            (&json.recommends, false, false),
            (&json.suggests, false, false),
            (&json.breaks, false, true),
            (&json.conflicts, false, true),
        ];
        for (declarations, mandatory, inverted) in kinds {
            for (id, ranges) in declarations {
                dependencies.push(dependency(id, ranges.clone(), mandatory, inverted));
            }
        }

        let information = PackageInformation {
            title: json.name.unwrap_or_else(|| json.id.clone()),
            description: json.description.unwrap_or_default(),
            authors: json
                .authors
                .into_iter()
                .map(|n| match n {
                    Person::Name(name) | Person::Detailed { name } => name,
                })
                .collect(),
            urls: json
                .contact
                .into_values()
                .filter_map(|n| n.as_str().map(str::to_owned))
                .collect(),
            license: json.license.map(|n| n.into_vec().join(", ")),
        };

        Ok(vec![Package {
            id: PackageId::new(Platform::Fabric, &json.id, &json.version),
            dependencies,
            information,
        }])
    }
}

/// Several range strings for one dependency are alternatives.
fn dependency(id: &str, ranges: OneOrMany, mandatory: bool, inverted: bool) -> Dependency {
    let platform = Platform::of_dependency(id, Platform::Fabric);

    let mut alternatives = ConstraintExpression::default();
    for range in ranges.into_vec() {
        let scheme = Scheme::for_dependency(platform, &range);
        let Some(expr) = parse_range(&range, Grammar::Fabric, scheme) else {
            // One unconstrained alternative makes the whole thing unconstrained
            alternatives = ConstraintExpression::default();
            break;
        };
        alternatives.extend_alternatives(expr);
    }
    let constraint = (!alternatives.is_unconstrained()).then(|| {
        if inverted {
            alternatives.negated()
        } else {
            alternatives
        }
    });

    Dependency {
        id: PackageId::target(platform, id),
        constraint,
        mandatory,
    }
}
