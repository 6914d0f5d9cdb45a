use std::collections::BTreeMap;

use serde::Deserialize;
use sp_core::{pt, Platform};
use sp_versions::{
    parse_range, Dependency, Grammar, Package, PackageId, PackageInformation, Scheme,
};

use super::{from_toml, read_identifying_file, ExecutableDetector, PackageDetector};
use crate::{
    text::{manifest_attribute, manifest_lines, value_after_marker},
    Archive, DetectError, ExecutableInfo,
};

const MANIFEST: &str = "META-INF/MANIFEST.MF";
const JAR_VERSION_PLACEHOLDER: &str = "${file.jarVersion}";

/// A Forge or NeoForge server jar.
///
/// Their manifests have one section per bundled component. The
/// loader's section names it in `Implementation-Title`, followed by
/// `Implementation-Version`. The game's section starts with
/// `Specification-Title: Minecraft`, with the version two lines later.
pub struct ForgeServer;

impl ExecutableDetector for ForgeServer {
    fn name(&self) -> &'static str {
        "forge"
    }

    fn detect(&self, archive: &mut Archive) -> Result<Option<ExecutableInfo>, DetectError> {
        let Some(text) = read_identifying_file(archive, MANIFEST)? else {
            return Ok(None);
        };
        let lines = manifest_lines(&text);

        let mut found = None;
        for (title, platform) in [
            ("Forge", Platform::Forge),
            ("NeoForge", Platform::Neoforge),
        ] {
            let Some(version) = value_after_marker(
                &lines,
                ("Implementation-Title", title),
                1,
                "Implementation-Version",
            ) else {
                continue;
            };
            if found.is_some() {
                pt!("{:?} claims to be both Forge and NeoForge", archive.path());
                return Ok(None);
            }
            found = Some((platform, version));
        }
        let Some((loader_platform, loader_version)) = found else {
            return Ok(None);
        };

        let game_version = value_after_marker(
            &lines,
            ("Specification-Title", "Minecraft"),
            2,
            "Specification-Version",
        )
        .unwrap_or_default();

        Ok(Some(ExecutableInfo {
            path: archive.path().to_owned(),
            game_version: game_version.to_owned(),
            loader_platform,
            loader_version: loader_version.to_owned(),
        }))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModsToml {
    license: Option<String>,
    #[serde(rename = "issueTrackerURL")]
    issue_tracker_url: Option<String>,
    #[serde(default)]
    mods: Vec<ModEntry>,
    #[serde(default)]
    dependencies: BTreeMap<String, Vec<DependencyEntry>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModEntry {
    mod_id: String,
    version: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    authors: Option<String>,
    #[serde(rename = "displayURL")]
    display_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyEntry {
    mod_id: String,
    /// Older descriptors.
    mandatory: Option<bool>,
    /// Newer descriptors: `required`, `optional`,
    /// `incompatible` or `discouraged`.
    #[serde(rename = "type")]
    kind: Option<String>,
    version_range: Option<String>,
}

/// Mods described by a Forge-style TOML descriptor.
///
/// One descriptor may declare several mods.
pub struct ForgeMods {
    file: &'static str,
    platform: Platform,
}

impl ForgeMods {
    /// `META-INF/mods.toml`
    #[must_use]
    pub fn forge() -> Self {
        Self {
            file: "META-INF/mods.toml",
            platform: Platform::Forge,
        }
    }

    /// `META-INF/neoforge.mods.toml`
    #[must_use]
    pub fn neoforge() -> Self {
        Self {
            file: "META-INF/neoforge.mods.toml",
            platform: Platform::Neoforge,
        }
    }

    /// Reads `Implementation-Version` from the manifest,
    /// which is what `${file.jarVersion}` stands for.
    fn jar_version(archive: &mut Archive) -> Result<Option<String>, DetectError> {
        let Some(manifest) = archive.read_named(MANIFEST)? else {
            return Ok(None);
        };
        let lines = manifest_lines(&manifest);
        Ok(manifest_attribute(&lines, "Implementation-Version").map(str::to_owned))
    }

    fn dependency(&self, entry: DependencyEntry) -> Dependency {
        let platform = Platform::of_dependency(&entry.mod_id, self.platform);
        let range = entry.version_range.unwrap_or_default();
        let constraint =
            parse_range(&range, Grammar::Maven, Scheme::for_dependency(platform, &range));

        let kind = entry.kind.as_deref().map(str::to_lowercase);
        let (mandatory, inverted) = match kind.as_deref() {
            Some("required") => (true, false),
            Some("optional") => (false, false),
            Some("incompatible" | "discouraged") => (false, true),
            _ => (entry.mandatory.unwrap_or(true), false),
        };

        Dependency {
            id: PackageId::target(platform, &entry.mod_id),
            constraint: if inverted {
                constraint.map(|n| n.negated())
            } else {
                constraint
            },
            mandatory,
        }
    }
}

impl PackageDetector for ForgeMods {
    fn name(&self) -> &'static str {
        self.file
    }

    fn detect(&self, archive: &mut Archive) -> Result<Vec<Package>, DetectError> {
        let Some(text) = read_identifying_file(archive, self.file)? else {
            return Ok(Vec::new());
        };
        let mut toml: ModsToml = from_toml(&text, self.file)?;

        let mut jar_version = None;
        let mut packages = Vec::new();
        for entry in toml.mods {
            let mut version = entry.version.unwrap_or_default();
            if version.contains(JAR_VERSION_PLACEHOLDER) {
                if jar_version.is_none() {
                    jar_version = Some(Self::jar_version(archive)?);
                }
                match jar_version.as_ref().and_then(Option::as_ref) {
                    Some(jar_version) => {
                        version = version.replace(JAR_VERSION_PLACEHOLDER, jar_version);
                    }
                    None => pt!(
                        "{:?}: {} uses {JAR_VERSION_PLACEHOLDER} but the manifest has no version",
                        archive.path(),
                        entry.mod_id
                    ),
                }
            }

            let dependencies = toml
                .dependencies
                .remove(&entry.mod_id)
                .unwrap_or_default()
                .into_iter()
                .map(|n| self.dependency(n))
                .collect();

            let mut urls: Vec<String> = entry.display_url.into_iter().collect();
            urls.extend(toml.issue_tracker_url.clone());

            packages.push(Package {
                id: PackageId::new(self.platform, &entry.mod_id, &version),
                dependencies,
                information: PackageInformation {
                    title: entry.display_name.unwrap_or_else(|| entry.mod_id.clone()),
                    description: entry.description.unwrap_or_default().trim().to_owned(),
                    authors: entry
                        .authors
                        .map(|n| {
                            n.split(',')
                                .map(str::trim)
                                .filter(|n| !n.is_empty())
                                .map(str::to_owned)
                                .collect()
                        })
                        .unwrap_or_default(),
                    urls,
                    license: toml.license.clone(),
                },
            });
        }

        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_zip;
    use sp_versions::ComparableVersion;

    const FORGE_MANIFEST: &str = "Manifest-Version: 1.0\r\n\
        \r\n\
        Name: net/minecraftforge/versions/forge/\r\n\
        Specification-Title: Forge\r\n\
        Specification-Vendor: Forge Development LLC\r\n\
        Specification-Version: 47\r\n\
        Implementation-Title: Forge\r\n\
        Implementation-Version: 47.2.0\r\n\
        Implementation-Vendor: Forge Development LLC\r\n\
        \r\n\
        Name: net/minecraftforge/versions/mcp/\r\n\
        Specification-Title: Minecraft\r\n\
        Specification-Vendor: Mojang\r\n\
        Specification-Version: 1.20.1\r\n\
        Implementation-Title: MCP\r\n\
        Implementation-Version: 20230612.114412\r\n";

    const MODS_TOML: &str = r#"
modLoader = "javafml"
loaderVersion = "[47,)"
license = "LGPL-3.0"
issueTrackerURL = "https://example.com/issues"

[[mods]]
modId = "examplemod"
version = "${file.jarVersion}"
displayName = "Example Mod"
authors = "Alice, Bob"
displayURL = "https://example.com"
description = '''
An example.
'''

[[mods]]
modId = "example_addon"
version = "2.0.0"

[[dependencies.examplemod]]
modId = "forge"
mandatory = true
versionRange = "[47,)"
ordering = "NONE"
side = "BOTH"

[[dependencies.examplemod]]
modId = "minecraft"
mandatory = true
versionRange = "[1.20.1,1.21)"

[[dependencies.examplemod]]
modId = "jei"
type = "optional"
versionRange = "[15.0,)"

[[dependencies.examplemod]]
modId = "badmod"
type = "incompatible"
versionRange = "[1.0,)"
"#;

    fn open(entries: &[(&str, &str)]) -> (tempfile::TempDir, Archive) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(dir.path(), "test.jar", entries);
        let archive = Archive::open(&path).unwrap();
        (dir, archive)
    }

    #[test]
    fn forge_server() {
        let (_dir, mut archive) = open(&[("META-INF/MANIFEST.MF", FORGE_MANIFEST)]);
        let info = ForgeServer.detect(&mut archive).unwrap().unwrap();
        assert_eq!(info.loader_platform, Platform::Forge);
        assert_eq!(info.loader_version, "47.2.0");
        assert_eq!(info.game_version, "1.20.1");
    }

    #[test]
    fn neoforge_server() {
        let manifest = FORGE_MANIFEST
            .replace("Implementation-Title: Forge", "Implementation-Title: NeoForge")
            .replace("47.2.0", "20.4.80");
        let (_dir, mut archive) = open(&[("META-INF/MANIFEST.MF", manifest.as_str())]);
        let info = ForgeServer.detect(&mut archive).unwrap().unwrap();
        assert_eq!(info.loader_platform, Platform::Neoforge);
        assert_eq!(info.loader_version, "20.4.80");
    }

    #[test]
    fn plain_jar_manifest() {
        let (_dir, mut archive) = open(&[(
            "META-INF/MANIFEST.MF",
            "Manifest-Version: 1.0\r\nImplementation-Title: Some Mod\r\nImplementation-Version: 1.0\r\n",
        )]);
        assert!(ForgeServer.detect(&mut archive).unwrap().is_none());
    }

    #[test]
    fn mods_toml() {
        let (_dir, mut archive) = open(&[
            ("META-INF/mods.toml", MODS_TOML),
            (
                "META-INF/MANIFEST.MF",
                "Manifest-Version: 1.0\r\nImplementation-Version: 1.4.2\r\n",
            ),
        ]);
        let mut packages = ForgeMods::forge().detect(&mut archive).unwrap();
        assert_eq!(packages.len(), 2);
        packages.sort_by(|a, b| a.id.name.cmp(&b.id.name));

        let addon = &packages[0];
        assert_eq!(addon.id, PackageId::new(Platform::Forge, "example-addon", "2.0.0"));
        assert!(addon.dependencies.is_empty());

        let example = &packages[1];
        assert_eq!(example.id.version, "1.4.2");
        assert_eq!(example.information.title, "Example Mod");
        assert_eq!(example.information.description, "An example.");
        assert_eq!(example.information.authors, ["Alice", "Bob"]);
        assert_eq!(example.information.license.as_deref(), Some("LGPL-3.0"));
        assert_eq!(
            example.information.urls,
            ["https://example.com", "https://example.com/issues"]
        );
        assert_eq!(example.dependencies.len(), 4);

        let forge = &example.dependencies[0];
        assert_eq!(forge.id.platform, Platform::Forge);
        // A single component version can't be parsed, so it fails open.
        assert!(forge.constraint.is_none());

        let minecraft = &example.dependencies[1];
        assert_eq!(minecraft.id.platform, Platform::Minecraft);
        let id = PackageId::target(Platform::Minecraft, "minecraft");
        let mc = |n: &str| ComparableVersion::parse(n, Scheme::MinecraftRelease);
        assert!(minecraft.is_satisfied_by(&id, &mc("1.20.4")));
        assert!(!minecraft.is_satisfied_by(&id, &mc("1.21")));

        let jei = &example.dependencies[2];
        assert!(!jei.mandatory);

        let badmod = &example.dependencies[3];
        assert!(!badmod.mandatory);
        let id = PackageId::target(Platform::Forge, "badmod");
        let v = |n: &str| ComparableVersion::parse(n, Scheme::Semver);
        assert!(!badmod.is_satisfied_by(&id, &v("1.5.0")));
        assert!(badmod.is_satisfied_by(&id, &v("0.9.0")));
    }

    #[test]
    fn neoforge_mods_toml() {
        let toml = "[[mods]]\nmodId=\"thing\"\nversion=\"1.0.0\"\n\n[[dependencies.thing]]\nmodId=\"neoforge\"\ntype=\"required\"\nversionRange=\"[20.4,)\"\n";
        let (_dir, mut archive) = open(&[("META-INF/neoforge.mods.toml", toml)]);

        assert!(ForgeMods::forge().detect(&mut archive).unwrap().is_empty());

        let packages = ForgeMods::neoforge().detect(&mut archive).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].id.platform, Platform::Neoforge);
        let dep = &packages[0].dependencies[0];
        assert_eq!(dep.id.platform, Platform::Neoforge);
        assert!(dep.mandatory);
        let id = PackageId::target(Platform::Neoforge, "neoforge");
        let version = ComparableVersion::parse("20.4.80", Scheme::Semver);
        assert!(dep.is_satisfied_by(&id, &version));
    }

    #[test]
    fn incompatible_interval() {
        let toml = "[[mods]]\nmodId=\"thing\"\nversion=\"1.0.0\"\n\n[[dependencies.thing]]\nmodId=\"othermod\"\ntype=\"incompatible\"\nversionRange=\"[1.0,2.0)\"\n";
        let (_dir, mut archive) = open(&[("META-INF/mods.toml", toml)]);
        let packages = ForgeMods::forge().detect(&mut archive).unwrap();
        let dep = &packages[0].dependencies[0];
        assert!(!dep.mandatory);

        let id = PackageId::target(Platform::Forge, "othermod");
        let v = |n: &str| ComparableVersion::parse(n, Scheme::Semver);
        assert!(dep.is_satisfied_by(&id, &v("0.5.0")));
        assert!(!dep.is_satisfied_by(&id, &v("1.0.0")));
        assert!(!dep.is_satisfied_by(&id, &v("1.9.0")));
        assert!(dep.is_satisfied_by(&id, &v("2.0.0")));
    }

    #[test]
    fn placeholder_without_manifest() {
        let toml = "[[mods]]\nmodId=\"thing\"\nversion=\"${file.jarVersion}\"\n";
        let (_dir, mut archive) = open(&[("META-INF/mods.toml", toml)]);
        let packages = ForgeMods::forge().detect(&mut archive).unwrap();
        assert_eq!(packages[0].id.version, "${file.jarVersion}");
    }

    #[test]
    fn bad_toml() {
        let (_dir, mut archive) = open(&[("META-INF/mods.toml", "[[mods]\nmodId=")]);
        assert!(matches!(
            ForgeMods::forge().detect(&mut archive),
            Err(DetectError::Toml { .. })
        ));
    }
}
