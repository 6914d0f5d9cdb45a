//! The fixed set of detectors, and the policy
//! for combining what they find.

use std::path::Path;

use sp_core::{err, pt};
use sp_versions::Package;

use crate::{
    detectors::{
        EnvironmentDetector, ExecutableDetector, FabricLauncher, FabricMod, FabricSingleFile,
        ForgeMods, ForgeServer, McdrEnvironmentDetector, McdrPlugin, PackageDetector,
        ServerPropertiesDetector, Vanilla,
    },
    Archive, EnvironmentInfo, ExecutableInfo,
};

/// Every detector, in the order they run.
///
/// Built once and shared (read-only) by all scan tasks.
pub struct Registry {
    executables: Vec<Box<dyn ExecutableDetector>>,
    packages: Vec<Box<dyn PackageDetector>>,
    environments: Vec<Box<dyn EnvironmentDetector>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(
            vec![
                Box::new(Vanilla),
                Box::new(FabricSingleFile),
                Box::new(FabricLauncher),
                Box::new(ForgeServer),
            ],
            vec![
                Box::new(FabricMod),
                Box::new(ForgeMods::forge()),
                Box::new(ForgeMods::neoforge()),
                Box::new(McdrPlugin),
            ],
            // MCDR first, it moves the working directory
            vec![
                Box::new(McdrEnvironmentDetector),
                Box::new(ServerPropertiesDetector),
            ],
        )
    }
}

impl Registry {
    #[must_use]
    pub fn new(
        executables: Vec<Box<dyn ExecutableDetector>>,
        packages: Vec<Box<dyn PackageDetector>>,
        environments: Vec<Box<dyn EnvironmentDetector>>,
    ) -> Self {
        Self {
            executables,
            packages,
            environments,
        }
    }

    /// Works out what server `path` is.
    ///
    /// Gives [`ExecutableInfo::unknown`] if the file can't be
    /// opened, nothing matches, or more than one kind of
    /// executable matches (we don't guess).
    #[must_use]
    pub fn detect_executable(&self, path: &Path) -> ExecutableInfo {
        match Archive::open(path) {
            Ok(mut archive) => self.detect_executable_in(&mut archive),
            Err(error) => {
                err!("Couldn't open {path:?}: {error}");
                ExecutableInfo::unknown()
            }
        }
    }

    /// [`Registry::detect_executable`] on an already opened archive.
    #[must_use]
    pub fn detect_executable_in(&self, archive: &mut Archive) -> ExecutableInfo {
        let mut found: Option<(&'static str, ExecutableInfo)> = None;

        for detector in &self.executables {
            let info = match detector.detect(archive) {
                Ok(Some(n)) => n,
                Ok(None) => continue,
                Err(error) => {
                    err!(
                        "{} detector failed on {:?}: {error}",
                        detector.name(),
                        archive.path()
                    );
                    continue;
                }
            };
            if let Some((first, _)) = &found {
                pt!(
                    "{:?} looks like both {first} and {}, marking as unknown",
                    archive.path(),
                    detector.name()
                );
                return ExecutableInfo::unknown();
            }
            found = Some((detector.name(), info));
        }

        found.map_or_else(ExecutableInfo::unknown, |(_, info)| info)
    }

    /// Every mod/plugin declared in `path`, from all formats.
    /// Empty if the file can't be opened.
    #[must_use]
    pub fn detect_packages(&self, path: &Path) -> Vec<Package> {
        match Archive::open(path) {
            Ok(mut archive) => self.detect_packages_in(&mut archive),
            Err(error) => {
                err!("Couldn't open {path:?}: {error}");
                Vec::new()
            }
        }
    }

    /// [`Registry::detect_packages`] on an already opened archive.
    #[must_use]
    pub fn detect_packages_in(&self, archive: &mut Archive) -> Vec<Package> {
        let mut packages = Vec::new();
        for detector in &self.packages {
            match detector.detect(archive) {
                Ok(found) => packages.extend(found),
                Err(error) => {
                    err!(
                        "{} detector failed on {:?}: {error}",
                        detector.name(),
                        archive.path()
                    );
                }
            }
        }
        packages
    }

    /// Runs the environment detectors on a server directory.
    #[must_use]
    pub fn detect_environment(&self, dir: &Path) -> EnvironmentInfo {
        let mut env = EnvironmentInfo::new(dir);
        for detector in &self.environments {
            match detector.detect(dir, &mut env) {
                Ok(true) => pt!("Found {} in {dir:?}", detector.name()),
                Ok(false) => {}
                Err(error) => {
                    err!("{} detector failed on {dir:?}: {error}", detector.name());
                }
            }
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_zip;
    use sp_core::Platform;

    const VERSION_JSON: &str = r#"{"id": "1.20.4"}"#;
    const INSTALL_PROPERTIES: &str = "fabric-loader-version=0.15.7\ngame-version=1.20.4\n";

    #[test]
    fn vanilla() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(dir.path(), "server.jar", &[("version.json", VERSION_JSON)]);

        let info = Registry::default().detect_executable(&path);
        assert_eq!(info.loader_platform, Platform::Minecraft);
        assert_eq!(info.game_version, "1.20.4");
        assert_eq!(info.path, path);
    }

    #[test]
    fn two_kinds_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(
            dir.path(),
            "server.jar",
            &[
                ("version.json", VERSION_JSON),
                ("install.properties", INSTALL_PROPERTIES),
            ],
        );
        assert!(Registry::default().detect_executable(&path).is_unknown());
    }

    #[test]
    fn duplicate_entry_is_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(
            dir.path(),
            "server.jar",
            &[
                ("version.json", VERSION_JSON),
                ("./version.json", r#"{"id": "1.19"}"#),
            ],
        );
        assert!(Registry::default().detect_executable(&path).is_unknown());
    }

    #[test]
    fn broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::default();

        let not_zip = dir.path().join("server.jar");
        std::fs::write(&not_zip, "definitely not a zip").unwrap();
        assert!(registry.detect_executable(&not_zip).is_unknown());
        assert!(registry.detect_packages(&not_zip).is_empty());

        let missing = dir.path().join("missing.jar");
        assert!(registry.detect_executable(&missing).is_unknown());

        // A parse error in one detector doesn't stop the others
        let path = write_zip(
            dir.path(),
            "bad.jar",
            &[("version.json", "{"), ("install.properties", INSTALL_PROPERTIES)],
        );
        let info = registry.detect_executable(&path);
        assert_eq!(info.loader_platform, Platform::Fabric);
        assert_eq!(info.loader_version, "0.15.7");
    }

    #[test]
    fn packages_are_unioned() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_zip(
            dir.path(),
            "both.jar",
            &[
                (
                    "fabric.mod.json",
                    r#"{"schemaVersion": 1, "id": "both", "version": "1.0.0"}"#,
                ),
                (
                    "META-INF/mods.toml",
                    "[[mods]]\nmodId=\"both\"\nversion=\"1.0.0\"\n",
                ),
            ],
        );

        let mut platforms: Vec<Platform> = Registry::default()
            .detect_packages(&path)
            .into_iter()
            .map(|n| n.id.platform)
            .collect();
        platforms.sort_by_key(|n| n.to_string());
        assert_eq!(platforms, [Platform::Fabric, Platform::Forge]);
    }

    #[test]
    fn environment_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.yml"),
            "working_directory: srv\n",
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("srv")).unwrap();
        std::fs::write(
            dir.path().join("srv/server.properties"),
            "server-port=25570\n",
        )
        .unwrap();

        let env = Registry::default().detect_environment(dir.path());
        assert!(env.mcdr.is_some());
        assert_eq!(env.server_properties.unwrap().server_port(), Some(25570));
    }
}
