use serde::{Deserialize, Serialize};
use sp_core::Platform;

use crate::{ComparableVersion, ConstraintExpression};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId {
    pub platform: Platform,
    /// See [`normalize_name`].
    pub name: String,
    /// The raw version string.
    ///
    /// Unused (empty) when the id is the target of a [`Dependency`].
    pub version: String,
}

impl PackageId {
    #[must_use]
    pub fn new(platform: Platform, name: &str, version: &str) -> Self {
        Self {
            platform,
            name: normalize_name(name),
            version: version.to_owned(),
        }
    }

    /// An id without a version, for dependency targets.
    #[must_use]
    pub fn target(platform: Platform, name: &str) -> Self {
        Self::new(platform, name, "")
    }

    #[must_use]
    pub fn is_same_package(&self, other: &PackageId) -> bool {
        self.platform == other.platform && self.name == other.name
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Only `platform` and `name` are meaningful.
    pub id: PackageId,
    /// `None` means any version will do.
    pub constraint: Option<ConstraintExpression>,
    /// Whether the package must be present at all.
    ///
    /// Optional dependencies (recommendations, and
    /// inverted "breaks"/"conflicts" declarations) only
    /// constrain the version when the package *is* present.
    pub mandatory: bool,
}

impl Dependency {
    /// Checks whether the package `id` at `version` fulfills
    /// this dependency.
    ///
    /// Always `false` for a different package, regardless
    /// of the constraint.
    #[must_use]
    pub fn is_satisfied_by(&self, id: &PackageId, version: &ComparableVersion) -> bool {
        if !self.id.is_same_package(id) {
            return false;
        }
        self.constraint
            .as_ref()
            .is_none_or(|n| n.is_satisfied_by(version))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageInformation {
    pub title: String,
    pub description: String,
    pub authors: Vec<String>,
    pub urls: Vec<String>,
    pub license: Option<String>,
}

/// A mod or plugin found inside an archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub dependencies: Vec<Dependency>,
    pub information: PackageInformation,
}

/// Turns a display name or id into a slug:
/// trimmed, lowercase, with runs of whitespace
/// and underscores replaced by a single `-`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.trim().chars() {
        if c.is_whitespace() || c == '_' {
            pending_dash = true;
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_range, Grammar, Scheme};

    fn fabric_dep(name: &str, range: &str) -> Dependency {
        Dependency {
            id: PackageId::target(Platform::Fabric, name),
            constraint: parse_range(range, Grammar::Fabric, Scheme::Semver),
            mandatory: true,
        }
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_name("  Fabric API "), "fabric-api");
        assert_eq!(normalize_name("some_mod  name"), "some-mod-name");
        assert_eq!(normalize_name("JEI"), "jei");
        assert_eq!(normalize_name("_lead"), "lead");
    }

    #[test]
    fn satisfy_checks_identity_first() {
        let dep = fabric_dep("fabricloader", "*");
        let version = ComparableVersion::parse("0.15.0", Scheme::Semver);

        assert!(dep.is_satisfied_by(
            &PackageId::new(Platform::Fabric, "fabricloader", "0.15.0"),
            &version
        ));
        assert!(!dep.is_satisfied_by(
            &PackageId::new(Platform::Forge, "fabricloader", "0.15.0"),
            &version
        ));
        assert!(!dep.is_satisfied_by(
            &PackageId::new(Platform::Fabric, "fabric-api", "0.15.0"),
            &version
        ));
    }

    #[test]
    fn satisfy_constraint() {
        let dep = fabric_dep("fabricloader", ">=0.14.0");
        let id = PackageId::target(Platform::Fabric, "fabricloader");

        assert!(dep.is_satisfied_by(&id, &ComparableVersion::parse("0.15.0", Scheme::Semver)));
        assert!(!dep.is_satisfied_by(&id, &ComparableVersion::parse("0.10.0", Scheme::Semver)));
        assert!(!dep.is_satisfied_by(&id, &ComparableVersion::INVALID));
    }

    #[test]
    fn empty_constraint_is_satisfied() {
        let mut dep = fabric_dep("fabricloader", "*");
        assert!(dep.constraint.is_none());
        dep.constraint = Some(ConstraintExpression::default());
        let id = PackageId::target(Platform::Fabric, "fabricloader");
        assert!(dep.is_satisfied_by(&id, &ComparableVersion::INVALID));
    }
}
