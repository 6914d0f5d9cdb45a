use std::{cmp::Ordering, fmt::Display, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sp_core::Platform;

/// A Minecraft snapshot such as `23w13a`:
/// year, literal `w`, week, one lowercase letter.
static SNAPSHOT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)w(\d+)([a-z])$").unwrap());
static SNAPSHOT_SEARCH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+w\d+[a-z]").unwrap());

const SNAPSHOT_WEEKS: std::ops::RangeInclusive<u16> = 1..=54;
const SNAPSHOT_LETTERS: std::ops::RangeInclusive<u16> = (b'a' as u16)..=(b'h' as u16);

/// The numbering system a version string follows.
///
/// Versions of different schemes can't be compared
/// with each other (every comparison is `false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// `MAJOR.MINOR[.PATCH][-PRERELEASE][+BUILD]`
    Semver,
    /// Game releases like `1.20.4` or `1.20-pre1`. Same shape as semver.
    MinecraftRelease,
    /// Weekly game snapshots like `23w13a`.
    MinecraftSnapshot,
    Invalid,
}

impl Scheme {
    /// Picks the scheme for a version (or range) string
    /// referring to something on `platform`.
    ///
    /// Only the game itself uses the Minecraft schemes,
    /// everything else is treated as semver.
    #[must_use]
    pub fn for_dependency(platform: Platform, raw: &str) -> Scheme {
        if platform != Platform::Minecraft {
            Scheme::Semver
        } else if SNAPSHOT_SEARCH_REGEX.is_match(raw) {
            Scheme::MinecraftSnapshot
        } else {
            Scheme::MinecraftRelease
        }
    }
}

/// A parsed version, comparable with other
/// versions of the same [`Scheme`].
///
/// For [`Scheme::MinecraftSnapshot`], `major` is the year,
/// `minor` is the week and `patch` is the ASCII code of the letter.
///
/// Note: this doesn't implement `PartialEq`/`PartialOrd`,
/// as cross-scheme values are neither equal *nor* unequal.
/// Use [`ComparableVersion::compare`] or the `is_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparableVersion {
    pub scheme: Scheme,
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
    pub prerelease: String,
    /// Build metadata. Only for display, never compared.
    pub build: String,
}

impl ComparableVersion {
    /// The result of every failed parse.
    pub const INVALID: ComparableVersion = ComparableVersion {
        scheme: Scheme::Invalid,
        major: 0,
        minor: 0,
        patch: 0,
        prerelease: String::new(),
        build: String::new(),
    };

    #[must_use]
    pub const fn new(scheme: Scheme, major: u16, minor: u16, patch: u16) -> Self {
        Self {
            scheme,
            major,
            minor,
            patch,
            prerelease: String::new(),
            build: String::new(),
        }
    }

    /// Parses `raw` according to `scheme`.
    ///
    /// Never fails: anything malformed (non-numeric parts,
    /// wrong number of parts, out of range fields)
    /// gives [`ComparableVersion::INVALID`].
    #[must_use]
    pub fn parse(raw: &str, scheme: Scheme) -> Self {
        let version = match scheme {
            Scheme::Semver | Scheme::MinecraftRelease => parse_dotted(raw.trim(), scheme),
            Scheme::MinecraftSnapshot => parse_snapshot(raw.trim()),
            Scheme::Invalid => None,
        };
        match version {
            Some(n) if n.validate() => n,
            _ => Self::INVALID,
        }
    }

    /// [`ComparableVersion::parse`] with the scheme picked
    /// by [`Scheme::for_dependency`].
    #[must_use]
    pub fn parse_for(platform: Platform, raw: &str) -> Self {
        Self::parse(raw, Scheme::for_dependency(platform, raw))
    }

    /// Checks the fields are in range for the scheme.
    #[must_use]
    pub fn validate(&self) -> bool {
        match self.scheme {
            Scheme::Semver => true,
            Scheme::MinecraftRelease => self.major >= 1,
            Scheme::MinecraftSnapshot => {
                SNAPSHOT_WEEKS.contains(&self.minor) && SNAPSHOT_LETTERS.contains(&self.patch)
            }
            Scheme::Invalid => false,
        }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.scheme == Scheme::Invalid
    }

    /// Orders two versions, or `None` if they
    /// can't be compared (different schemes or invalid).
    ///
    /// A prerelease sorts before the same version without one,
    /// two prereleases are ordered lexicographically.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        if self.scheme != other.scheme || self.is_invalid() {
            return None;
        }
        let numbers = (self.major, self.minor, self.patch).cmp(&(
            other.major,
            other.minor,
            other.patch,
        ));
        Some(numbers.then_with(|| {
            match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                (true, true) => Ordering::Equal,
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                (false, false) => self.prerelease.cmp(&other.prerelease),
            }
        }))
    }

    #[must_use]
    pub fn is_eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    #[must_use]
    pub fn is_neq(&self, other: &Self) -> bool {
        matches!(
            self.compare(other),
            Some(Ordering::Less | Ordering::Greater)
        )
    }

    #[must_use]
    pub fn is_lt(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Less)
    }

    #[must_use]
    pub fn is_gt(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Greater)
    }

    #[must_use]
    pub fn is_lte(&self, other: &Self) -> bool {
        matches!(
            self.compare(other),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    #[must_use]
    pub fn is_gte(&self, other: &Self) -> bool {
        matches!(
            self.compare(other),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }

    /// Loose equality for `~`: only the major version is compared
    /// if `other` has a minor version of zero, otherwise major and minor.
    #[must_use]
    pub fn is_weak_eq(&self, other: &Self) -> bool {
        if self.compare(other).is_none() {
            return false;
        }
        if other.minor == 0 {
            self.major == other.major
        } else {
            self.major == other.major && self.minor == other.minor
        }
    }

    /// `>` within the same major version, for `^`.
    #[must_use]
    pub fn is_weak_gt(&self, other: &Self) -> bool {
        self.major == other.major && self.is_gt(other)
    }
}

fn parse_dotted(raw: &str, scheme: Scheme) -> Option<ComparableVersion> {
    let (rest, build) = raw.split_once('+').unwrap_or((raw, ""));
    let (core, prerelease) = rest.split_once('-').unwrap_or((rest, ""));

    let parts: Vec<&str> = core.split('.').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    let mut numbers = [0u16; 3];
    for (number, part) in numbers.iter_mut().zip(&parts) {
        if !part.bytes().all(|n| n.is_ascii_digit()) {
            return None;
        }
        *number = part.parse().ok()?;
    }

    Some(ComparableVersion {
        scheme,
        major: numbers[0],
        minor: numbers[1],
        patch: numbers[2],
        prerelease: prerelease.to_owned(),
        build: build.to_owned(),
    })
}

fn parse_snapshot(raw: &str) -> Option<ComparableVersion> {
    let captures = SNAPSHOT_REGEX.captures(raw)?;
    let year = captures.get(1)?.as_str().parse().ok()?;
    let week = captures.get(2)?.as_str().parse().ok()?;
    let letter = captures.get(3)?.as_str().bytes().next()?;

    Some(ComparableVersion::new(
        Scheme::MinecraftSnapshot,
        year,
        week,
        u16::from(letter),
    ))
}

impl Display for ComparableVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.scheme {
            Scheme::Invalid => write!(f, "<invalid>"),
            Scheme::MinecraftSnapshot => {
                let letter = u8::try_from(self.patch).map_or('?', char::from);
                write!(f, "{}w{:02}{letter}", self.major, self.minor)
            }
            Scheme::Semver | Scheme::MinecraftRelease => {
                write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
                if !self.prerelease.is_empty() {
                    write!(f, "-{}", self.prerelease)?;
                }
                if !self.build.is_empty() {
                    write!(f, "+{}", self.build)?;
                }
                Ok(())
            }
        }
    }
}
