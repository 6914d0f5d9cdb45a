//! Parsers for the version range syntaxes
//! found in mod and plugin metadata.
//!
//! Every parser is fail-open: a wildcard, or anything that
//! can't be understood, gives `None` (unconstrained) so a
//! strange range never blocks an otherwise valid dependency.

use serde::{Deserialize, Serialize};

use crate::{ComparableVersion, ConstraintExpression, Operator, Scheme, VersionConstraint};

mod fabric;
mod maven;
mod npm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grammar {
    /// Maven intervals like `[1.0,2.0)`, used by Forge's `mods.toml`.
    Maven,
    /// npm-style `^1.2.0` / `~1.2.0` / `>=1.0`, used by MCDR plugins.
    Npm,
    /// Space separated comparators like `>=1.0 <2.0`,
    /// used by `fabric.mod.json`.
    Fabric,
}

/// Parses `raw` in the range syntax `grammar`,
/// reading every endpoint as a version of `scheme`.
///
/// Returns `None` when the range is unconstrained or unparseable.
#[must_use]
pub fn parse_range(raw: &str, grammar: Grammar, scheme: Scheme) -> Option<ConstraintExpression> {
    match grammar {
        Grammar::Maven => maven::parse(raw, scheme),
        Grammar::Npm => npm::parse(raw, scheme),
        Grammar::Fabric => fabric::parse(raw, scheme),
    }
}

/// Comparator prefixes, longest first so `>=` wins over `>`.
const PREFIXES: &[(&str, Operator)] = &[
    (">=", Operator::Gte),
    ("<=", Operator::Lte),
    ("!=", Operator::Neq),
    ("~=", Operator::WeakEq),
    (">", Operator::Gt),
    ("<", Operator::Lt),
    ("=", Operator::Eq),
    ("^", Operator::WeakGt),
    ("~", Operator::WeakEq),
];

/// Splits a comparator prefix (one of `allowed`) off `token`.
/// No prefix means an exact match.
fn split_comparator<'a>(token: &'a str, allowed: &[&str]) -> (Operator, &'a str) {
    for (prefix, operator) in PREFIXES {
        if !allowed.contains(prefix) {
            continue;
        }
        if let Some(rest) = token.strip_prefix(prefix) {
            return (*operator, rest.trim_start());
        }
    }
    (Operator::Eq, token)
}

/// `None` if the endpoint isn't a valid version.
fn endpoint(raw: &str, scheme: Scheme) -> Option<ComparableVersion> {
    let version = ComparableVersion::parse(raw, scheme);
    (!version.is_invalid()).then_some(version)
}

fn comparator(token: &str, allowed: &[&str], scheme: Scheme) -> Option<VersionConstraint> {
    let (operator, rest) = split_comparator(token, allowed);
    Some(VersionConstraint::new(operator, endpoint(rest, scheme)?))
}

/// `^v`: at least `v`, below the next version that may break compatibility.
fn caret(v: ComparableVersion) -> Vec<VersionConstraint> {
    let scheme = v.scheme;
    let upper = if v.major > 0 {
        v.major
            .checked_add(1)
            .map(|major| ComparableVersion::new(scheme, major, 0, 0))
    } else if v.minor > 0 {
        v.minor
            .checked_add(1)
            .map(|minor| ComparableVersion::new(scheme, 0, minor, 0))
    } else {
        v.patch
            .checked_add(1)
            .map(|patch| ComparableVersion::new(scheme, 0, 0, patch))
    };
    bounded(v, upper)
}

/// `~v`: at least `v`, below the next minor version.
fn tilde(v: ComparableVersion) -> Vec<VersionConstraint> {
    let upper = v
        .minor
        .checked_add(1)
        .map(|minor| ComparableVersion::new(v.scheme, v.major, minor, 0));
    bounded(v, upper)
}

fn bounded(lower: ComparableVersion, upper: Option<ComparableVersion>) -> Vec<VersionConstraint> {
    let mut group = vec![VersionConstraint::new(Operator::Gte, lower)];
    if let Some(upper) = upper {
        group.push(VersionConstraint::new(Operator::Lt, upper));
    }
    group
}

fn is_wildcard(raw: &str) -> bool {
    raw.is_empty() || raw == "*"
}
