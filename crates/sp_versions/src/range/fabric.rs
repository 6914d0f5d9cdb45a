use crate::{ComparableVersion, ConstraintExpression, Scheme, VersionConstraint};

use super::{bounded, caret, comparator, endpoint, is_wildcard, tilde};

const ALLOWED: &[&str] = &[">=", ">", "<=", "<", "="];

/// All tokens form a single AND group.
pub(super) fn parse(raw: &str, scheme: Scheme) -> Option<ConstraintExpression> {
    let raw = raw.trim();
    if is_wildcard(raw) {
        return None;
    }

    let mut group = Vec::new();
    for token in raw.split_whitespace() {
        if token == "*" {
            continue;
        }
        group.extend(token_constraints(token, scheme)?);
    }

    (!group.is_empty()).then(|| ConstraintExpression::all_of(group))
}

fn token_constraints(token: &str, scheme: Scheme) -> Option<Vec<VersionConstraint>> {
    if let Some(rest) = token.strip_prefix('^') {
        return Some(caret(endpoint(rest, scheme)?));
    }
    if let Some(rest) = token.strip_prefix('~') {
        return Some(tilde(endpoint(rest, scheme)?));
    }
    if let Some(prefix) = ["x", "X", "*"]
        .into_iter()
        .find_map(|n| token.strip_suffix(n)?.strip_suffix('.'))
    {
        return wildcard(prefix, scheme);
    }
    Some(vec![comparator(token, ALLOWED, scheme)?])
}

/// `1.20.x` is anything in `1.20`, `1.x` anything in `1`.
fn wildcard(prefix: &str, scheme: Scheme) -> Option<Vec<VersionConstraint>> {
    let parts = prefix
        .split('.')
        .map(|n| n.parse::<u16>().ok())
        .collect::<Option<Vec<u16>>>()?;
    match parts.as_slice() {
        [major] => Some(bounded(
            ComparableVersion::new(scheme, *major, 0, 0),
            major
                .checked_add(1)
                .map(|n| ComparableVersion::new(scheme, n, 0, 0)),
        )),
        [major, minor] => Some(bounded(
            ComparableVersion::new(scheme, *major, *minor, 0),
            minor
                .checked_add(1)
                .map(|n| ComparableVersion::new(scheme, *major, n, 0)),
        )),
        _ => None,
    }
}
