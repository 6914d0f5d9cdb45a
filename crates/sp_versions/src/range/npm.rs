use crate::{ConstraintExpression, Scheme};

use super::{caret, comparator, endpoint, is_wildcard, tilde};

const ALLOWED: &[&str] = &[">=", ">", "<=", "<", "=", "!="];

/// Only the first whitespace separated token is read,
/// `||` alternatives and hyphen ranges aren't supported.
pub(super) fn parse(raw: &str, scheme: Scheme) -> Option<ConstraintExpression> {
    let token = raw.split_whitespace().next().unwrap_or_default();
    if is_wildcard(token) || token.eq_ignore_ascii_case("x") {
        return None;
    }

    let group = if let Some(rest) = token.strip_prefix('^') {
        caret(endpoint(rest, scheme)?)
    } else if let Some(rest) = token.strip_prefix('~') {
        tilde(endpoint(rest, scheme)?)
    } else {
        vec![comparator(token, ALLOWED, scheme)?]
    };
    Some(ConstraintExpression::all_of(group))
}

#[cfg(test)]
mod tests {
    use crate::{parse_range, ComparableVersion, Grammar, Scheme};

    fn npm(raw: &str) -> Option<String> {
        parse_range(raw, Grammar::Npm, Scheme::Semver).map(|n| n.to_string())
    }

    #[test]
    fn caret() {
        assert_eq!(npm("^2.2.1").as_deref(), Some(">=2.2.1 <3.0.0"));
        assert_eq!(npm("^0.1.0").as_deref(), Some(">=0.1.0 <0.2.0"));
        assert_eq!(npm("^0.0.3").as_deref(), Some(">=0.0.3 <0.0.4"));
    }

    #[test]
    fn tilde() {
        assert_eq!(npm("~2.2.0").as_deref(), Some(">=2.2.0 <2.3.0"));
        assert_eq!(npm("~0.2.3").as_deref(), Some(">=0.2.3 <0.3.0"));
    }

    #[test]
    fn comparators() {
        assert_eq!(npm(">=2.0.0").as_deref(), Some(">=2.0.0"));
        assert_eq!(npm("<1.0").as_deref(), Some("<1.0.0"));
        assert_eq!(npm("1.2.3").as_deref(), Some("=1.2.3"));
    }

    #[test]
    fn only_first_token() {
        let expr = parse_range(">=1.0.0 <2.0.0", Grammar::Npm, Scheme::Semver).unwrap();
        assert!(expr.is_satisfied_by(&ComparableVersion::parse("5.0.0", Scheme::Semver)));
        assert_eq!(npm("^1.0.0 || ^2.0.0").as_deref(), Some(">=1.0.0 <2.0.0"));
    }

    #[test]
    fn wildcards() {
        for raw in ["", "*", "x", "X", "   "] {
            assert_eq!(npm(raw), None, "{raw:?}");
        }
        assert_eq!(npm("^banana"), None);
    }

    #[test]
    fn caret_excludes_next_major() {
        let expr = parse_range("^2.2.1", Grammar::Npm, Scheme::Semver).unwrap();
        let v = |n: &str| ComparableVersion::parse(n, Scheme::Semver);
        assert!(expr.is_satisfied_by(&v("2.2.1")));
        assert!(expr.is_satisfied_by(&v("2.9.0")));
        assert!(!expr.is_satisfied_by(&v("3.0.0")));
        assert!(!expr.is_satisfied_by(&v("2.2.0")));
    }
}
