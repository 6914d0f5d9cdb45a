use crate::{ConstraintExpression, Operator, Scheme, VersionConstraint};

use super::{comparator, endpoint, is_wildcard};

const ALLOWED: &[&str] = &[">=", ">", "<=", "<", "=", "!=", "^", "~=", "~"];

/// Only the first range of a comma separated union
/// like `[1.0,2.0),[3.0,)` is honored.
pub(super) fn parse(raw: &str, scheme: Scheme) -> Option<ConstraintExpression> {
    let raw = raw.trim();
    if is_wildcard(raw) || raw.eq_ignore_ascii_case("none") {
        return None;
    }

    let inclusive_lower = match raw.as_bytes()[0] {
        b'[' => true,
        b'(' => false,
        _ => return Some(ConstraintExpression::single(comparator(raw, ALLOWED, scheme)?)),
    };

    let close = raw.find([']', ')'])?;
    let inclusive_upper = raw.as_bytes()[close] == b']';
    let inner = &raw[1..close];

    let Some((lower, upper)) = inner.split_once(',') else {
        let value = endpoint(inner.trim(), scheme)?;
        return Some(ConstraintExpression::single(VersionConstraint::new(
            Operator::Eq,
            value,
        )));
    };

    let mut group = Vec::new();
    let lower = lower.trim();
    if !lower.is_empty() {
        let operator = if inclusive_lower {
            Operator::Gte
        } else {
            Operator::Gt
        };
        group.push(VersionConstraint::new(operator, endpoint(lower, scheme)?));
    }
    let upper = upper.trim();
    if !upper.is_empty() {
        let operator = if inclusive_upper {
            Operator::Lte
        } else {
            Operator::Lt
        };
        group.push(VersionConstraint::new(operator, endpoint(upper, scheme)?));
    }

    (!group.is_empty()).then(|| ConstraintExpression::all_of(group))
}
