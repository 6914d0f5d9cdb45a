use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::ComparableVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    /// `~`, see [`ComparableVersion::is_weak_eq`].
    WeakEq,
    Neq,
    Gt,
    /// `^`, see [`ComparableVersion::is_weak_gt`].
    WeakGt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Checks `candidate <op> value`.
    #[must_use]
    pub fn check(self, candidate: &ComparableVersion, value: &ComparableVersion) -> bool {
        match self {
            Operator::Eq => candidate.is_eq(value),
            Operator::WeakEq => candidate.is_weak_eq(value),
            Operator::Neq => candidate.is_neq(value),
            Operator::Gt => candidate.is_gt(value),
            Operator::WeakGt => candidate.is_weak_gt(value),
            Operator::Gte => candidate.is_gte(value),
            Operator::Lt => candidate.is_lt(value),
            Operator::Lte => candidate.is_lte(value),
        }
    }

    /// The operator used when turning a "breaks"/"conflicts"
    /// declaration into a constraint the installed version must meet.
    #[must_use]
    pub fn inverse(self) -> Operator {
        match self {
            Operator::Eq | Operator::WeakEq => Operator::Neq,
            Operator::Neq => Operator::Eq,
            Operator::Gt | Operator::WeakGt => Operator::Lte,
            Operator::Lte => Operator::Gt,
            Operator::Gte => Operator::Lt,
            Operator::Lt => Operator::Gte,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Operator::Eq => "=",
                Operator::WeakEq => "~",
                Operator::Neq => "!=",
                Operator::Gt => ">",
                Operator::WeakGt => "^",
                Operator::Gte => ">=",
                Operator::Lt => "<",
                Operator::Lte => "<=",
            }
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConstraint {
    pub value: ComparableVersion,
    pub operator: Operator,
}

impl VersionConstraint {
    #[must_use]
    pub fn new(operator: Operator, value: ComparableVersion) -> Self {
        Self { value, operator }
    }

    #[must_use]
    pub fn is_satisfied_by(&self, candidate: &ComparableVersion) -> bool {
        self.operator.check(candidate, &self.value)
    }
}

impl Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.operator, self.value)
    }
}

/// Alternatives (OR) of groups of constraints (AND).
///
/// An expression without any groups is unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConstraintExpression {
    pub groups: Vec<Vec<VersionConstraint>>,
}

impl ConstraintExpression {
    #[must_use]
    pub fn new(groups: Vec<Vec<VersionConstraint>>) -> Self {
        Self { groups }
    }

    /// An expression with a single AND group.
    #[must_use]
    pub fn all_of(group: Vec<VersionConstraint>) -> Self {
        Self {
            groups: vec![group],
        }
    }

    #[must_use]
    pub fn single(constraint: VersionConstraint) -> Self {
        Self::all_of(vec![constraint])
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.groups.is_empty()
    }

    /// Adds the alternatives of `other` to this one (OR).
    pub fn extend_alternatives(&mut self, other: ConstraintExpression) {
        self.groups.extend(other.groups);
    }

    /// Whether `candidate` satisfies every constraint
    /// of at least one group.
    #[must_use]
    pub fn is_satisfied_by(&self, candidate: &ComparableVersion) -> bool {
        self.is_unconstrained()
            || self
                .groups
                .iter()
                .any(|group| group.iter().all(|n| n.is_satisfied_by(candidate)))
    }

    /// Replaces every operator by its [`Operator::inverse`].
    ///
    /// This is exact for a single constraint. For larger expressions
    /// it is an operator-by-operator rewrite, not a logical negation;
    /// see [`ConstraintExpression::negated`] for that.
    pub fn inverse(&mut self) {
        for constraint in self.groups.iter_mut().flatten() {
            constraint.operator = constraint.operator.inverse();
        }
    }

    /// The expression satisfied by exactly the (comparable)
    /// versions this one rejects. Used for "breaks"/"incompatible"
    /// declarations, where `[1.0,2.0)` must become `<1.0 || >=2.0`.
    ///
    /// Every AND group turns into alternatives of its inverted
    /// constraints, and those are distributed over each other.
    /// An unconstrained expression stays unconstrained.
    #[must_use]
    pub fn negated(&self) -> ConstraintExpression {
        if self.is_unconstrained() {
            return Self::default();
        }
        let mut groups: Vec<Vec<VersionConstraint>> = vec![Vec::new()];
        for group in &self.groups {
            groups = groups
                .iter()
                .flat_map(|prefix| {
                    group.iter().map(move |constraint| {
                        let mut next = prefix.clone();
                        next.push(VersionConstraint::new(
                            constraint.operator.inverse(),
                            constraint.value.clone(),
                        ));
                        next
                    })
                })
                .collect();
        }
        Self { groups }
    }
}

impl Display for ConstraintExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unconstrained() {
            return write!(f, "*");
        }
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, " || ")?;
            }
            for (j, constraint) in group.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{constraint}")?;
            }
        }
        Ok(())
    }
}
