//! # Version model and constraint algebra
//!
//! - [`ComparableVersion`]: a version parsed in one of several
//!   [`Scheme`]s (semver, Minecraft releases, Minecraft snapshots).
//! - [`parse_range`]: turns Maven, npm-style and Fabric range strings
//!   into a [`ConstraintExpression`] (OR of AND groups).
//! - [`Dependency::is_satisfied_by`]: checks a candidate package
//!   against a declared dependency.
//!
//! Nothing here returns errors: bad versions become
//! [`ComparableVersion::INVALID`] and bad ranges become
//! unconstrained (`None`).

mod constraint;
mod package;
mod range;
mod version;

pub use constraint::{ConstraintExpression, Operator, VersionConstraint};
pub use package::{normalize_name, Dependency, Package, PackageId, PackageInformation};
pub use range::{parse_range, Grammar};
pub use version::{ComparableVersion, Scheme};
