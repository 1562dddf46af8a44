//! Dialect capability gate.
//!
//! A static table maps each supported dialect to the oldest server version
//! that can run its hierarchical idiom, and to the emitter that writes it.
//! The table is read-only; lookups are safe from any thread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::emit::connect_by::ConnectByEmitter;
use super::emit::recursive_cte::RecursiveCteEmitter;
use super::emit::HierarchyEmitter;
use super::error::{HierarchyError, HierarchyResult};
use crate::sql::dialect::Dialect;

/// A `major.minor.patch` server version.
///
/// Ordering is lexicographic over the triple, so `8.4.0 < 8.10.0 < 9.0.0`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Failure to parse a version string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version {input:?}: expected MAJOR[.MINOR[.PATCH]]")]
pub struct VersionParseError {
    pub input: String,
}

impl FromStr for Version {
    type Err = VersionParseError;

    /// Accepts one to three dot-separated integers; missing parts are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };

        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [major] => Ok(Version::new(*major, 0, 0)),
            [major, minor] => Ok(Version::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Version::new(*major, *minor, *patch)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

/// One row of the capability table.
#[derive(Debug)]
pub struct Capability {
    /// Canonical dialect name, as reported by connection layers.
    pub name: &'static str,
    pub dialect: Dialect,
    pub min_version: Version,
    pub emitter: &'static dyn HierarchyEmitter,
}

/// Supported dialects. Adding a dialect means adding a `Dialect` variant,
/// an emitter and one row here.
pub static CAPABILITIES: &[Capability] = &[
    Capability {
        name: "postgresql",
        dialect: Dialect::Postgres,
        min_version: Version::new(8, 4, 0),
        emitter: &RecursiveCteEmitter,
    },
    Capability {
        name: "oracle",
        dialect: Dialect::Oracle,
        min_version: Version::new(10, 0, 0),
        emitter: &ConnectByEmitter,
    },
];

/// Capability row for a dialect, if it has one.
pub fn capability_for(dialect: Dialect) -> Option<&'static Capability> {
    CAPABILITIES.iter().find(|c| c.dialect == dialect)
}

/// Validate a dialect name and server version against the capability table.
pub fn check_dialect(name: &str, version: Version) -> HierarchyResult<&'static Capability> {
    let Some(dialect) = Dialect::from_name(name) else {
        log::debug!("rejecting unknown dialect {name:?}");
        return Err(HierarchyError::UnsupportedDialect {
            dialect: name.to_string(),
        });
    };
    check(dialect, version)
}

/// Validate a known dialect and server version against the capability table.
pub fn check(dialect: Dialect, version: Version) -> HierarchyResult<&'static Capability> {
    let capability = capability_for(dialect).ok_or_else(|| HierarchyError::UnsupportedDialect {
        dialect: dialect.to_string(),
    })?;

    if version < capability.min_version {
        log::debug!(
            "rejecting {} {version}: requires {}",
            capability.name,
            capability.min_version
        );
        return Err(HierarchyError::DialectVersionTooLow {
            dialect: capability.name.to_string(),
            required: capability.min_version,
            actual: version,
        });
    }

    log::debug!("admitted {} {version}", capability.name);
    Ok(capability)
}
