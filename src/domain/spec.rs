//! Interpretation of the raw `--new-version` / `--new-version-code` values.
//!
//! Classification never fails here; literal values are checked by the
//! resolver so that every rejection is reported the same way.

use crate::domain::version::VersionBump;

/// What the caller asked to happen to the semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSpec {
    /// No value given; keep the persisted version.
    #[default]
    Unchanged,
    Bump(VersionBump),
    /// Anything that is not a keyword; must parse as `major.minor.patch`.
    Explicit(String),
}

impl VersionSpec {
    /// A bump keyword wins over literal parsing, so `"Major"` is never read as a version.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => VersionSpec::Unchanged,
            Some(text) if text.is_empty() => VersionSpec::Unchanged,
            Some(text) => match text.parse::<VersionBump>() {
                Ok(bump) => VersionSpec::Bump(bump),
                Err(()) => VersionSpec::Explicit(text.to_string()),
            },
        }
    }
}

/// What the caller asked to happen to the build number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildNumberSpec {
    #[default]
    Unchanged,
    /// The literal token `increment` (case-sensitive).
    Increment,
    Explicit(String),
}

pub const INCREMENT_TOKEN: &str = "increment";

impl BuildNumberSpec {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => BuildNumberSpec::Unchanged,
            Some(text) if text.is_empty() => BuildNumberSpec::Unchanged,
            Some(INCREMENT_TOKEN) => BuildNumberSpec::Increment,
            Some(text) => BuildNumberSpec::Explicit(text.to_string()),
        }
    }
}
