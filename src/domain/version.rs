use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Failure to read a `major.minor.patch` triple out of a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{input}' is not a valid semantic version: {reason}")]
pub struct VersionParseError {
    pub input: String,
    pub reason: &'static str,
}

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(-?\d+)\.(-?\d+)\.(-?\d+)").expect("static pattern is valid"))
}

impl SemanticVersion {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
        }
    }

    /// Parse the first `major.minor.patch` triple found in `text`.
    ///
    /// The match is not anchored, so `"v1.2.3-beta"` yields `1.2.3`. Inputs
    /// with fewer than three numeric groups (`"1.1"`), a negative group
    /// (`"0.0.-1"`, `"-1.0.0"`) or a group above `u32::MAX` are rejected.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let captures = version_pattern()
            .captures(text)
            .ok_or_else(|| VersionParseError {
                input: text.to_string(),
                reason: "expected {major}.{minor}.{patch}",
            })?;

        let group = |i: usize| -> Result<u32, VersionParseError> {
            captures[i].parse::<u32>().map_err(|_| VersionParseError {
                input: text.to_string(),
                reason: "components must be unsigned 32-bit integers",
            })
        };

        Ok(SemanticVersion {
            major: group(1)?,
            minor: group(2)?,
            patch: group(3)?,
        })
    }

    /// Increment exactly one component by one.
    ///
    /// Lower-order components are left as they are: bumping `major` on
    /// `1.2.3` gives `2.2.3`, not `2.0.0`. Saturates at `u32::MAX`; use
    /// [`SemanticVersion::checked_bump`] to detect that case.
    pub fn bump(&self, component: VersionBump) -> Self {
        let mut next = *self;
        match component {
            VersionBump::Major => next.major = self.major.saturating_add(1),
            VersionBump::Minor => next.minor = self.minor.saturating_add(1),
            VersionBump::Patch => next.patch = self.patch.saturating_add(1),
        }
        next
    }

    /// Like [`SemanticVersion::bump`] but `None` when the component would overflow.
    pub fn checked_bump(&self, component: VersionBump) -> Option<Self> {
        let mut next = *self;
        match component {
            VersionBump::Major => next.major = self.major.checked_add(1)?,
            VersionBump::Minor => next.minor = self.minor.checked_add(1)?,
            VersionBump::Patch => next.patch = self.patch.checked_add(1)?,
        }
        Some(next)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticVersion::parse(s)
    }
}

/// Which version component a bump keyword selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        }
    }
}

impl FromStr for VersionBump {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            _ => Err(()),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
