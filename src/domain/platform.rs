use serde::{Deserialize, Serialize};
use std::fmt;

/// Build targets the exporter knows how to drive.
///
/// Platform-specific behavior is expressed as capability methods so that a
/// new target only needs new match arms here, not new branches in the
/// session logic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Name used in paths and logs, matching the engine's target names.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }

    /// Settings group the target belongs to.
    pub fn group(&self) -> PlatformGroup {
        match self {
            Platform::Android => PlatformGroup::Android,
            Platform::Ios => PlatformGroup::Ios,
        }
    }

    /// Whether a second backend pass produces a distributable archive next to the exported project.
    pub fn supports_secondary_archive_pass(&self) -> bool {
        match self {
            Platform::Android => true,
            Platform::Ios => false,
        }
    }

    /// File extension of the secondary archive, if the platform has one.
    pub fn archive_extension(&self) -> Option<&'static str> {
        match self {
            Platform::Android => Some("aab"),
            Platform::Ios => None,
        }
    }

    /// Whether release tooling for this target can run on the current host.
    ///
    /// iOS projects can only be finished on macOS. Android exports run
    /// anywhere the engine runs, Linux build agents included.
    pub fn available_on_host(&self) -> bool {
        match self {
            Platform::Android => true,
            Platform::Ios => cfg!(target_os = "macos"),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Group under which per-platform settings (define symbols, scripting backend) are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformGroup {
    Android,
    Ios,
    Standalone,
}

impl PlatformGroup {
    /// Key used in the persisted settings tables.
    pub fn key(&self) -> &'static str {
        match self {
            PlatformGroup::Android => "android",
            PlatformGroup::Ios => "ios",
            PlatformGroup::Standalone => "standalone",
        }
    }
}

impl fmt::Display for PlatformGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptingBackend {
    #[default]
    Mono,
    Il2cpp,
}

impl fmt::Display for ScriptingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptingBackend::Mono => f.write_str("mono"),
            ScriptingBackend::Il2cpp => f.write_str("il2cpp"),
        }
    }
}
