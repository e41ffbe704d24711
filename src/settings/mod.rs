//! Persisted project configuration
//!
//! The session never touches project files directly. Everything it reads
//! or writes goes through the [ProjectConfigStore] trait, so the same
//! session code runs against the on-disk settings file and against an
//! in-memory double in tests.
//!
//! - [file::FileProjectStore]: TOML-backed settings file inside the project
//! - [memory::MemoryProjectStore]: in-memory store for tests
//!
//! Setters only change the store's in-memory view; [ProjectConfigStore::save]
//! makes the changes visible to the build backend.

pub mod file;
pub mod memory;

pub use file::FileProjectStore;
pub use memory::MemoryProjectStore;

use crate::domain::{Platform, PlatformGroup, Scene, ScriptingBackend};
use crate::error::Result;

/// Read/write access to the persisted project configuration.
///
/// ## Field ownership
///
/// Version fields (`bundle_version`, `android_version_code`,
/// `ios_build_number`) are stamped by a session and persist afterwards.
/// Environment fields (platform, define symbols, flags, scripting backend,
/// preloaded assets) are captured before a session mutates them and must
/// be restored verbatim when it ends.
///
/// ## Raw values
///
/// Version fields are returned exactly as persisted, without validation.
/// The Android version code is signed and the iOS build number is free
/// text because that is how the engine stores them; validation is the
/// resolver's job.
pub trait ProjectConfigStore {
    /// Application version string, expected to hold `major.minor.patch`.
    fn bundle_version(&self) -> String;
    fn set_bundle_version(&mut self, version: &str);

    /// Android `versionCode`.
    fn android_version_code(&self) -> i64;
    fn set_android_version_code(&mut self, code: i64);

    /// iOS `CFBundleVersion`.
    fn ios_build_number(&self) -> String;
    fn set_ios_build_number(&mut self, build_number: &str);

    fn active_platform(&self) -> Platform;
    fn set_active_platform(&mut self, platform: Platform);

    fn selected_group(&self) -> PlatformGroup;
    fn set_selected_group(&mut self, group: PlatformGroup);

    /// Scripting define symbols for a settings group, `;`-separated.
    fn define_symbols(&self, group: PlatformGroup) -> String;
    fn set_define_symbols(&mut self, group: PlatformGroup, symbols: &str);

    fn development(&self) -> bool;
    fn set_development(&mut self, enabled: bool);

    /// Hand back a buildable project instead of a finished package.
    fn export_as_project(&self) -> bool;
    fn set_export_as_project(&mut self, enabled: bool);

    /// Produce an app bundle archive (Android `.aab`).
    fn build_app_bundle(&self) -> bool;
    fn set_build_app_bundle(&mut self, enabled: bool);

    fn scripting_backend(&self, group: PlatformGroup) -> ScriptingBackend;
    fn set_scripting_backend(&mut self, group: PlatformGroup, backend: ScriptingBackend);

    /// Assets loaded at startup. Engine plugins rewrite this list during builds.
    fn preloaded_assets(&self) -> Vec<String>;
    fn set_preloaded_assets(&mut self, assets: Vec<String>);

    /// The scene registry in build order.
    fn scenes(&self) -> Vec<Scene>;

    /// Persist pending changes.
    fn save(&mut self) -> Result<()>;
}
