//! Domain logic - pure values and rules independent of the project files and the backend

pub mod build_number;
pub mod platform;
pub mod report;
pub mod scene;
pub mod spec;
pub mod version;

pub use build_number::BuildNumber;
pub use platform::{Platform, PlatformGroup, ScriptingBackend};
pub use report::BuildReport;
pub use scene::{collect_scenes, Scene};
pub use spec::{BuildNumberSpec, VersionSpec};
pub use version::{SemanticVersion, VersionBump, VersionParseError};
