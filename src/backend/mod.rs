//! Build backend abstraction
//!
//! The session never compiles anything itself. It hands a [BuildRequest]
//! to a [BuildBackend] and gets a [BuildReport](crate::domain::BuildReport)
//! back. Implementations:
//!
//! - [command::CommandBackend]: runs the configured engine command line
//! - [mock::RecordingBackend]: records requests and returns scripted reports
//!
//! # Failure model
//!
//! A backend that ran but reported errors returns `Ok` with a non-zero
//! `error_count`; the session carries on and restores normally. `Err` is
//! reserved for a backend that could not run at all.

pub mod command;
pub mod mock;

pub use command::CommandBackend;
pub use mock::RecordingBackend;

use crate::domain::{BuildReport, Platform};
use crate::error::Result;
use std::path::PathBuf;

/// Build settings in effect for one backend pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub development: bool,
    pub export_as_project: bool,
    pub build_app_bundle: bool,
}

/// Everything a backend needs for one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Scene paths in build order
    pub scenes: Vec<String>,
    pub output_path: PathBuf,
    pub platform: Platform,
    pub options: BuildOptions,
}

/// External build step
pub trait BuildBackend {
    /// Run one build pass.
    ///
    /// # Returns
    /// * `Ok(BuildReport)` - The backend ran; check `error_count` for failures
    /// * `Err` - The backend could not be started or crashed
    fn build(&mut self, request: &BuildRequest) -> Result<BuildReport>;
}
