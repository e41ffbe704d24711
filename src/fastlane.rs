//! One-time setup of the directories the fastlane `unity_exporter` plugin expects
//!
//! Layout under the project root:
//!
//! ```text
//! fastlane-build-exporter/
//!   Android/
//!     .gitkeep
//!     unity-export/      <- exported project, ignored by git
//!   iOS/
//!     ...
//! ```

use crate::backend::{BuildBackend, BuildOptions, BuildRequest};
use crate::config::Config;
use crate::domain::{BuildReport, Platform};
use crate::error::{BuildExporterError, Result};
use crate::session::{EnvironmentGuard, SessionLock};
use crate::settings::ProjectConfigStore;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const GITKEEP: &str = ".gitkeep";
pub const EXPORT_DIR: &str = "unity-export";
pub const GITIGNORE_MARKER: &str = "# fastlane plugin unity exporter";

/// Lines appended to the project's `.gitignore`, after [GITIGNORE_MARKER].
fn gitignore_entries(base_dir: &str) -> Vec<String> {
    vec![
        format!("{}/*/{}/*", base_dir, EXPORT_DIR),
        format!("{}/*/fastlane/report.xml", base_dir),
        format!("{}/*/.bundle", base_dir),
        format!("{}/**/*.log", base_dir),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldOptions {
    pub project_root: PathBuf,
    pub base_dir: String,
}

impl ScaffoldOptions {
    pub fn from_config(config: &Config, project_root: PathBuf) -> Self {
        ScaffoldOptions {
            project_root,
            base_dir: config.fastlane.base_dir.clone(),
        }
    }

    /// `{project}/{base_dir}/{Platform}`
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.project_root.join(&self.base_dir).join(platform.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldOutcome {
    pub platform: Platform,
    pub directory: PathBuf,
    pub report: BuildReport,
    pub gitignore_updated: bool,
}

/// Create the fastlane directory for `platform` and export an initial project into it.
///
/// `.gitkeep` marks a finished setup and is written last, so a run that
/// fails part way can simply be repeated.
///
/// # Returns
/// * `Ok(ScaffoldOutcome)` - Directory created, export run, ignore rules in place
/// * `Err(Scaffold)` - Platform unavailable on this host, or already initialized
pub fn init_fastlane<S, B>(
    platform: Platform,
    store: &mut S,
    backend: &mut B,
    options: &ScaffoldOptions,
) -> Result<ScaffoldOutcome>
where
    S: ProjectConfigStore + ?Sized,
    B: BuildBackend + ?Sized,
{
    if !platform.available_on_host() {
        return Err(BuildExporterError::scaffold(format!(
            "{} projects cannot be released from this host",
            platform
        )));
    }

    let directory = options.platform_dir(platform);
    let gitkeep = directory.join(GITKEEP);
    if gitkeep.exists() {
        return Err(BuildExporterError::scaffold(format!(
            "fastlane is already initialized for {} ({})",
            platform,
            gitkeep.display()
        )));
    }

    fs::create_dir_all(&directory)?;
    tracing::info!(path = %directory.display(), "created fastlane directory");

    let report = {
        let mut lock = SessionLock::open(&options.project_root)?;
        let _held = lock.try_acquire()?;
        let mut guard = EnvironmentGuard::acquire(store);
        guard.set_active_platform(platform);
        guard.set_selected_group(platform.group());
        guard.set_development(false);
        guard.set_export_as_project(true);
        guard.set_build_app_bundle(false);
        guard.save()?;

        let report = backend.build(&BuildRequest {
            scenes: Vec::new(),
            output_path: directory.join(EXPORT_DIR),
            platform,
            options: BuildOptions {
                development: false,
                export_as_project: true,
                build_app_bundle: false,
            },
        })?;
        tracing::info!(%report, "initial fastlane export finished");
        guard.finish()?;
        report
    };

    let gitignore_updated = append_gitignore(&options.project_root, &options.base_dir)?;
    fs::write(&gitkeep, "")?;

    Ok(ScaffoldOutcome {
        platform,
        directory,
        report,
        gitignore_updated,
    })
}

/// Append the ignore block unless the marker line is already present.
fn append_gitignore(project_root: &Path, base_dir: &str) -> Result<bool> {
    let path = project_root.join(".gitignore");
    let existing = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing.lines().any(|line| line.trim() == GITIGNORE_MARKER) {
        return Ok(false);
    }

    let mut block = String::new();
    if !existing.is_empty() {
        if !existing.ends_with('\n') {
            block.push('\n');
        }
        block.push('\n');
    }
    block.push_str(GITIGNORE_MARKER);
    block.push('\n');
    for entry in gitignore_entries(base_dir) {
        block.push_str(&entry);
        block.push('\n');
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(block.as_bytes())?;
    tracing::info!(path = %path.display(), "updated .gitignore");
    Ok(true)
}
