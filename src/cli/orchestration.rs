//! Build session orchestration
//!
//! A session runs through these states:
//!
//! ```text
//! Idle -> Validating -> Snapshotting -> Mutating -> BuildingPrimary
//!      -> [BuildingSecondary] -> Restoring -> Done
//! ```
//!
//! `Failed` is only reachable from `Validating`, before anything has been
//! touched. Once `Snapshotting` is reached the [EnvironmentGuard] owns the
//! environment, so every later exit (backend `Err`, I/O error, panic) still
//! passes through `Restoring`.

use std::fmt;
use std::path::PathBuf;

use crate::args::{BuildArgs, BuildConfig};
use crate::backend::{BuildBackend, BuildOptions, BuildRequest};
use crate::boundary::BoundaryWarning;
use crate::config::{Config, ExportConfig};
use crate::domain::{collect_scenes, BuildNumber, BuildReport, Platform, SemanticVersion};
use crate::error::Result;
use crate::resolver::{self, StampedVersion};
use crate::session::{EnvironmentGuard, SessionLock};
use crate::settings::ProjectConfigStore;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Validating,
    Snapshotting,
    Mutating,
    BuildingPrimary,
    BuildingSecondary,
    Restoring,
    Done,
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Validating => "validating",
            SessionState::Snapshotting => "snapshotting",
            SessionState::Mutating => "mutating",
            SessionState::BuildingPrimary => "building-primary",
            SessionState::BuildingSecondary => "building-secondary",
            SessionState::Restoring => "restoring",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Invocation context that does not come from the build flags
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Directory relative export paths are resolved against
    pub cwd: PathBuf,
    /// Project root; holds the session lock and the default export directory
    pub project_root: PathBuf,
    pub export: ExportConfig,
    pub exclude_keywords: Vec<String>,
}

impl SessionOptions {
    pub fn from_config(config: &Config, cwd: PathBuf, project_root: PathBuf) -> Self {
        SessionOptions {
            cwd,
            project_root,
            export: config.export.clone(),
            exclude_keywords: config.scenes.exclude_keywords.clone(),
        }
    }
}

/// Result of a session that got past validation
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub version: SemanticVersion,
    pub build_number: BuildNumber,
    pub export_path: Option<PathBuf>,
    /// One report per backend pass, in call order
    pub reports: Vec<BuildReport>,
    pub warnings: Vec<BoundaryWarning>,
    pub dry_run: bool,
    /// Every state the session passed through
    pub states: Vec<SessionState>,
}

impl SessionOutcome {
    /// Whether any backend pass reported errors
    pub fn has_backend_errors(&self) -> bool {
        self.reports.iter().any(|r| !r.succeeded())
    }
}

struct StateTrail(Vec<SessionState>);

impl StateTrail {
    fn new() -> Self {
        StateTrail(vec![SessionState::Idle])
    }

    fn enter(&mut self, state: SessionState) {
        tracing::info!(%state, "build session");
        self.0.push(state);
    }
}

/// Run one build session against `store` and `backend`.
///
/// # Returns
/// * `Ok(SessionOutcome)` - The session ran; backend-reported errors are in
///   the reports, not an `Err`
/// * `Err(Validation | Argument)` - Refused to start, nothing was mutated
/// * `Err(..)` - Failed after mutation began; the environment was restored
pub fn run_build_session<S, B>(
    args: &BuildArgs,
    store: &mut S,
    backend: &mut B,
    options: &SessionOptions,
) -> Result<SessionOutcome>
where
    S: ProjectConfigStore + ?Sized,
    B: BuildBackend + ?Sized,
{
    let mut trail = StateTrail::new();

    trail.enter(SessionState::Validating);
    let platform = store.active_platform();
    let config = BuildConfig::resolve(
        args,
        &options.cwd,
        &options.project_root,
        platform,
        &options.export,
    );
    let resolved = resolver::validate_persisted(&*store).and_then(|state| {
        resolver::resolve(&state, &config.version_spec, &config.build_number_spec)
            .map(|stamp| (state, stamp))
    });
    let (state, stamp) = match resolved {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "build session refused to start");
            trail.enter(SessionState::Failed);
            return Err(e.into());
        }
    };

    let mut warnings = stamp.warnings(&state);
    if config.export_path.is_none() {
        warnings.push(BoundaryWarning::StampOnly);
    }
    for warning in &warnings {
        tracing::warn!(%warning, "build session");
    }

    if config.dry_run {
        tracing::info!(
            version = %stamp.version,
            build_number = %stamp.build_number,
            "dry run, leaving project untouched"
        );
        trail.enter(SessionState::Done);
        return Ok(outcome(stamp, config, Vec::new(), warnings, trail));
    }

    let mut lock = SessionLock::open(&options.project_root)?;
    let _held = lock.try_acquire()?;

    trail.enter(SessionState::Snapshotting);
    let mut guard = EnvironmentGuard::acquire(store);

    trail.enter(SessionState::Mutating);
    guard.set_development(false);
    guard.set_export_as_project(true);
    stamp.apply(&mut *guard);
    guard.save()?;
    tracing::info!(
        version = %stamp.version,
        build_number = %stamp.build_number,
        "stamped project version"
    );

    let scenes = collect_scenes(&guard.scenes(), &options.exclude_keywords);
    tracing::info!(?scenes, "collected scenes");
    if scenes.is_empty() {
        tracing::warn!("no scenes left after filtering");
        warnings.push(BoundaryWarning::NoScenes);
    }

    let mut reports = Vec::new();
    if let Some(export_path) = &config.export_path {
        std::fs::create_dir_all(export_path)?;

        trail.enter(SessionState::BuildingPrimary);
        let report = backend.build(&BuildRequest {
            scenes: scenes.clone(),
            output_path: export_path.clone(),
            platform,
            options: current_options(&*guard),
        })?;
        tracing::info!(%report, "primary build finished");
        reports.push(report);

        if platform.supports_secondary_archive_pass() {
            trail.enter(SessionState::BuildingSecondary);
            guard.set_export_as_project(false);
            guard.set_build_app_bundle(true);
            guard.save()?;

            let archive = export_path.join(archive_file_name(&stamp, platform));
            let report = backend.build(&BuildRequest {
                scenes,
                output_path: archive,
                platform,
                options: current_options(&*guard),
            })?;
            tracing::info!(%report, "archive build finished");
            reports.push(report);
        }
    }

    trail.enter(SessionState::Restoring);
    guard.finish()?;

    trail.enter(SessionState::Done);
    Ok(outcome(stamp, config, reports, warnings, trail))
}

/// `{version}-{build}.{ext}`
fn archive_file_name(stamp: &StampedVersion, platform: Platform) -> String {
    match platform.archive_extension() {
        Some(extension) => format!("{}-{}.{}", stamp.version, stamp.build_number, extension),
        None => format!("{}-{}", stamp.version, stamp.build_number),
    }
}

fn current_options<S: ProjectConfigStore + ?Sized>(store: &S) -> BuildOptions {
    BuildOptions {
        development: store.development(),
        export_as_project: store.export_as_project(),
        build_app_bundle: store.build_app_bundle(),
    }
}

fn outcome(
    stamp: StampedVersion,
    config: BuildConfig,
    reports: Vec<BuildReport>,
    warnings: Vec<BoundaryWarning>,
    trail: StateTrail,
) -> SessionOutcome {
    SessionOutcome {
        version: stamp.version,
        build_number: stamp.build_number,
        export_path: config.export_path,
        reports,
        warnings,
        dry_run: config.dry_run,
        states: trail.0,
    }
}
