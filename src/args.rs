//! Build invocation arguments
//!
//! [BuildArgs] is the raw flag surface of the `build` subcommand.
//! [BuildConfig] is what a session actually runs with: the export path made
//! absolute and the version inputs classified. Neither step validates the
//! version values themselves; that is the resolver's job.

use crate::config::ExportConfig;
use crate::domain::{BuildNumberSpec, Platform, VersionSpec};
use crate::error::{BuildExporterError, Result};
use clap::Parser;
use std::path::{Component, Path, PathBuf};

/// Flags accepted by `build`.
///
/// Every flag may be given at most once; clap rejects repeats, unknown
/// flags and flags missing their value.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Directory the exported project is written to
    #[arg(long, value_name = "PATH")]
    pub export_path: Option<PathBuf>,

    /// New version: major, minor, patch, or an explicit major.minor.patch
    #[arg(long, value_name = "SPEC", allow_negative_numbers = true)]
    pub new_version: Option<String>,

    /// New build number: 'increment' or a non-negative integer
    #[arg(long, value_name = "SPEC", allow_negative_numbers = true)]
    pub new_version_code: Option<String>,

    /// Non-interactive invocation from a release script
    #[arg(long, visible_alias = "batchmode")]
    pub batch_mode: bool,

    /// Resolve and report the new version without touching the project
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
#[command(name = "build", no_binary_name = true, disable_help_flag = true)]
struct BuildTokens {
    #[command(flatten)]
    args: BuildArgs,
}

/// Parse `build` flags from a raw token list, e.g. one forwarded by a
/// release script that does not go through the main command line.
///
/// # Returns
/// * `Ok(BuildArgs)` - Parsed flags
/// * `Err` - `Argument` error with a one-line message naming the bad flag
pub fn parse_build_tokens<I, T>(tokens: I) -> Result<BuildArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    BuildTokens::try_parse_from(tokens)
        .map(|parsed| parsed.args)
        .map_err(|e| BuildExporterError::argument(first_error_line(&e.to_string())))
}

fn first_error_line(rendered: &str) -> String {
    let line = rendered
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or(rendered)
        .trim();
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}

/// Immutable per-invocation build settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Absolute, normalized export directory; `None` means stamp only.
    pub export_path: Option<PathBuf>,
    pub version_spec: VersionSpec,
    pub build_number_spec: BuildNumberSpec,
    pub batch_mode: bool,
    pub dry_run: bool,
}

impl BuildConfig {
    /// Turn parsed flags into the settings a session runs with.
    ///
    /// A relative `--export-path` is resolved against `cwd`. Without one,
    /// interactive runs export to `{project_root}/{default_dir}/{Platform}{suffix}`
    /// while batch runs only stamp the version.
    pub fn resolve(
        args: &BuildArgs,
        cwd: &Path,
        project_root: &Path,
        platform: Platform,
        export: &ExportConfig,
    ) -> Self {
        let explicit = args
            .export_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| normalize(&cwd.join(p)));

        let export_path = match explicit {
            Some(path) => Some(path),
            None if args.batch_mode => None,
            None => Some(normalize(
                &project_root
                    .join(&export.default_dir)
                    .join(format!("{}{}", platform.name(), export.suffix)),
            )),
        };

        BuildConfig {
            export_path,
            version_spec: VersionSpec::from_raw(args.new_version.as_deref()),
            build_number_spec: BuildNumberSpec::from_raw(args.new_version_code.as_deref()),
            batch_mode: args.batch_mode,
            dry_run: args.dry_run,
        }
    }
}

/// Fold `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
