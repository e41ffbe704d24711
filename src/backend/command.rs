use crate::backend::{BuildBackend, BuildRequest};
use crate::config::BackendConfig;
use crate::domain::BuildReport;
use crate::error::{BuildExporterError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Runs the engine's command line build for each pass.
///
/// Arguments from [BackendConfig] have `{project}`, `{output}`,
/// `{platform}` and `{scenes}` substituted; the same values are also
/// passed as `BUILD_EXPORTER_*` environment variables for build scripts
/// that prefer them.
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    project_root: PathBuf,
}

impl CommandBackend {
    pub fn new(config: &BackendConfig, project_root: impl Into<PathBuf>) -> Self {
        CommandBackend {
            program: config.program.clone(),
            args: config.args.clone(),
            project_root: project_root.into(),
        }
    }

    fn substitute(&self, arg: &str, request: &BuildRequest) -> String {
        arg.replace("{project}", &self.project_root.display().to_string())
            .replace("{output}", &request.output_path.display().to_string())
            .replace("{platform}", request.platform.name())
            .replace("{scenes}", &request.scenes.join(";"))
    }

    fn env_vars(&self, request: &BuildRequest) -> Vec<(&'static str, String)> {
        vec![
            (
                "BUILD_EXPORTER_PROJECT",
                self.project_root.display().to_string(),
            ),
            (
                "BUILD_EXPORTER_OUTPUT",
                request.output_path.display().to_string(),
            ),
            ("BUILD_EXPORTER_PLATFORM", request.platform.name().to_string()),
            ("BUILD_EXPORTER_SCENES", request.scenes.join(";")),
            (
                "BUILD_EXPORTER_DEVELOPMENT",
                request.options.development.to_string(),
            ),
            (
                "BUILD_EXPORTER_EXPORT_AS_PROJECT",
                request.options.export_as_project.to_string(),
            ),
            (
                "BUILD_EXPORTER_BUILD_APP_BUNDLE",
                request.options.build_app_bundle.to_string(),
            ),
        ]
    }
}

/// Errors the engine wrote to stderr; a failed exit always counts as at least one.
fn count_errors(stderr: &str, success: bool) -> u32 {
    let counted = stderr
        .lines()
        .filter(|line| line.to_lowercase().contains("error"))
        .count() as u32;
    if success {
        counted
    } else {
        counted.max(1)
    }
}

fn report_name(output: &Path) -> String {
    output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string())
}

impl BuildBackend for CommandBackend {
    fn build(&mut self, request: &BuildRequest) -> Result<BuildReport> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| self.substitute(arg, request))
            .collect();

        let mut cmd = Command::new(&self.program);
        cmd.args(&args).current_dir(&self.project_root);
        for (key, value) in self.env_vars(request) {
            cmd.env(key, value);
        }

        tracing::info!(program = %self.program, ?args, "running build backend");
        let started = Instant::now();
        let output = cmd.output().map_err(|e| {
            BuildExporterError::backend(format!("Failed to execute {}: {}", self.program, e))
        })?;
        let elapsed = started.elapsed();

        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_count = count_errors(&stderr, output.status.success());
        if error_count > 0 {
            tracing::warn!(
                exit_code = output.status.code().unwrap_or(-1),
                stderr = %stderr.trim(),
                "build backend reported errors"
            );
        }

        Ok(BuildReport {
            name: report_name(&request.output_path),
            output_path: request.output_path.clone(),
            elapsed,
            error_count,
        })
    }
}
