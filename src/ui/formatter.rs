//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Styling goes through `console`, which drops colors when output is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::SessionOutcome;
use crate::domain::{BuildReport, Platform};
use crate::session::EnvironmentSnapshot;
use std::path::Path;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One line per backend pass; failed passes are marked.
pub fn format_report(report: &BuildReport) -> String {
    if report.succeeded() {
        format!("{} {}", style("✓").green(), report)
    } else {
        format!("{} {}", style("✗").red(), report)
    }
}

pub fn display_report(report: &BuildReport) {
    println!("{}", format_report(report));
}

/// Version line shown before and after a session, e.g. `1.2.0 (build 14)`.
pub fn format_stamp(version: &str, build_number: &str) -> String {
    format!("{} (build {})", version, build_number)
}

/// Display the proposed version change.
///
/// # Arguments
/// * `current` - Persisted version line, if it could be read
/// * `outcome` - Resolved session plan or result
pub fn display_stamp(current: Option<&str>, outcome: &SessionOutcome) {
    let next = format_stamp(
        &outcome.version.to_string(),
        &outcome.build_number.to_string(),
    );
    println!("\n{}", style("Release version:").bold());
    if let Some(current) = current {
        println!("  From: {}", style(current).red());
    }
    println!("  To:   {}", style(next).green());
    match &outcome.export_path {
        Some(path) => println!("  Export: {}", path.display()),
        None => println!("  Export: {}", style("none (stamp only)").dim()),
    }
}

/// Summary printed after a session finished.
pub fn display_outcome(outcome: &SessionOutcome) {
    for warning in &outcome.warnings {
        display_boundary_warning(warning);
    }
    for report in &outcome.reports {
        display_report(report);
    }

    let stamp = format_stamp(
        &outcome.version.to_string(),
        &outcome.build_number.to_string(),
    );
    if outcome.dry_run {
        display_status(&format!("Dry run: would stamp {}", stamp));
    } else if outcome.has_backend_errors() {
        display_error(&format!("Build finished with errors for {}", stamp));
    } else {
        display_success(&format!("Stamped {}", stamp));
    }
}

/// Display the persisted version fields and the build environment.
pub fn display_project_settings(
    settings_file: &Path,
    version: &str,
    android_code: i64,
    ios_build: &str,
    snapshot: &EnvironmentSnapshot,
) {
    println!("{} {}", style("Project settings:").bold(), settings_file.display());
    println!("  bundle_version:       {}", version);
    println!("  android.version_code: {}", android_code);
    println!("  ios.build_number:     {}", ios_build);
    println!("{}", style("Build environment:").bold());
    println!("  platform:          {}", snapshot.active_platform);
    println!("  group:             {}", snapshot.platform_group);
    println!("  define_symbols:    {}", snapshot.define_symbols);
    println!("  development:       {}", snapshot.development);
    println!("  export_as_project: {}", snapshot.export_as_project);
    println!("  build_app_bundle:  {}", snapshot.build_app_bundle);
    println!("  scripting_backend: {}", snapshot.scripting_backend);
    println!("  preloaded_assets:  {}", snapshot.preloaded_assets.join(", "));
}

/// Follow-up commands after `init-fastlane`.
pub fn format_fastlane_next_steps(platform: Platform, directory: &Path) -> Vec<String> {
    vec![
        format!(
            "Commit {} so the fastlane directories are tracked by git",
            directory.join(".gitkeep").display()
        ),
        format!("cd {} && fastlane init", directory.display()),
        "fastlane add_plugin unity_exporter".to_string(),
        format!(
            "See https://docs.fastlane.tools/getting-started/{}/setup/",
            platform.name().to_lowercase()
        ),
    ]
}

pub fn display_fastlane_next_steps(platform: Platform, directory: &Path) {
    println!("\n{}", style("Next steps:").bold());
    for (i, step) in format_fastlane_next_steps(platform, directory)
        .iter()
        .enumerate()
    {
        println!("  {}. {}", i + 1, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report(error_count: u32) -> BuildReport {
        BuildReport {
            name: "Android-export".to_string(),
            output_path: PathBuf::from("/out"),
            elapsed: Duration::from_secs(75),
            error_count,
        }
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        // Visual verification test - output is printed to stdout
        display_success("test success");
    }

    #[test]
    fn test_format_report_keeps_summary() {
        let line = console::strip_ansi_codes(&format_report(&report(0))).into_owned();
        assert!(line.contains("Android-export, Path /out, Time 1:15, Number of errors 0"));

        let failed = console::strip_ansi_codes(&format_report(&report(2))).into_owned();
        assert!(failed.starts_with("✗"));
    }

    #[test]
    fn test_format_stamp() {
        assert_eq!(format_stamp("1.2.0", "14"), "1.2.0 (build 14)");
    }

    #[test]
    fn test_fastlane_next_steps() {
        let steps = format_fastlane_next_steps(Platform::Ios, Path::new("/p/fl/iOS"));
        assert!(steps.iter().any(|s| s.ends_with("fastlane init")));
        assert!(steps.contains(&"fastlane add_plugin unity_exporter".to_string()));
        assert!(steps.iter().any(|s| s.contains("getting-started/ios/")));
    }
}
