// tests/integration_test.rs
use build_exporter::args::BuildArgs;
use build_exporter::backend::RecordingBackend;
use build_exporter::cli::{run_build_session, SessionOptions};
use build_exporter::config::{load_config, Config};
use build_exporter::settings::file::ProjectSettings;
use build_exporter::settings::FileProjectStore;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// absolute, since the #[serial] tests below move the working directory
const FIXTURE_SETTINGS: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/BuildSettings.toml"
);

/// A project directory holding a copy of the fixture settings file.
fn project_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join(Config::default().project.settings_file);
    fs::create_dir_all(settings.parent().unwrap()).unwrap();
    fs::copy(FIXTURE_SETTINGS, &settings).unwrap();
    (dir, settings)
}

fn read_settings(path: &Path) -> ProjectSettings {
    toml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn build_exporter(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_build-exporter"))
        .arg("--project")
        .arg(project)
        .args(args)
        .env_remove("BUILD_EXPORTER_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_build_exporter_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_build-exporter"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("build-exporter"));
    assert!(stdout.contains("init-fastlane"));
}

#[test]
fn test_build_exporter_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_build-exporter"))
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_session_against_settings_file() {
    let (dir, settings_path) = project_dir();
    let export = dir.path().join("out");
    let mut store = FileProjectStore::open(&settings_path).unwrap();
    let mut backend = RecordingBackend::new();
    let options = SessionOptions::from_config(
        &Config::default(),
        dir.path().to_path_buf(),
        dir.path().to_path_buf(),
    );
    let args = BuildArgs {
        export_path: Some(export.clone()),
        new_version: Some("minor".to_string()),
        new_version_code: Some("increment".to_string()),
        batch_mode: true,
        dry_run: false,
    };

    let outcome = run_build_session(&args, &mut store, &mut backend, &options).unwrap();

    assert_eq!(outcome.version.to_string(), "1.5.2");
    assert_eq!(backend.calls(), 2);
    assert_eq!(backend.requests[0].scenes, vec!["Assets/Scenes/Main.unity"]);
    assert_eq!(backend.requests[1].output_path, export.join("1.5.2-12.aab"));

    let persisted = read_settings(&settings_path);
    assert_eq!(persisted.bundle_version, "1.5.2");
    assert_eq!(persisted.android.version_code, 12);
    assert_eq!(persisted.ios.build_number, "12");
    assert!(persisted.development);
    assert!(!persisted.export_as_project);
    assert!(!persisted.build_app_bundle);
    assert_eq!(persisted.define_symbols["android"], "RELEASE;ANALYTICS");
    assert_eq!(persisted.preloaded_assets, vec!["XRSettings"]);
}

#[test]
fn test_show_prints_persisted_fields() {
    let (dir, _) = project_dir();
    let output = build_exporter(dir.path(), &["show"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1.4.2"));
    assert!(stdout.contains("RELEASE;ANALYTICS"));
}

#[test]
fn test_invalid_version_exits_with_2_and_leaves_file_untouched() {
    let (dir, settings_path) = project_dir();
    let before = fs::read_to_string(&settings_path).unwrap();

    let output = build_exporter(
        dir.path(),
        &["build", "--batch-mode", "--new-version", "1.1"],
    );

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Cannot parse new version '1.1'"));
    assert_eq!(fs::read_to_string(&settings_path).unwrap(), before);
}

#[test]
fn test_duplicate_flag_exits_with_2() {
    let (dir, _) = project_dir();
    let output = build_exporter(
        dir.path(),
        &["build", "--batch-mode", "--new-version", "major", "--new-version", "minor"],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_batch_stamp_only_run() {
    let (dir, settings_path) = project_dir();
    let output = build_exporter(
        dir.path(),
        &["build", "--batchmode", "--new-version", "patch", "--new-version-code", "20"],
    );

    assert!(output.status.success(), "{:?}", output);
    let persisted = read_settings(&settings_path);
    assert_eq!(persisted.bundle_version, "1.4.3");
    assert_eq!(persisted.android.version_code, 20);
    assert_eq!(persisted.ios.build_number, "20");
}

#[cfg(unix)]
#[test]
fn test_build_with_command_backend() {
    let (dir, settings_path) = project_dir();
    let config_path = dir.path().join("tool.toml");
    fs::write(
        &config_path,
        r#"
[backend]
program = "sh"
args = ["-c", "mkdir -p \"$BUILD_EXPORTER_OUTPUT\" && echo {scenes} > \"$BUILD_EXPORTER_OUTPUT/scenes.txt\""]
"#,
    )
    .unwrap();
    let export = dir.path().join("export");

    let output = build_exporter(
        dir.path(),
        &[
            "--config",
            config_path.to_str().unwrap(),
            "build",
            "--batch-mode",
            "--export-path",
            export.to_str().unwrap(),
            "--new-version-code",
            "increment",
        ],
    );

    assert!(output.status.success(), "{:?}", output);
    let scenes = fs::read_to_string(export.join("scenes.txt")).unwrap();
    assert_eq!(scenes.trim(), "Assets/Scenes/Main.unity");
    assert!(export.join("1.4.2-12.aab").is_dir());
    assert_eq!(read_settings(&settings_path).android.version_code, 12);
}

#[cfg(unix)]
#[test]
fn test_failing_backend_exits_with_1_and_restores() {
    let (dir, settings_path) = project_dir();
    let config_path = dir.path().join("tool.toml");
    fs::write(
        &config_path,
        "[backend]\nprogram = \"sh\"\nargs = [\"-c\", \"echo 'error: missing SDK' >&2; exit 1\"]\n",
    )
    .unwrap();
    let export = dir.path().join("out");

    let output = build_exporter(
        dir.path(),
        &[
            "--config",
            config_path.to_str().unwrap(),
            "build",
            "--batch-mode",
            "--export-path",
            export.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let persisted = read_settings(&settings_path);
    assert!(persisted.development);
    assert!(!persisted.export_as_project);
}

#[test]
#[serial]
fn test_config_loaded_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("build-exporter.toml"),
        "[export]\ndefault_dir = \"Release\"\n",
    )
    .unwrap();

    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    std::env::set_current_dir(original).unwrap();

    assert_eq!(config.unwrap().export.default_dir, "Release");
}

#[test]
#[serial]
fn test_config_loading_defaults() {
    let dir = TempDir::new().unwrap();
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let config = load_config(None);
    std::env::set_current_dir(original).unwrap();

    // a user-level config may exist, but it must parse
    assert!(config.is_ok());
}
