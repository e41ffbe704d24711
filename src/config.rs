use crate::error::{BuildExporterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "build-exporter.toml";

/// Represents the complete configuration for build-exporter.
///
/// Contains the project settings location, scene filtering, export layout,
/// the build backend command line, and the fastlane layout.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub scenes: ScenesConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub fastlane: FastlaneConfig,
}

fn default_settings_file() -> PathBuf {
    PathBuf::from("ProjectSettings/BuildSettings.toml")
}

/// Where the persisted project settings live, relative to the project root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_settings_file")]
    pub settings_file: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            settings_file: default_settings_file(),
        }
    }
}

/// Returns the default scene path keywords that keep a scene out of release builds.
fn default_exclude_keywords() -> Vec<String> {
    vec!["demo".to_string(), "test".to_string()]
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScenesConfig {
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,
}

impl Default for ScenesConfig {
    fn default() -> Self {
        ScenesConfig {
            exclude_keywords: default_exclude_keywords(),
        }
    }
}

fn default_export_dir() -> String {
    "Builds".to_string()
}

fn default_export_suffix() -> String {
    "-export".to_string()
}

/// Layout of the default export directory: `{project}/{default_dir}/{Platform}{suffix}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub default_dir: String,

    #[serde(default = "default_export_suffix")]
    pub suffix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            default_dir: default_export_dir(),
            suffix: default_export_suffix(),
        }
    }
}

fn default_backend_program() -> String {
    "unity".to_string()
}

fn default_backend_args() -> Vec<String> {
    vec![
        "-batchmode".to_string(),
        "-quit".to_string(),
        "-projectPath".to_string(),
        "{project}".to_string(),
        "-buildTarget".to_string(),
        "{platform}".to_string(),
        "-exportPath".to_string(),
        "{output}".to_string(),
    ]
}

/// Command line of the external build backend.
///
/// Arguments may contain `{project}`, `{output}`, `{platform}` and
/// `{scenes}` placeholders.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_backend_program")]
    pub program: String,

    #[serde(default = "default_backend_args")]
    pub args: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            program: default_backend_program(),
            args: default_backend_args(),
        }
    }
}

fn default_fastlane_base_dir() -> String {
    "fastlane-build-exporter".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FastlaneConfig {
    #[serde(default = "default_fastlane_base_dir")]
    pub base_dir: String,
}

impl Default for FastlaneConfig {
    fn default() -> Self {
        FastlaneConfig {
            base_dir: default_fastlane_base_dir(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `build-exporter.toml` in current directory
/// 3. `~/.config/.build-exporter.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            config_path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        BuildExporterError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str).map_err(|e| {
        BuildExporterError::config(format!("Cannot parse '{}': {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
