use thiserror::Error;

/// A persisted field that failed the pre-build validation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: &'static str,
    pub value: String,
}

impl std::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = '{}'", self.field, self.value)
    }
}

/// Reasons a session refuses to start. None of these leave any mutation behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Persisted project settings are invalid: {}", join_fields(.fields))]
    PersistedStateInvalid { fields: Vec<InvalidField> },

    #[error("Cannot parse new version '{value}': {reason}")]
    VersionSpecInvalid { value: String, reason: String },

    #[error("Cannot parse new version code '{value}': expected 'increment' or a non-negative integer")]
    BuildNumberSpecInvalid { value: String },
}

fn join_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Unified error type for build-exporter operations
#[derive(Error, Debug)]
pub enum BuildExporterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid arguments: {0}")]
    Argument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project settings error: {0}")]
    Settings(String),

    #[error("Build backend failed: {0}")]
    Backend(String),

    #[error("Another build session holds the project lock: {0}")]
    SessionLocked(String),

    #[error("Fastlane setup error: {0}")]
    Scaffold(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Convenience type alias for Results in build-exporter
pub type Result<T> = std::result::Result<T, BuildExporterError>;

impl BuildExporterError {
    pub fn argument(msg: impl Into<String>) -> Self {
        BuildExporterError::Argument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BuildExporterError::Config(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        BuildExporterError::Settings(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        BuildExporterError::Backend(msg.into())
    }

    pub fn scaffold(msg: impl Into<String>) -> Self {
        BuildExporterError::Scaffold(msg.into())
    }

    /// Process exit code for this error.
    ///
    /// Validation and argument problems exit with 2 so release scripts can
    /// tell "refused to start" apart from "started and failed" (1).
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildExporterError::Validation(_) | BuildExporterError::Argument(_) => 2,
            _ => 1,
        }
    }
}
