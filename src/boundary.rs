use std::fmt;

/// Non-fatal conditions noticed while resolving or running a session.
/// These are reported to the user but never stop the build.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The two platform build numbers disagree; the larger one is carried forward
    BuildNumberDrift { android: u32, ios: u32 },
    /// An explicit version is lower than the persisted one
    VersionRegression { current: String, requested: String },
    /// An explicit build number is lower than the current baseline
    BuildNumberRegression { baseline: u32, requested: u32 },
    /// Every scene was filtered out of the registry
    NoScenes,
    /// No export path resolved, so only the version stamp is written
    StampOnly,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::BuildNumberDrift { android, ios } => write!(
                f,
                "Android version code ({}) and iOS build number ({}) differ; continuing from {}",
                android,
                ios,
                android.max(ios)
            ),
            BoundaryWarning::VersionRegression { current, requested } => write!(
                f,
                "Requested version '{}' is lower than current version '{}'",
                requested, current
            ),
            BoundaryWarning::BuildNumberRegression {
                baseline,
                requested,
            } => write!(
                f,
                "Requested build number {} is lower than current build number {}",
                requested, baseline
            ),
            BoundaryWarning::NoScenes => {
                write!(f, "No enabled scenes left after filtering the scene registry")
            }
            BoundaryWarning::StampOnly => write!(
                f,
                "No export path given in batch mode; stamping version without building"
            ),
        }
    }
}
