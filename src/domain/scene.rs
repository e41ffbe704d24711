use serde::{Deserialize, Serialize};

/// One entry of the project's scene registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub path: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Scene {
    pub fn new(path: impl Into<String>, enabled: bool) -> Self {
        Scene {
            path: path.into(),
            enabled,
        }
    }
}

/// Ordered scene paths handed to the build backend.
///
/// Keeps registry order, drops disabled scenes and any path containing one
/// of `exclude_keywords` (compared lower-cased).
pub fn collect_scenes(registry: &[Scene], exclude_keywords: &[String]) -> Vec<String> {
    let keywords: Vec<String> = exclude_keywords.iter().map(|k| k.to_lowercase()).collect();

    registry
        .iter()
        .filter(|scene| scene.enabled)
        .filter(|scene| {
            let path = scene.path.to_lowercase();
            !keywords.iter().any(|k| path.contains(k.as_str()))
        })
        .map(|scene| scene.path.clone())
        .collect()
}
