use crate::domain::{Platform, PlatformGroup, Scene, ScriptingBackend};
use crate::error::{BuildExporterError, Result};
use crate::settings::ProjectConfigStore;
use std::collections::HashMap;

/// In-memory project settings for tests
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryProjectStore {
    pub bundle_version: String,
    pub android_version_code: i64,
    pub ios_build_number: String,
    pub active_platform: Platform,
    pub selected_group: PlatformGroup,
    pub define_symbols: HashMap<PlatformGroup, String>,
    pub development: bool,
    pub export_as_project: bool,
    pub build_app_bundle: bool,
    pub scripting_backend: HashMap<PlatformGroup, ScriptingBackend>,
    pub preloaded_assets: Vec<String>,
    pub scenes: Vec<Scene>,
    /// Number of successful `save()` calls
    pub save_count: usize,
    /// When set, `save()` fails with this message
    pub fail_save: Option<String>,
}

impl MemoryProjectStore {
    /// Create a store targeting `platform` with version `1.0.0` and build number 0 everywhere.
    pub fn new(platform: Platform) -> Self {
        MemoryProjectStore {
            bundle_version: "1.0.0".to_string(),
            android_version_code: 0,
            ios_build_number: "0".to_string(),
            active_platform: platform,
            selected_group: platform.group(),
            define_symbols: HashMap::new(),
            development: false,
            export_as_project: false,
            build_app_bundle: false,
            scripting_backend: HashMap::new(),
            preloaded_assets: Vec::new(),
            scenes: Vec::new(),
            save_count: 0,
            fail_save: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.bundle_version = version.to_string();
        self
    }

    pub fn with_build_numbers(mut self, android: i64, ios: &str) -> Self {
        self.android_version_code = android;
        self.ios_build_number = ios.to_string();
        self
    }

    pub fn with_scene(mut self, path: &str, enabled: bool) -> Self {
        self.scenes.push(Scene::new(path, enabled));
        self
    }
}

impl Default for MemoryProjectStore {
    fn default() -> Self {
        Self::new(Platform::Android)
    }
}

impl ProjectConfigStore for MemoryProjectStore {
    fn bundle_version(&self) -> String {
        self.bundle_version.clone()
    }

    fn set_bundle_version(&mut self, version: &str) {
        self.bundle_version = version.to_string();
    }

    fn android_version_code(&self) -> i64 {
        self.android_version_code
    }

    fn set_android_version_code(&mut self, code: i64) {
        self.android_version_code = code;
    }

    fn ios_build_number(&self) -> String {
        self.ios_build_number.clone()
    }

    fn set_ios_build_number(&mut self, build_number: &str) {
        self.ios_build_number = build_number.to_string();
    }

    fn active_platform(&self) -> Platform {
        self.active_platform
    }

    fn set_active_platform(&mut self, platform: Platform) {
        self.active_platform = platform;
    }

    fn selected_group(&self) -> PlatformGroup {
        self.selected_group
    }

    fn set_selected_group(&mut self, group: PlatformGroup) {
        self.selected_group = group;
    }

    fn define_symbols(&self, group: PlatformGroup) -> String {
        self.define_symbols.get(&group).cloned().unwrap_or_default()
    }

    fn set_define_symbols(&mut self, group: PlatformGroup, symbols: &str) {
        self.define_symbols.insert(group, symbols.to_string());
    }

    fn development(&self) -> bool {
        self.development
    }

    fn set_development(&mut self, enabled: bool) {
        self.development = enabled;
    }

    fn export_as_project(&self) -> bool {
        self.export_as_project
    }

    fn set_export_as_project(&mut self, enabled: bool) {
        self.export_as_project = enabled;
    }

    fn build_app_bundle(&self) -> bool {
        self.build_app_bundle
    }

    fn set_build_app_bundle(&mut self, enabled: bool) {
        self.build_app_bundle = enabled;
    }

    fn scripting_backend(&self, group: PlatformGroup) -> ScriptingBackend {
        self.scripting_backend
            .get(&group)
            .copied()
            .unwrap_or_default()
    }

    fn set_scripting_backend(&mut self, group: PlatformGroup, backend: ScriptingBackend) {
        self.scripting_backend.insert(group, backend);
    }

    fn preloaded_assets(&self) -> Vec<String> {
        self.preloaded_assets.clone()
    }

    fn set_preloaded_assets(&mut self, assets: Vec<String>) {
        self.preloaded_assets = assets;
    }

    fn scenes(&self) -> Vec<Scene> {
        self.scenes.clone()
    }

    fn save(&mut self) -> Result<()> {
        if let Some(msg) = &self.fail_save {
            return Err(BuildExporterError::settings(msg.clone()));
        }
        self.save_count += 1;
        Ok(())
    }
}
