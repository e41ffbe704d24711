use crate::domain::{Platform, PlatformGroup, Scene, ScriptingBackend};
use crate::error::{BuildExporterError, Result};
use crate::settings::ProjectConfigStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk layout of the project settings file.
///
/// ```toml
/// bundle_version = "1.0.0"
/// active_platform = "android"
/// selected_group = "android"
///
/// [android]
/// version_code = 0
///
/// [ios]
/// build_number = "0"
///
/// [define_symbols]
/// android = "RELEASE;ANALYTICS"
///
/// [[scenes]]
/// path = "Assets/Scenes/Main.unity"
/// enabled = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default = "default_bundle_version")]
    pub bundle_version: String,

    #[serde(default = "default_platform")]
    pub active_platform: Platform,

    #[serde(default = "default_group")]
    pub selected_group: PlatformGroup,

    #[serde(default)]
    pub development: bool,

    #[serde(default)]
    pub export_as_project: bool,

    #[serde(default)]
    pub build_app_bundle: bool,

    #[serde(default)]
    pub preloaded_assets: Vec<String>,

    #[serde(default)]
    pub android: AndroidSettings,

    #[serde(default)]
    pub ios: IosSettings,

    /// Keyed by [PlatformGroup::key].
    #[serde(default)]
    pub define_symbols: BTreeMap<String, String>,

    /// Keyed by [PlatformGroup::key].
    #[serde(default)]
    pub scripting_backend: BTreeMap<String, ScriptingBackend>,

    #[serde(default)]
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AndroidSettings {
    #[serde(default)]
    pub version_code: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IosSettings {
    #[serde(default = "default_ios_build_number")]
    pub build_number: String,
}

fn default_bundle_version() -> String {
    "0.1.0".to_string()
}

fn default_platform() -> Platform {
    Platform::Android
}

fn default_group() -> PlatformGroup {
    PlatformGroup::Android
}

fn default_ios_build_number() -> String {
    "0".to_string()
}

impl Default for IosSettings {
    fn default() -> Self {
        IosSettings {
            build_number: default_ios_build_number(),
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            bundle_version: default_bundle_version(),
            active_platform: default_platform(),
            selected_group: default_group(),
            development: false,
            export_as_project: false,
            build_app_bundle: false,
            preloaded_assets: Vec::new(),
            android: AndroidSettings::default(),
            ios: IosSettings::default(),
            define_symbols: BTreeMap::new(),
            scripting_backend: BTreeMap::new(),
            scenes: Vec::new(),
        }
    }
}

/// Project settings stored as a TOML file.
///
/// The file is read once on [FileProjectStore::open] and rewritten on
/// [ProjectConfigStore::save] only if a setter changed something.
pub struct FileProjectStore {
    path: PathBuf,
    settings: ProjectSettings,
    dirty: bool,
}

impl FileProjectStore {
    /// Load the settings file at `path`.
    ///
    /// # Returns
    /// * `Ok(FileProjectStore)` - Loaded store
    /// * `Err` - If the file is missing or not valid settings TOML
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|e| {
            BuildExporterError::settings(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let settings: ProjectSettings = toml::from_str(&content).map_err(|e| {
            BuildExporterError::settings(format!("Cannot parse '{}': {}", path.display(), e))
        })?;

        Ok(FileProjectStore {
            path,
            settings,
            dirty: false,
        })
    }

    /// Write `settings` to `path` and open a store on it.
    pub fn create<P: AsRef<Path>>(path: P, settings: ProjectSettings) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(&settings)?)?;

        Ok(FileProjectStore {
            path,
            settings,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    fn update<T: PartialEq>(dirty: &mut bool, slot: &mut T, value: T) {
        if *slot != value {
            *slot = value;
            *dirty = true;
        }
    }
}

impl ProjectConfigStore for FileProjectStore {
    fn bundle_version(&self) -> String {
        self.settings.bundle_version.clone()
    }

    fn set_bundle_version(&mut self, version: &str) {
        Self::update(
            &mut self.dirty,
            &mut self.settings.bundle_version,
            version.to_string(),
        );
    }

    fn android_version_code(&self) -> i64 {
        self.settings.android.version_code
    }

    fn set_android_version_code(&mut self, code: i64) {
        Self::update(&mut self.dirty, &mut self.settings.android.version_code, code);
    }

    fn ios_build_number(&self) -> String {
        self.settings.ios.build_number.clone()
    }

    fn set_ios_build_number(&mut self, build_number: &str) {
        Self::update(
            &mut self.dirty,
            &mut self.settings.ios.build_number,
            build_number.to_string(),
        );
    }

    fn active_platform(&self) -> Platform {
        self.settings.active_platform
    }

    fn set_active_platform(&mut self, platform: Platform) {
        Self::update(&mut self.dirty, &mut self.settings.active_platform, platform);
    }

    fn selected_group(&self) -> PlatformGroup {
        self.settings.selected_group
    }

    fn set_selected_group(&mut self, group: PlatformGroup) {
        Self::update(&mut self.dirty, &mut self.settings.selected_group, group);
    }

    fn define_symbols(&self, group: PlatformGroup) -> String {
        self.settings
            .define_symbols
            .get(group.key())
            .cloned()
            .unwrap_or_default()
    }

    fn set_define_symbols(&mut self, group: PlatformGroup, symbols: &str) {
        if self.define_symbols(group) == symbols {
            return;
        }
        // An empty entry and a missing one read the same; drop it to keep the file tidy.
        if symbols.is_empty() {
            self.settings.define_symbols.remove(group.key());
        } else {
            self.settings
                .define_symbols
                .insert(group.key().to_string(), symbols.to_string());
        }
        self.dirty = true;
    }

    fn development(&self) -> bool {
        self.settings.development
    }

    fn set_development(&mut self, enabled: bool) {
        Self::update(&mut self.dirty, &mut self.settings.development, enabled);
    }

    fn export_as_project(&self) -> bool {
        self.settings.export_as_project
    }

    fn set_export_as_project(&mut self, enabled: bool) {
        Self::update(&mut self.dirty, &mut self.settings.export_as_project, enabled);
    }

    fn build_app_bundle(&self) -> bool {
        self.settings.build_app_bundle
    }

    fn set_build_app_bundle(&mut self, enabled: bool) {
        Self::update(&mut self.dirty, &mut self.settings.build_app_bundle, enabled);
    }

    fn scripting_backend(&self, group: PlatformGroup) -> ScriptingBackend {
        self.settings
            .scripting_backend
            .get(group.key())
            .copied()
            .unwrap_or_default()
    }

    fn set_scripting_backend(&mut self, group: PlatformGroup, backend: ScriptingBackend) {
        if self.settings.scripting_backend.get(group.key()) == Some(&backend) {
            return;
        }
        self.settings
            .scripting_backend
            .insert(group.key().to_string(), backend);
        self.dirty = true;
    }

    fn preloaded_assets(&self) -> Vec<String> {
        self.settings.preloaded_assets.clone()
    }

    fn set_preloaded_assets(&mut self, assets: Vec<String>) {
        Self::update(&mut self.dirty, &mut self.settings.preloaded_assets, assets);
    }

    fn scenes(&self) -> Vec<Scene> {
        self.settings.scenes.clone()
    }

    fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let content = toml::to_string_pretty(&self.settings)?;
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved project settings");
        self.dirty = false;
        Ok(())
    }
}
