use crate::domain::{Platform, PlatformGroup, ScriptingBackend};
use crate::error::Result;
use crate::settings::ProjectConfigStore;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Build-environment fields a session may change and must put back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub active_platform: Platform,
    pub platform_group: PlatformGroup,
    pub define_symbols: String,
    pub development: bool,
    pub export_as_project: bool,
    pub build_app_bundle: bool,
    pub scripting_backend: ScriptingBackend,
    pub preloaded_assets: Vec<String>,
}

impl EnvironmentSnapshot {
    /// Read every tracked field from the store.
    pub fn capture<S: ProjectConfigStore + ?Sized>(store: &S) -> Self {
        let platform_group = store.selected_group();
        EnvironmentSnapshot {
            active_platform: store.active_platform(),
            platform_group,
            define_symbols: store.define_symbols(platform_group),
            development: store.development(),
            export_as_project: store.export_as_project(),
            build_app_bundle: store.build_app_bundle(),
            scripting_backend: store.scripting_backend(platform_group),
            preloaded_assets: store.preloaded_assets(),
        }
    }

    /// Write every tracked field back and persist. There is no partial restore.
    pub fn restore<S: ProjectConfigStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.set_active_platform(self.active_platform);
        store.set_selected_group(self.platform_group);
        store.set_define_symbols(self.platform_group, &self.define_symbols);
        store.set_development(self.development);
        store.set_export_as_project(self.export_as_project);
        store.set_build_app_bundle(self.build_app_bundle);
        store.set_scripting_backend(self.platform_group, self.scripting_backend);
        store.set_preloaded_assets(self.preloaded_assets.clone());
        store.save()
    }
}

impl fmt::Display for EnvironmentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "platform: {}, group: {}, define_symbols: '{}', development: {}, \
             export_as_project: {}, build_app_bundle: {}, scripting_backend: {}, \
             preloaded_assets: {}",
            self.active_platform,
            self.platform_group,
            self.define_symbols,
            self.development,
            self.export_as_project,
            self.build_app_bundle,
            self.scripting_backend,
            self.preloaded_assets.len()
        )
    }
}

/// Scoped ownership of the build environment.
///
/// Acquiring the guard captures an [EnvironmentSnapshot]; the snapshot is
/// restored exactly once, either by [EnvironmentGuard::finish] or, on any
/// other exit path (early return, `?`, panic), by `Drop`. The guard derefs
/// to the store so mutations go through it.
pub struct EnvironmentGuard<'a, S: ProjectConfigStore + ?Sized> {
    store: &'a mut S,
    snapshot: Option<EnvironmentSnapshot>,
}

impl<'a, S: ProjectConfigStore + ?Sized> EnvironmentGuard<'a, S> {
    pub fn acquire(store: &'a mut S) -> Self {
        let snapshot = EnvironmentSnapshot::capture(&*store);
        tracing::info!(%snapshot, "captured build environment");
        EnvironmentGuard {
            store,
            snapshot: Some(snapshot),
        }
    }

    /// Restore now and report whether persisting the restored values worked.
    pub fn finish(mut self) -> Result<()> {
        self.restore_once().unwrap_or(Ok(()))
    }

    fn restore_once(&mut self) -> Option<Result<()>> {
        let snapshot = self.snapshot.take()?;
        let result = snapshot.restore(&mut *self.store);
        match &result {
            Ok(()) => tracing::info!("restored build environment"),
            Err(e) => tracing::error!(error = %e, "failed to restore build environment"),
        }
        Some(result)
    }
}

impl<S: ProjectConfigStore + ?Sized> Deref for EnvironmentGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<S: ProjectConfigStore + ?Sized> DerefMut for EnvironmentGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.store
    }
}

impl<S: ProjectConfigStore + ?Sized> Drop for EnvironmentGuard<'_, S> {
    fn drop(&mut self) {
        if self.snapshot.is_some() {
            tracing::warn!("session ended early, restoring build environment");
            // Errors were already logged; Drop has nowhere to send them.
            let _ = self.restore_once();
        }
    }
}
