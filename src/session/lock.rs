use crate::error::{BuildExporterError, Result};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const LOCK_FILE_NAME: &str = ".build-exporter.lock";

/// Per-project lock file for build sessions.
///
/// Two sessions capturing overlapping snapshots would restore each other's
/// mutations, so the capture → mutate → restore section runs while a
/// [SessionLockGuard] is alive. Exclusion comes from an OS advisory lock on
/// the file, which the OS drops together with the owning process, so a
/// killed session never leaves a lock behind. The file itself stays in place
/// and only records the current owner's pid.
pub struct SessionLock {
    path: PathBuf,
    file: fd_lock::RwLock<File>,
}

/// Held lock; releases on drop.
pub struct SessionLockGuard<'a> {
    path: &'a Path,
    held: fd_lock::RwLockWriteGuard<'a, File>,
}

impl SessionLock {
    /// Open (creating if needed) the lock file of `project_root`.
    pub fn open(project_root: &Path) -> Result<Self> {
        let path = project_root.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        Ok(SessionLock {
            path,
            file: fd_lock::RwLock::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the lock without waiting.
    ///
    /// # Returns
    /// * `Ok(SessionLockGuard)` - This process owns the project until the guard drops
    /// * `Err(SessionLocked)` - Another live session holds it
    pub fn try_acquire(&mut self) -> Result<SessionLockGuard<'_>> {
        let path = self.path.as_path();
        let mut held = match self.file.try_write() {
            Ok(held) => held,
            Err(e) => return Err(locked(path, e)),
        };

        held.set_len(0)?;
        held.seek(SeekFrom::Start(0))?;
        writeln!(&mut *held, "pid={}", std::process::id())?;
        held.sync_all()?;
        tracing::debug!(path = %path.display(), "session lock acquired");

        Ok(SessionLockGuard { path, held })
    }
}

impl fmt::Debug for SessionLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLock").field("path", &self.path).finish()
    }
}

impl SessionLockGuard<'_> {
    pub fn path(&self) -> &Path {
        self.path
    }
}

impl fmt::Debug for SessionLockGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLockGuard").field("path", &self.path).finish()
    }
}

impl Drop for SessionLockGuard<'_> {
    fn drop(&mut self) {
        // clear the owner before the OS lock goes
        let _ = self.held.set_len(0);
    }
}

fn locked(path: &Path, e: std::io::Error) -> BuildExporterError {
    let owner = fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| e.to_string());
    BuildExporterError::SessionLocked(format!("{} ({})", path.display(), owner))
}
