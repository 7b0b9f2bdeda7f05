use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Append-only list of temporary files produced during a run.
///
/// Subprocess-backed rasterizers and bundlers record every file they write here from parallel
/// render tasks. Appends are serialized by the mutex; the list is drained once at teardown.
#[derive(Debug, Default)]
pub struct ArtifactLog {
    paths: Mutex<Vec<PathBuf>>,
}

impl ArtifactLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, path: impl Into<PathBuf>) {
        self.lock().push(path.into());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of recorded paths in append order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().clone()
    }

    /// Delete every recorded file (and directory, if empty) and clear the log.
    ///
    /// Returns the number of paths that were removed. Missing files are not an error.
    pub fn remove_all(&self) -> usize {
        let paths = std::mem::take(&mut *self.lock());
        let mut removed = 0usize;
        // Reverse order so files go before the directories that hold them.
        for path in paths.iter().rev() {
            if remove_path(path) {
                removed += 1;
            }
        }
        tracing::debug!(removed, total = paths.len(), "removed temporary artifacts");
        removed
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        // A panicking appender cannot leave the vector half-written.
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn remove_path(path: &Path) -> bool {
    if path.is_dir() {
        std::fs::remove_dir(path).is_ok()
    } else {
        std::fs::remove_file(path).is_ok()
    }
}

/// Unique scratch directory under the system temp dir, recorded in `log`.
pub fn scratch_dir(log: &ArtifactLog, tag: &str) -> std::io::Result<PathBuf> {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("gifhub_{tag}_{}_{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    log.record(&dir);
    Ok(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/artifacts.rs"]
mod tests;
