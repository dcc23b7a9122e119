use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

#[derive(Debug)]
struct CachedArtifact<T> {
    modified: SystemTime,
    value: Arc<T>,
}

/// Loaded artifacts keyed by path, invalidated when the file's modification
/// time changes.
///
/// Loading happens outside the lock; two concurrent misses for the same path
/// both load and the later insert wins.
#[derive(Debug)]
pub struct ArtifactCache<T> {
    entries: Mutex<HashMap<PathBuf, CachedArtifact<T>>>,
}

impl<T> Default for ArtifactCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> ArtifactCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `path` if it was loaded from a file with
    /// the same `modified` time, otherwise run `load` and remember the result.
    pub fn get_or_load<E, F>(&self, path: &Path, modified: SystemTime, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&Path) -> Result<T, E>,
    {
        if let Some(hit) = self.lookup(path, modified) {
            tracing::trace!(path = %path.display(), "Artifact cache hit");
            return Ok(hit);
        }

        let value = Arc::new(load(path)?);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            path.to_path_buf(),
            CachedArtifact {
                modified,
                value: Arc::clone(&value),
            },
        );
        tracing::debug!(path = %path.display(), cached = entries.len(), "Artifact loaded");
        Ok(value)
    }

    fn lookup(&self, path: &Path, modified: SystemTime) -> Option<Arc<T>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(path)
            .filter(|c| c.modified == modified)
            .map(|c| Arc::clone(&c.value))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
