// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::RwLock;

/// Environment variable overriding where the shared blobs live. Both
/// processes must resolve the same directory, so the lookup lives here.
pub const SHARED_DIR_ENV: &str = "DAYLIST_SHARED_DIR";
const DEFAULT_SHARED_DIR: &str = "shared";

/// Marker file the app touches after each publish. The widget watches its
/// mtime as a best-effort refresh nudge between scheduled reads.
pub const REFRESH_MARKER: &str = "widget.refresh";

/// Resolve the directory both processes use for shared blobs.
pub fn shared_dir_from_env() -> PathBuf {
    std::env::var(SHARED_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SHARED_DIR))
}

/// A key-value region readable by a separate process.
///
/// Single writer, any number of readers, last write wins. `set` replaces the
/// value wholesale; a reader observes either the previous blob or the new
/// one, never a partial write.
pub trait SharedBlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Durable blob store: one file per key under a shared directory.
pub struct DirBlobStore {
    dir: PathBuf,
}

impl DirBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create shared directory {}", dir.display()))?;
        Ok(DirBlobStore { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SharedBlobStore for DirBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read shared blob {}", path.display()))
            }
        }
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        // Write a sibling temp file and rename over the target, so readers
        // never observe a half-written blob.
        let path = self.key_path(key);
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, bytes)
            .with_context(|| format!("Failed to write shared blob {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace shared blob {}", path.display()))?;
        Ok(())
    }
}

/// In-memory blob store for tests. Not shared across processes, but honors
/// the same wholesale-replacement contract.
#[derive(Default)]
pub struct MemoryBlobStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedBlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.inner.read().get(key).cloned())
    }

    fn set(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.inner.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_dir_store_set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let store = DirBlobStore::new(dir.path()).unwrap();

        store.set("widget.task.snapshot", b"payload").unwrap();

        let bytes = store.get("widget.task.snapshot").unwrap();
        assert_eq!(bytes.as_deref(), Some(b"payload".as_slice()));
    }

    #[test]
    fn test_dir_store_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = DirBlobStore::new(dir.path()).unwrap();

        assert!(store.get("widget.task.snapshot").unwrap().is_none());
    }

    #[test]
    fn test_dir_store_replaces_wholesale_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = DirBlobStore::new(dir.path()).unwrap();

        store.set("blob", b"first").unwrap();
        store.set("blob", b"second").unwrap();

        assert_eq!(store.get("blob").unwrap().as_deref(), Some(b"second".as_slice()));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn test_dir_store_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = DirBlobStore::new(&nested).unwrap();
        store.set("blob", b"x").unwrap();

        assert!(nested.join("blob").exists());
    }

    #[test]
    fn test_memory_store_round_trips() {
        let store = MemoryBlobStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", b"v1").unwrap();
        store.set("k", b"v2").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some(b"v2".as_slice()));
    }
}
