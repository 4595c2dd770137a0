//! In-memory asset store.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rustc_hash::FxHashMap;

use super::AssetResolver;

/// Emitted build files, keyed by output path (`icons/logo.svg`).
#[derive(Debug, Default, Clone)]
pub struct AssetStore {
    files: FxHashMap<String, Vec<u8>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(normalize_key(&key.into()), content.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Load every file under `root` whose name contains `extension`.
    ///
    /// Keys are relative to `root`.
    pub fn scan(root: &Path, extension: &str) -> Result<Self> {
        let mut store = Self::new();

        let paths: Vec<_> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_string_lossy().contains(extension))
            .map(|e| e.path())
            .collect();

        for path in paths {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let content =
                fs::read(&path).with_context(|| format!("failed to read `{}`", path.display()))?;
            store.insert(rel.to_string_lossy(), content);
        }

        Ok(store)
    }
}

impl AssetResolver for AssetStore {
    fn resolve(&self, key: &str) -> Option<&[u8]> {
        self.files.get(key).map(Vec::as_slice)
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> FromIterator<(K, V)> for AssetStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, content) in iter {
            store.insert(key, content);
        }
        store
    }
}

/// Forward slashes, no leading slash.
fn normalize_key(key: &str) -> String {
    key.replace('\\', "/").trim_start_matches('/').to_string()
}
