//! Page cache: route identity to output hash, persisted as `client.json`.
//!
//! The in-memory [`PageCache`] covers one builder session. The persisted file
//! is the only state that survives across runs, and reusing the hashes it
//! records keeps output filenames stable across rebuilds.

use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A route that was loaded as a module instead of being transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRef {
    /// Source path relative to the app directory.
    pub module: String,
    /// Name the module is registered under.
    pub alias: String,
}

/// Value stored for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheEntry {
    /// Output hash of a route built through the transform pipeline.
    Hash(String),
    /// Pre-compiled route.
    Module(ModuleRef),
}

impl CacheEntry {
    pub fn hash(&self) -> Option<&str> {
        match self {
            CacheEntry::Hash(hash) => Some(hash),
            CacheEntry::Module(_) => None,
        }
    }
}

/// Raised when a lifecycle operation targets a route that was never built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("route '{route}' is not in the page cache; run a full build first")]
    NotCached { route: String },
}

/// Insertion-ordered mapping of route `file` to [`CacheEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCache {
    entries: IndexMap<String, CacheEntry>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a persisted cache. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read page cache '{}'", path.display()))?;
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("failed to parse page cache '{}'", path.display()))
    }

    /// Overwrite the persisted cache with exactly this cache's entries.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
        }
        let json = serde_json::to_string(&self.entries)?;
        fs::write(path, json)
            .wrap_err_with(|| format!("failed to write page cache '{}'", path.display()))
    }

    pub fn get(&self, file: &str) -> Option<&CacheEntry> {
        self.entries.get(file)
    }

    /// Hash recorded for `file`, if it was built through the pipeline.
    pub fn hash_of(&self, file: &str) -> Option<&str> {
        self.get(file).and_then(CacheEntry::hash)
    }

    pub fn contains(&self, file: &str) -> bool {
        self.entries.contains_key(file)
    }

    /// Whether any route already uses `hash` as its output name.
    pub fn has_hash(&self, hash: &str) -> bool {
        self.entries.values().any(|e| e.hash() == Some(hash))
    }

    /// Insert or replace the entry for `file`, returning the replaced one.
    pub fn insert(&mut self, file: impl Into<String>, entry: CacheEntry) -> Option<CacheEntry> {
        self.entries.insert(file.into(), entry)
    }

    /// Remove `file`, keeping the order of the remaining entries.
    pub fn remove(&mut self, file: &str) -> Option<CacheEntry> {
        self.entries.shift_remove(file)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add every entry of `other` whose key is not present in `self`.
    pub fn merge(&mut self, other: &PageCache) {
        for (file, entry) in &other.entries {
            if !self.entries.contains_key(file) {
                self.entries.insert(file.clone(), entry.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn module(file: &str) -> CacheEntry {
        CacheEntry::Module(ModuleRef {
            module: file.to_string(),
            alias: file.to_string(),
        })
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let cache = PageCache::load(&temp.path().join("client.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_writes_flat_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".astound/client.json");

        let mut cache = PageCache::new();
        cache.insert("index.html", CacheEntry::Hash("0a1b2c3d".into()));
        cache.insert("api.ts", module("api.ts"));
        cache.persist(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["index.html"], "0a1b2c3d");
        assert_eq!(raw["api.ts"]["module"], "api.ts");

        let loaded = PageCache::load(&path).unwrap();
        assert_eq!(loaded, cache);
    }

    #[test]
    fn test_persist_overwrites_removed_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("client.json");

        let mut cache = PageCache::new();
        cache.insert("a.html", CacheEntry::Hash("aaaa".into()));
        cache.insert("b.html", CacheEntry::Hash("bbbb".into()));
        cache.persist(&path).unwrap();

        cache.remove("a.html");
        cache.persist(&path).unwrap();

        let loaded = PageCache::load(&path).unwrap();
        assert!(!loaded.contains("a.html"));
        assert_eq!(loaded.hash_of("b.html"), Some("bbbb"));
    }

    #[test]
    fn test_insert_returns_replaced_entry_in_place() {
        let mut cache = PageCache::new();
        assert_eq!(cache.insert("a.html", CacheEntry::Hash("aaaa".into())), None);
        cache.insert("b.html", CacheEntry::Hash("bbbb".into()));

        let replaced = cache.insert("a.html", CacheEntry::Hash("cccc".into()));

        assert_eq!(replaced, Some(CacheEntry::Hash("aaaa".into())));
        let files: Vec<_> = cache.iter().map(|(file, _)| file).collect();
        assert_eq!(files, vec!["a.html", "b.html"]);
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("client.json");
        fs::write(&path, "{not json").unwrap();

        let err = PageCache::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse page cache"));
    }

    #[test]
    fn test_merge_keeps_existing_values() {
        let mut memory = PageCache::new();
        memory.insert("a.html", CacheEntry::Hash("new1".into()));

        let mut persisted = PageCache::new();
        persisted.insert("a.html", CacheEntry::Hash("old1".into()));
        persisted.insert("b.html", CacheEntry::Hash("old2".into()));

        memory.merge(&persisted);

        assert_eq!(memory.hash_of("a.html"), Some("new1"));
        assert_eq!(memory.hash_of("b.html"), Some("old2"));
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_hash_of_module_is_none() {
        let mut cache = PageCache::new();
        cache.insert("api.ts", module("api.ts"));
        assert!(cache.contains("api.ts"));
        assert_eq!(cache.hash_of("api.ts"), None);
        assert!(!cache.has_hash("api.ts"));
    }
}
