//! File-backed store of saved stacks, exposed as a listener.
//!
//! Each saved stack lives in `<dir>/<key>.ron` as a [`SavedItemRecord`].
//! Lookups go through an in-memory cache that also remembers keys known to
//! be missing; [`SavedItemProvider::reload`] drops it and re-reads the
//! directory.

use crate::schema::{RECORD_FORMAT_VERSION, SavedItemRecord};
use crossitem_core::{ItemStack, Listener};
use regex::Regex;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Extension of record files.
pub const RECORD_EXTENSION: &str = "ron";

/// Recorded as the save method of records written through [`SavedItemProvider::put`].
pub const SAVE_METHOD: &str = "api";

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("key pattern is valid"));

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("invalid save key '{0}': use letters, numbers, dashes and underscores, not starting with '_'")]
    InvalidKey(String),
    #[error("could not encode record '{key}': {detail}")]
    Encode { key: String, detail: String },
    #[error("could not decode {file}: {detail}")]
    Decode { file: PathBuf, detail: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Lower-case `key` and check it can name a record file.
pub fn normalize_key(key: &str) -> Result<String, SaveError> {
    let lower = key.to_lowercase();
    if lower.starts_with('_') || !KEY_PATTERN.is_match(&lower) {
        return Err(SaveError::InvalidKey(key.to_string()));
    }
    Ok(lower)
}

#[derive(Debug)]
pub struct SavedItemProvider {
    dir: PathBuf,
    /// key -> stack, `None` for a key with no record
    cache: RefCell<BTreeMap<String, Option<ItemStack>>>,
}

impl SavedItemProvider {
    /// Open the store at `dir`, creating the directory when missing, and
    /// load every record into the cache.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let provider = Self {
            dir: dir.into(),
            cache: RefCell::new(BTreeMap::new()),
        };
        provider.reload()?;
        Ok(provider)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Drop the cache and re-read every record. Unreadable records are
    /// logged and skipped. Returns how many records were loaded.
    pub fn reload(&self) -> Result<usize, SaveError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut cache = BTreeMap::new();
        for path in self.record_files()? {
            match read_record(&path) {
                Ok(record) => {
                    cache.insert(record.key.to_lowercase(), Some(record.item));
                }
                Err(e) => tracing::warn!(error = %e, "skipping saved item"),
            }
        }
        let loaded = cache.len();
        *self.cache.borrow_mut() = cache;
        tracing::debug!(dir = %self.dir.display(), loaded, "reloaded saved items");
        Ok(loaded)
    }

    /// The stack saved under `key`, ignoring case. Keys that could not
    /// have been saved are absent and never cached.
    pub fn get(&self, key: &str) -> Option<ItemStack> {
        let key = normalize_key(key).ok()?;
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }

        let path = self.record_path(&key);
        let stack = if path.exists() {
            match read_record(&path) {
                Ok(record) => Some(record.item),
                Err(e) => {
                    // not cached, a later lookup retries
                    tracing::warn!(key = %key, error = %e, "could not read saved item");
                    return None;
                }
            }
        } else {
            None
        };
        self.cache.borrow_mut().insert(key, stack.clone());
        stack
    }

    /// Save `stack` under `key` and cache it.
    pub fn put(&self, key: &str, stack: &ItemStack, saved_by: &str) -> Result<(), SaveError> {
        let key = normalize_key(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let record = SavedItemRecord {
            key: key.clone(),
            format_version: RECORD_FORMAT_VERSION,
            saved_at: unix_millis(),
            save_method: SAVE_METHOD.to_string(),
            saved_by: saved_by.to_string(),
            item: stack.clone(),
        };
        let text = ron::ser::to_string_pretty(&record, ron::ser::PrettyConfig::default())
            .map_err(|e| SaveError::Encode {
                key: key.clone(),
                detail: e.to_string(),
            })?;
        std::fs::write(self.record_path(&key), text)?;

        tracing::info!(key = %key, saved_by, "saved item");
        self.cache.borrow_mut().insert(key, Some(stack.clone()));
        Ok(())
    }

    /// Keys currently in the cache, including ones cached as missing.
    pub fn cached_keys(&self) -> Vec<String> {
        self.cache.borrow().keys().cloned().collect()
    }

    /// Cached keys that hold a stack.
    pub fn stored_keys(&self) -> Vec<String> {
        self.cache
            .borrow()
            .iter()
            .filter(|(_, stack)| stack.is_some())
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    fn record_files(&self) -> Result<Vec<PathBuf>, SaveError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Listener for SavedItemProvider {
    fn fetch(&self, identifier: &str) -> Option<ItemStack> {
        self.get(identifier)
    }

    /// Record file stems in the store directory.
    fn available_items(&self) -> Vec<String> {
        match self.record_files() {
            Ok(files) => files
                .iter()
                .filter_map(|p| p.file_stem()?.to_str().map(str::to_string))
                .collect(),
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "could not list saved items");
                Vec::new()
            }
        }
    }
}

fn read_record(path: &Path) -> Result<SavedItemRecord, SaveError> {
    let text = std::fs::read_to_string(path)?;
    ron::from_str(&text).map_err(|e| SaveError::Decode {
        file: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
