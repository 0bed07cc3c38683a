use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{info, warn};

use super::base::TranslationError;


/// Original text → translated text, persisted as a JSON object.
pub struct TranslationCache {
    entries: RwLock<HashMap<String, String>>,
    path: Option<PathBuf>,
    dirty: AtomicBool,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub hit_rate: f64,
}

impl TranslationCache {
    /// In-memory only; `persist` is a no-op.
    pub fn new() -> Self {
        Self::with_entries(HashMap::new(), None)
    }

    fn with_entries(entries: HashMap<String, String>, path: Option<PathBuf>) -> Self {
        Self {
            entries: RwLock::new(entries),
            path,
            dirty: AtomicBool::new(false),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A missing file starts an empty cache; an unreadable one is logged and ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TranslationError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            info!("No translation cache at {}, starting empty", path.display());
            return Ok(Self::with_entries(HashMap::new(), Some(path)));
        }

        let raw = fs::read_to_string(&path)?;
        let entries = match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring invalid translation cache {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        info!("Loaded {} cached translations from {}", entries.len(), path.display());
        Ok(Self::with_entries(entries, Some(path)))
    }

    pub fn get(&self, text: &str) -> Option<String> {
        let entries = self.entries.read();
        match entries.get(text) {
            Some(translated) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(translated.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, original: impl Into<String>, translated: impl Into<String>) {
        self.entries.write().insert(original.into(), translated.into());
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Writes the cache if it has a path and changed since the last write.
    /// Returns whether a write happened.
    pub fn persist(&self) -> Result<bool, TranslationError> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if !self.dirty.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let snapshot: BTreeMap<String, String> = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?)?;
        fs::rename(&tmp, path)?;

        self.dirty.store(false, Ordering::SeqCst);
        info!("Persisted {} translations to {}", snapshot.len(), path.display());
        Ok(true)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 { hits as f64 / total as f64 } else { 0.0 };

        CacheStats {
            hits,
            misses,
            size: self.len(),
            hit_rate,
        }
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}
