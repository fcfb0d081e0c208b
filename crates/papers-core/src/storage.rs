//! Client-local key/value persistence.
//!
//! Values are opaque strings keyed by a fixed name, one file per key under a
//! data directory. Nothing here is shared across processes beyond the files
//! themselves: concurrent writers race and the last write wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::PapersError;

/// Storage key holding the theme preference string.
pub const THEME_KEY: &str = "theme";

/// Default directory for client-local state: `<data_dir>/papers`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("papers")
}

/// A string store addressed by key.
pub trait KeyValueStore {
    /// Read a key. `Ok(None)` means the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, PapersError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), PapersError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PapersError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PapersError> {
        (**self).set(key, value)
    }
}

/// File-backed store: each key lives in `<dir>/<key>`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PapersError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PapersError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store, used by tests and as a fallback when no data dir exists.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PapersError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PapersError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persisted colour scheme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Stored theme preference; unreadable or unknown values count as unset.
pub fn load_theme(store: &impl KeyValueStore) -> Option<ThemePreference> {
    match store.get(THEME_KEY) {
        Ok(value) => value.as_deref().and_then(ThemePreference::parse),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read theme preference");
            None
        }
    }
}

pub fn save_theme(
    store: &mut impl KeyValueStore,
    theme: ThemePreference,
) -> Result<(), PapersError> {
    store.set(THEME_KEY, theme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert!(!dir.path().join("nested").join(".k.tmp").exists());
    }

    #[test]
    fn theme_preference_persists() {
        let mut store = MemoryStore::new();
        assert_eq!(load_theme(&store), None);
        save_theme(&mut store, ThemePreference::Light).unwrap();
        assert_eq!(load_theme(&store), Some(ThemePreference::Light));
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load_theme(&store), None);
    }

    #[test]
    fn theme_toggle_flips() {
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
        assert_eq!(ThemePreference::Light.toggled().toggled(), ThemePreference::Light);
    }
}
