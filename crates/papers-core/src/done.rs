//! Per-paper "done" tracking, persisted client-side and shared across courses.

use std::collections::HashSet;

use crate::PapersError;
use crate::storage::KeyValueStore;

/// Storage key holding the JSON array of done filenames.
pub const DONE_KEY: &str = "vitpapers_done";

/// Set of paper filenames the user has marked as done.
///
/// Membership is read from the store on every call, so two `DoneSet`s over
/// the same store always agree. Missing or corrupt data reads as empty.
pub struct DoneSet<S> {
    store: S,
}

impl<S: KeyValueStore> DoneSet<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Done filenames in the order they were marked.
    pub fn list(&self) -> Vec<String> {
        let raw = match self.store.get(DONE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read done-set, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Option<Vec<String>>>(&raw) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "corrupt done-set, treating as empty");
                Vec::new()
            }
        }
    }

    /// One read of the store as a lookup set, for checking many papers at once.
    pub fn snapshot(&self) -> HashSet<String> {
        self.list().into_iter().collect()
    }

    pub fn is_done(&self, filename: &str) -> bool {
        self.list().iter().any(|f| f == filename)
    }

    /// Flip membership of `filename`; returns `true` when it is now done.
    /// Only a failed write is reported; the stored set is unchanged in that case.
    pub fn toggle(&mut self, filename: &str) -> Result<bool, PapersError> {
        let mut done = self.list();
        let now_done = match done.iter().position(|f| f == filename) {
            Some(pos) => {
                done.remove(pos);
                false
            }
            None => {
                done.push(filename.to_string());
                true
            }
        };
        let encoded = serde_json::to_string(&done)?;
        self.store.set(DONE_KEY, &encoded)?;
        tracing::debug!(filename, done = now_done, "toggled done state");
        Ok(now_done)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    /// Store whose reads always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PapersError> {
            Err(PapersError::Io(std::io::Error::other("disk on fire")))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PapersError> {
            Err(PapersError::Io(std::io::Error::other("disk on fire")))
        }
    }

    #[test]
    fn toggle_on_empty_set_then_back() {
        let mut done = DoneSet::new(MemoryStore::new());
        assert!(done.toggle("a.pdf").unwrap());
        assert!(done.is_done("a.pdf"));
        assert!(!done.toggle("a.pdf").unwrap());
        assert!(!done.is_done("a.pdf"));
    }

    #[test]
    fn toggle_is_keyed_by_filename() {
        let mut done = DoneSet::new(MemoryStore::new());
        done.toggle("a.pdf").unwrap();
        done.toggle("b.pdf").unwrap();
        done.toggle("a.pdf").unwrap();
        assert_eq!(done.list(), vec!["b.pdf".to_string()]);
        assert!(!done.is_done("a.pdf"));
    }

    #[test]
    fn corrupt_data_reads_as_empty_and_is_repaired_on_toggle() {
        let mut store = MemoryStore::new();
        store.set(DONE_KEY, "{not json").unwrap();
        let mut done = DoneSet::new(store);
        assert!(done.list().is_empty());
        assert!(!done.is_done("a.pdf"));
        assert!(done.toggle("a.pdf").unwrap());
        assert_eq!(done.list(), vec!["a.pdf".to_string()]);
    }

    #[test]
    fn null_value_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(DONE_KEY, "null").unwrap();
        assert!(DoneSet::new(store).list().is_empty());
    }

    #[test]
    fn unreadable_store_degrades_and_write_error_surfaces() {
        let mut done = DoneSet::new(BrokenStore);
        assert!(!done.is_done("a.pdf"));
        assert!(done.toggle("a.pdf").is_err());
    }

    /// Store that counts reads.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        reads: std::cell::Cell<usize>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, PapersError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PapersError> {
            self.inner.set(key, value)
        }
    }

    #[test]
    fn snapshot_reads_the_store_once() {
        let mut done = DoneSet::new(CountingStore::default());
        done.toggle("a.pdf").unwrap();
        done.toggle("c.pdf").unwrap();
        let before = done.store().reads.get();

        let snapshot = done.snapshot();
        let marked: Vec<bool> = ["a.pdf", "b.pdf", "c.pdf", "d.pdf"]
            .iter()
            .map(|f| snapshot.contains(*f))
            .collect();
        assert_eq!(marked, vec![true, false, true, false]);
        assert_eq!(done.store().reads.get() - before, 1);
    }

    #[test]
    fn state_survives_a_new_session() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut done = DoneSet::new(FileStore::new(dir.path()));
            done.toggle("x.pdf").unwrap();
        }
        let reopened = DoneSet::new(FileStore::new(dir.path()));
        assert!(reopened.is_done("x.pdf"));
        let raw = std::fs::read_to_string(dir.path().join(DONE_KEY)).unwrap();
        assert_eq!(raw, r#"["x.pdf"]"#);
    }
}
