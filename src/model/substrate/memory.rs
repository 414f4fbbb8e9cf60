use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{StorageError, Substrate};

/// An in-process substrate.
///
/// Clones share the same underlying map, so a handle kept by a test observes
/// every write made through a clone handed to the chaincode.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reads served so far, including reads of absent keys.
    pub fn reads(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable("In-memory state lock poisoned".to_string())
    }
}

impl Substrate for MemoryStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.inner.entries.lock().map_err(|_| Self::poisoned())?;
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        Ok(entries.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.inner.entries.lock().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_vec());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_state("nothing").unwrap(), None);
        assert_eq!(store.reads(), 1);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn put_overwrites() {
        let store = MemoryStore::new();
        store.put_state("k", b"1").unwrap();
        store.put_state("k", b"2").unwrap();
        assert_eq!(store.get_state("k").unwrap().as_deref(), Some(&b"2"[..]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.put_state("k", b"{}").unwrap();
        assert_eq!(handle.get_state("k").unwrap().as_deref(), Some(&b"{}"[..]));
        assert_eq!(handle.writes(), 1);
        assert!(!handle.is_empty());
    }
}
