//! The durable key-value store that election and vote records live in.

use mongodb::error::Error as DbError;
use thiserror::Error;

mod memory;

pub use memory::MemoryStore;

/// A failed read or write against the substrate.
///
/// A key that has never been written is not an error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{0}")]
    Unavailable(String),
}

/// A key-value store with atomic per-call reads and writes.
///
/// Conflicting writes to the same key are serialized by the implementation;
/// callers perform no locking of their own.
pub trait Substrate: Send + Sync {
    /// Read the bytes stored under `key`, or `None` if it was never written.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing whatever was there.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A substrate whose reads and/or writes always fail.
    pub struct FailingStore {
        pub inner: MemoryStore,
        pub fail_reads: bool,
        pub fail_writes: bool,
    }

    impl FailingStore {
        pub fn reads(inner: MemoryStore) -> Self {
            Self {
                inner,
                fail_reads: true,
                fail_writes: false,
            }
        }

        pub fn writes(inner: MemoryStore) -> Self {
            Self {
                inner,
                fail_reads: false,
                fail_writes: true,
            }
        }
    }

    impl Substrate for FailingStore {
        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            if self.fail_reads {
                return Err(StorageError::Unavailable(format!("read of {key} refused")));
            }
            self.inner.get_state(key)
        }

        fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Unavailable(format!("write of {key} refused")));
            }
            self.inner.put_state(key, value)
        }
    }
}
