//! Storage backends with injected faults

use std::sync::{
    atomic::{AtomicUsize, Ordering::SeqCst},
    Arc,
};

use async_trait::async_trait;

use super::{
    backend::{HistoryBackend, MemoryBackend},
    error::HistoryError,
};

/// A memory backend that fails a scripted set of operations
#[derive(Debug, Default)]
pub struct FaultyBackend {
    /// The wrapped backend
    inner: MemoryBackend,
    /// The number of upcoming reads to fail
    failing_reads: AtomicUsize,
    /// Whether every write and removal fails
    fail_mutations: bool,
}

impl FaultyBackend {
    /// Fail the next `n` reads
    pub fn fail_next_reads(&self, n: usize) {
        self.failing_reads.store(n, SeqCst);
    }

    /// Fail every write and removal
    pub fn failing_mutations() -> Self {
        Self { fail_mutations: true, ..Default::default() }
    }
}

#[async_trait]
impl HistoryBackend for FaultyBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let pending = self.failing_reads.fetch_update(SeqCst, SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(HistoryError::storage("input/output error"));
        }

        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        if self.fail_mutations {
            return Err(HistoryError::storage("read-only file system"));
        }

        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), HistoryError> {
        if self.fail_mutations {
            return Err(HistoryError::storage("read-only file system"));
        }

        self.inner.remove(key).await
    }
}

/// Lets a test keep a handle on a backend owned by a store
#[async_trait]
impl<B: HistoryBackend> HistoryBackend for Arc<B> {
    async fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
        self.as_ref().read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        self.as_ref().write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), HistoryError> {
        self.as_ref().remove(key).await
    }
}
