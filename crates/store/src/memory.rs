use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{RecordStore, Result, StoreError};

#[derive(Debug, Default)]
struct InMemoryState {
    lines: Vec<String>,
    fail_on_write: bool,
    fail_after_writes: Option<usize>,
    fail_once_at: Option<usize>,
    writes: usize,
}

/// In-memory record store for testing.
///
/// Clones share the same contents, so a test can keep a handle and inspect
/// what a store wrote, or inject failures while the store owns another clone.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with raw lines (malformed ones included).
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store.write().lines = lines.into_iter().map(Into::into).collect();
        store
    }

    /// Makes every following write fail until switched off again.
    pub fn set_fail_on_write(&self, fail: bool) {
        self.write().fail_on_write = fail;
    }

    /// Lets `count` more writes succeed, then fails every write after them.
    pub fn fail_after_writes(&self, count: usize) {
        let mut state = self.write();
        state.fail_after_writes = Some(state.writes + count);
    }

    /// Lets `count` more writes succeed, fails the next one, then recovers.
    pub fn fail_once_after_writes(&self, count: usize) {
        let mut state = self.write();
        state.fail_once_at = Some(state.writes + count);
    }

    /// Switches off every injected failure.
    pub fn clear_failures(&self) {
        let mut state = self.write();
        state.fail_on_write = false;
        state.fail_after_writes = None;
        state.fail_once_at = None;
    }

    /// Returns a copy of the stored lines.
    pub fn lines(&self) -> Vec<String> {
        self.read().lines.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.read().writes
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(state: &mut InMemoryState) -> Result<()> {
        let exhausted = state
            .fail_after_writes
            .is_some_and(|limit| state.writes >= limit);
        let one_off = state.fail_once_at == Some(state.writes);
        if one_off {
            state.fail_once_at = None;
        }
        if state.fail_on_write || exhausted || one_off {
            return Err(StoreError::Unavailable("simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        Ok(self.lines())
    }

    fn append_line(&self, line: &str) -> Result<()> {
        let mut state = self.write();
        Self::check_writable(&mut state)?;
        state.lines.push(line.to_string());
        state.writes += 1;
        Ok(())
    }

    fn replace_all(&self, lines: &[String]) -> Result<()> {
        let mut state = self.write();
        Self::check_writable(&mut state)?;
        state.lines = lines.to_vec();
        state.writes += 1;
        Ok(())
    }
}
