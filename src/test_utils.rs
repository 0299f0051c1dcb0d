use crate::clock::Clock;
use crate::error::StorageError;
use crate::navigation::{Navigator, Page};
use crate::storage::{KeyValueStorage, MemoryStorage};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// 2024-05-01T12:00:00.000Z
pub const START_MILLIS: i64 = 1_714_564_800_000;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::at(START_MILLIS)
    }

    pub fn at(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis()).expect("valid test timestamp")
    }
}

/// Navigator that remembers every page it was sent to.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pages: Rc<RefCell<Vec<Page>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> Vec<Page> {
        self.pages.borrow().clone()
    }

    pub fn last(&self) -> Option<Page> {
        self.pages.borrow().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, page: Page) {
        self.pages.borrow_mut().push(page);
    }
}

/// Memory storage whose reads or writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    failing_key: Mutex<Option<String>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `set` fail for one key only.
    pub fn fail_sets_of(&self, key: Option<&str>) {
        *self.failing_key.lock() = key.map(str::to_string);
    }

    fn check(&self, flag: &AtomicBool, what: &str) -> Result<(), StorageError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("{} disabled in test", what)));
        }
        Ok(())
    }
}

impl KeyValueStorage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check(&self.fail_reads, "reads")?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "writes")?;
        if self.failing_key.lock().as_deref() == Some(key) {
            return Err(StorageError::Unavailable(format!("writes to {} disabled in test", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check(&self.fail_writes, "writes")?;
        self.inner.remove(key)
    }
}
