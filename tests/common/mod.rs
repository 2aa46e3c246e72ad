//! Shared test infrastructure: temp-file databases, a recording status sink,
//! and a store wrapper with scripted failures.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use tempfile::TempDir;

use vitrine::db::{self, DbPool};
use vitrine::errors::StoreError;
use vitrine::moc::{Level, OrderedRecord, Payload, RecordId, RecordStore, StatusSink};

/// Temp SQLite database with migrations applied. Keep the TempDir alive for
/// as long as the pool is used.
pub fn setup_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let pool = db::init_pool(db_path.to_str().expect("utf-8 path"));
    db::run_migrations(&pool);
    (dir, pool)
}

/// Sink that records notifications instead of logging, and can be told to
/// decline confirmations.
pub struct RecordingSink {
    pub notices: RefCell<Vec<(Level, String)>>,
    pub confirms: RefCell<Vec<String>>,
    accept_confirms: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink {
            notices: RefCell::new(Vec::new()),
            confirms: RefCell::new(Vec::new()),
            accept_confirms: true,
        }
    }

    pub fn declining() -> Self {
        RecordingSink {
            accept_confirms: false,
            ..RecordingSink::new()
        }
    }

    pub fn has_error(&self) -> bool {
        self.notices
            .borrow()
            .iter()
            .any(|(level, _)| *level == Level::Error)
    }
}

impl StatusSink for RecordingSink {
    fn notify(&self, level: Level, message: &str) {
        self.notices.borrow_mut().push((level, message.to_string()));
    }

    fn confirm(&self, message: &str, on_confirm: Box<dyn FnOnce() + '_>) {
        self.confirms.borrow_mut().push(message.to_string());
        if self.accept_confirms {
            on_confirm();
        }
    }
}

/// Wraps a real store and fails scripted calls. Calls are numbered from 1
/// across all operations, in invocation order.
pub struct FlakyStore<'a, S> {
    inner: &'a S,
    calls: Cell<usize>,
    fail_on: Vec<usize>,
    fail_all: bool,
}

impl<'a, S> FlakyStore<'a, S> {
    pub fn new(inner: &'a S, fail_on: Vec<usize>) -> Self {
        FlakyStore {
            inner,
            calls: Cell::new(0),
            fail_on,
            fail_all: false,
        }
    }

    /// Every call fails: proves an operation never reached the store.
    pub fn failing_all(inner: &'a S) -> Self {
        FlakyStore {
            inner,
            calls: Cell::new(0),
            fail_on: Vec::new(),
            fail_all: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn tick(&self) -> Result<(), StoreError> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if self.fail_all || self.fail_on.contains(&n) {
            return Err(StoreError::Query(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

impl<P: Payload, S: RecordStore<P>> RecordStore<P> for FlakyStore<'_, S> {
    fn fetch_all(&self) -> Result<Vec<OrderedRecord<P>>, StoreError> {
        self.tick()?;
        self.inner.fetch_all()
    }

    fn insert(&self, record: &OrderedRecord<P>) -> Result<RecordId, StoreError> {
        self.tick()?;
        self.inner.insert(record)
    }

    fn update(&self, id: RecordId, record: &OrderedRecord<P>) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.update(id, record)
    }

    fn update_order(&self, id: RecordId, order: i64) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.update_order(id, order)
    }

    fn set_published(&self, id: RecordId, published: bool) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.set_published(id, published)
    }

    fn delete_one(&self, id: RecordId) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.delete_one(id)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.delete_all()
    }

    fn upsert_many(&self, records: &[OrderedRecord<P>]) -> Result<(), StoreError> {
        self.tick()?;
        self.inner.upsert_many(records)
    }
}
