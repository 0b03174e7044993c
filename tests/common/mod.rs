#![allow(dead_code)]

use std::path::Path;

use profit_ledger::{
    core::FixedClock,
    ledger::EntryStore,
    storage::{JsonFileStore, MemoryStore},
};
use tempfile::TempDir;

pub const KEY: &str = "profit_entries";

pub fn clock() -> FixedClock {
    FixedClock::at(2024, 5, 1, 9, 30, 0).expect("valid local time")
}

/// Store over a fresh in-memory backend; the returned handle observes writes.
pub fn memory_store() -> (EntryStore, MemoryStore) {
    let backend = MemoryStore::new();
    let mut store = EntryStore::new(Box::new(backend.clone()), Box::new(clock()), KEY);
    store.load();
    (store, backend)
}

/// Store persisted under `dir`, loaded like a new session would.
pub fn file_store(dir: &Path) -> EntryStore {
    let backend = JsonFileStore::new(dir.join("store")).expect("create json store");
    let mut store = EntryStore::new(Box::new(backend), Box::new(clock()), KEY);
    store.load();
    store
}

pub fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}
