//! Storage Module
//!
//! Pluggable key-value backends behind the minimal browser-storage
//! contract, with a routing adapter that picks a backend per call.

mod file;
mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

// == Backend Selector ==
/// Selects which of the two storage backends an operation targets.
///
/// Durable storage survives process restarts; ephemeral storage lives
/// only as long as the process. The two backends are independent and
/// never share a key's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Persists across restarts (file-backed by default)
    Durable,
    /// Cleared when the process ends (in-memory)
    Ephemeral,
}

impl Backend {
    /// Both backends, in scan order.
    pub const ALL: [Backend; 2] = [Backend::Durable, Backend::Ephemeral];
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Durable => write!(f, "durable"),
            Backend::Ephemeral => write!(f, "ephemeral"),
        }
    }
}

// == Key-Value Storage Contract ==
/// Minimal key-value store contract.
///
/// Mirrors the browser-storage surface (`getItem`/`setItem`/`removeItem`
/// plus an enumerable key list) so any key-value store can slot in.
/// Reads of missing keys return `None`, never an error. Only writes can
/// fail, and they fail with a distinguishable error so callers can log
/// and continue.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored value, or None if the key is absent.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores a value under the key, overwriting any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the key. Removing an absent key is a no-op.
    fn remove_item(&self, key: &str);

    /// Returns every key currently present, unfiltered.
    fn keys(&self) -> Vec<String>;
}

// == Storage Adapter ==
/// Routes storage operations to the durable or ephemeral backend.
pub struct StorageAdapter {
    durable: Box<dyn KeyValueStorage>,
    ephemeral: Box<dyn KeyValueStorage>,
}

impl StorageAdapter {
    /// Creates an adapter over explicit backend implementations.
    pub fn new(durable: Box<dyn KeyValueStorage>, ephemeral: Box<dyn KeyValueStorage>) -> Self {
        Self { durable, ephemeral }
    }

    /// Creates the standard deployment pairing: file-backed durable
    /// storage in the platform cache directory, in-memory ephemeral.
    ///
    /// Returns None when no cache directory can be determined.
    pub fn persistent() -> Option<Self> {
        let durable = FileStorage::new()?;
        Some(Self::new(
            Box::new(durable),
            Box::new(MemoryStorage::new()),
        ))
    }

    /// Creates an adapter with both backends in memory.
    ///
    /// The "durable" side still behaves as an independent namespace; it
    /// just does not survive the process. Intended for tests and for
    /// deployments without filesystem access.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStorage::new()),
            Box::new(MemoryStorage::new()),
        )
    }

    fn select(&self, backend: Backend) -> &dyn KeyValueStorage {
        match backend {
            Backend::Durable => self.durable.as_ref(),
            Backend::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Reads a raw value. Absent keys read as None.
    pub fn read(&self, backend: Backend, key: &str) -> Option<String> {
        self.select(backend).get_item(key)
    }

    /// Writes a raw value, overwriting any previous one.
    pub fn write(&self, backend: Backend, key: &str, value: &str) -> Result<()> {
        self.select(backend).set_item(key, value)
    }

    /// Removes a key. Removing an absent key is a no-op.
    pub fn remove(&self, backend: Backend, key: &str) {
        self.select(backend).remove_item(key)
    }

    /// Returns every key in the backend, unfiltered.
    pub fn keys(&self, backend: Backend) -> Vec<String> {
        self.select(backend).keys()
    }
}
