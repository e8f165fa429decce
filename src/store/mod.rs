//! Persistence of the Document Text.
//!
//! A [`KeyValueStore`] is a string-to-string store in the spirit of browser
//! local storage. [`Persistence`] wraps one and keeps a single snapshot under
//! [`SNAPSHOT_KEY`]. Saving is best-effort: store failures are logged and
//! swallowed, never surfaced to the render pipeline.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

pub use file::FileStore;
pub use memory::MemoryStore;

/// The single slot the Document Text is saved under.
pub const SNAPSHOT_KEY: &str = "gitmd:last";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage quota exceeded ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage is disabled")]
    Disabled,
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("storage file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A string key-value store.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the write is refused or fails; the previous value is kept.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Single-slot save/restore of the Document Text.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Save `text` as the current snapshot.
    ///
    /// Returns `false` if the store refused the write. The error itself is
    /// only logged; the in-memory text and the snapshot may then differ.
    pub fn save(&mut self, text: &str) -> bool {
        match self.store.set(SNAPSHOT_KEY, text) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, bytes = text.len(), "snapshot save failed");
                false
            }
        }
    }

    /// The saved snapshot, or `None` when nothing was saved or the store
    /// cannot be read.
    pub fn restore(&self) -> Option<String> {
        match self.store.get(SNAPSHOT_KEY) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "snapshot restore failed");
                None
            }
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_restore_returns_text() {
        let mut persistence = Persistence::new(MemoryStore::new());
        assert!(persistence.save("# hello"));
        assert_eq!(persistence.restore().as_deref(), Some("# hello"));
    }

    #[test]
    fn test_restore_on_empty_store_is_absent() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.restore(), None);
    }

    #[test]
    fn test_empty_text_round_trips() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save("");
        assert_eq!(persistence.restore().as_deref(), Some(""));
    }

    #[test]
    fn test_last_save_wins() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save("one");
        persistence.save("two");
        assert_eq!(persistence.restore().as_deref(), Some("two"));
    }

    #[test]
    fn test_quota_failure_is_swallowed_and_keeps_previous() {
        let mut persistence = Persistence::new(MemoryStore::new().with_quota(32));
        assert!(persistence.save("short"));
        assert!(!persistence.save(&"x".repeat(64)));
        assert_eq!(persistence.restore().as_deref(), Some("short"));
    }

    #[test]
    fn test_disabled_store_restores_absent() {
        let store = MemoryStore::new();
        store.set_disabled(true);
        let mut persistence = Persistence::new(store);
        assert!(!persistence.save("text"));
        assert_eq!(persistence.restore(), None);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let shared = MemoryStore::new();
        let mut persistence: Persistence<Box<dyn KeyValueStore>> =
            Persistence::new(Box::new(shared.clone()));
        persistence.save("boxed");
        assert_eq!(shared.value(SNAPSHOT_KEY).as_deref(), Some("boxed"));
    }
}
