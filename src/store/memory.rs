use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{KeyValueStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    disabled: bool,
    writes: usize,
}

/// In-process store. Clones share the same entries, so a caller can keep a
/// handle to a store it has given away.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse writes that would make the stored keys and values exceed `bytes`.
    #[must_use]
    pub fn with_quota(self, bytes: usize) -> Self {
        self.inner.borrow_mut().quota = Some(bytes);
        self
    }

    /// Make every read and write fail, as when storage is turned off.
    pub fn set_disabled(&self, disabled: bool) {
        self.inner.borrow_mut().disabled = disabled;
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Inspect a value without going through [`KeyValueStore`].
    pub fn value(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let inner = self.inner.borrow();
        if inner.disabled {
            return Err(StoreError::Disabled);
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.disabled {
            return Err(StoreError::Disabled);
        }
        if let Some(quota) = inner.quota {
            let needed = stored_bytes_after(&inner.entries, key, value);
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

/// Total key and value bytes once `key` holds `value`.
pub(super) fn stored_bytes_after(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
) -> usize {
    entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum::<usize>()
        + key.len()
        + value.len()
}
