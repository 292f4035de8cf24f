//! The opaque key-value / list / pub-sub surface.
//!
//! The real store is an external collaborator; the engine only depends on
//! this trait. [`MemoryStore`] is the in-process implementation used by
//! tests and by hosts that run without a server.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;

/// Key-value, list and pub/sub operations the adapter needs.
///
/// Implementations serialize their own writes per key; callers never hold
/// locks across calls.
pub trait KvStore: Send + Sync {
    /// Sets a plain value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Reads a plain value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Pushes to the front of a list, returning the new length.
    fn list_push(&self, key: &str, value: &str) -> Result<usize, StoreError>;

    /// Trims a list to its first `max_len` entries.
    fn list_trim(&self, key: &str, max_len: usize) -> Result<(), StoreError>;

    /// Reads the whole list, front first.
    fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Publishes a message on a channel.
    fn publish(&self, channel: &str, message: &str) -> Result<(), StoreError>;

    /// Atomic read-modify-write of a plain value. The closure receives the
    /// current value and returns the replacement (`None` deletes the key).
    fn transaction(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<(), StoreError>;
}

#[derive(Default)]
struct MemoryState {
    values: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
    published: Vec<(String, String)>,
}

/// In-memory [`KvStore`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published so far, in order. Test hook.
    pub fn published(&self) -> Vec<(String, String)> {
        self.state.lock().expect("store lock poisoned").published.clone()
    }
}

impl KvStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let state = self.state.lock().expect("store lock poisoned");
        Ok(state.values.get(key).cloned())
    }

    fn list_push(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        let list = state.lists.entry(key.to_string()).or_default();
        list.insert(0, value.to_string());
        Ok(list.len())
    }

    fn list_trim(&self, key: &str, max_len: usize) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        if let Some(list) = state.lists.get_mut(key) {
            list.truncate(max_len);
        }
        Ok(())
    }

    fn list_range(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let state = self.state.lock().expect("store lock poisoned");
        Ok(state.lists.get(key).cloned().unwrap_or_default())
    }

    fn publish(&self, channel: &str, message: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        state
            .published
            .push((channel.to_string(), message.to_string()));
        Ok(())
    }

    fn transaction(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        let current = state.values.get(key).cloned();
        match apply(current) {
            Some(next) => state.values.insert(key.to_string(), next),
            None => state.values.remove(key),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kv_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_list_push_front_and_trim() {
        let store = MemoryStore::new();
        store.list_push("l", "a").unwrap();
        store.list_push("l", "b").unwrap();
        store.list_push("l", "c").unwrap();
        assert_eq!(store.list_range("l").unwrap(), vec!["c", "b", "a"]);

        store.list_trim("l", 2).unwrap();
        assert_eq!(store.list_range("l").unwrap(), vec!["c", "b"]);
    }

    #[test]
    fn test_transaction_replaces_atomically() {
        let store = MemoryStore::new();
        store.set("counter", "1").unwrap();
        store
            .transaction("counter", &mut |cur| {
                let n: i64 = cur.as_deref().unwrap_or("0").parse().unwrap_or(0);
                Some((n + 1).to_string())
            })
            .unwrap();
        assert_eq!(store.get("counter").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_publish_records_messages() {
        let store = MemoryStore::new();
        store.publish("chan", "hello").unwrap();
        assert_eq!(
            store.published(),
            vec![("chan".to_string(), "hello".to_string())]
        );
    }
}
