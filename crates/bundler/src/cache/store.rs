//! A typed keyed store for process-wide shared state.
//!
//! The key space of a `CacheStore` is fixed and known at setup time: it is
//! a structured settings/state registry, not a general-purpose unbounded
//! map. Each key holds exactly one value type, and absence is distinct from
//! an explicitly stored falsy value.
//!
//! There is no built-in mutual exclusion across operations: callers that
//! mutate the same key from multiple concurrent flows either serialize
//! writes externally or accept last-write-wins, which is the documented
//! default.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

use thiserror::Error;

use tandem_core::{Diagnostic, ErrorCategory, ErrorCode};

/// Errors raised by [`CacheStore`].
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("cache key '{key}' is not initialized")]
  UninitializedKey { key: String },
}

impl Diagnostic for CacheError {
  fn code(&self) -> ErrorCode {
    match self {
      CacheError::UninitializedKey { .. } => ErrorCode::UninitializedKey,
    }
  }

  fn category(&self) -> ErrorCategory {
    ErrorCategory::Runtime
  }
}

/// A keyed store with typed values.
pub struct CacheStore<K, V> {
  entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for CacheStore<K, V> {
  fn default() -> Self {
    Self {
      entries: RwLock::new(HashMap::new()),
    }
  }
}

impl<K, V> CacheStore<K, V>
where
  K: Eq + Hash,
  V: Clone,
{
  pub fn new() -> Self {
    Self::default()
  }

  /// The stored value for `key`, or `None`. Never fails.
  pub fn get<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.entries.read().unwrap().get(key).cloned()
  }

  /// The stored value for `key`, failing with
  /// [`CacheError::UninitializedKey`] when absent. Intended for keys that
  /// must be set during a bootstrap phase before first use.
  pub fn require<Q>(&self, key: &Q) -> Result<V, CacheError>
  where
    K: Borrow<Q>,
    Q: Eq + Hash + fmt::Display + ?Sized,
  {
    self.get(key).ok_or_else(|| CacheError::UninitializedKey {
      key: key.to_string(),
    })
  }

  /// Store `value` under `key`, overwriting unconditionally.
  pub fn set(&self, key: K, value: V) {
    self.entries.write().unwrap().insert(key, value);
  }

  pub fn has<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.entries.read().unwrap().contains_key(key)
  }

  /// Remove `key`, reporting whether it was present.
  pub fn delete<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Eq + Hash + ?Sized,
  {
    self.entries.write().unwrap().remove(key).is_some()
  }

  /// Remove every entry.
  pub fn clear(&self) {
    self.entries.write().unwrap().clear();
  }

  pub fn len(&self) -> usize {
    self.entries.read().unwrap().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  enum Key {
    Template,
    Port,
  }

  impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
        Key::Template => f.write_str("template"),
        Key::Port => f.write_str("port"),
      }
    }
  }

  #[test]
  fn get_returns_none_for_absent_keys() {
    let store: CacheStore<Key, String> = CacheStore::new();
    assert_eq!(store.get(&Key::Template), None);
  }

  #[test]
  fn absence_is_distinct_from_stored_falsy_values() {
    let store: CacheStore<Key, Option<u16>> = CacheStore::new();
    store.set(Key::Port, None);

    // An explicitly stored "nothing" is still a hit.
    assert_eq!(store.get(&Key::Port), Some(None));
    assert!(store.has(&Key::Port));
    assert!(!store.has(&Key::Template));
  }

  #[test]
  fn require_fails_with_uninitialized_key() {
    let store: CacheStore<Key, String> = CacheStore::new();

    let err = store.require(&Key::Template).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UninitializedKey);
    assert_eq!(err.category(), ErrorCategory::Runtime);
    assert!(err.to_string().contains("template"));

    store.set(Key::Template, "<html></html>".to_string());
    assert_eq!(store.require(&Key::Template).unwrap(), "<html></html>");
  }

  #[test]
  fn set_overwrites_unconditionally() {
    let store: CacheStore<Key, u16> = CacheStore::new();
    store.set(Key::Port, 3000);
    store.set(Key::Port, 4000);

    assert_eq!(store.get(&Key::Port), Some(4000));
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn delete_reports_presence() {
    let store: CacheStore<Key, u16> = CacheStore::new();
    store.set(Key::Port, 3000);

    assert!(store.delete(&Key::Port));
    assert!(!store.delete(&Key::Port));
    assert_eq!(store.get(&Key::Port), None);
  }

  #[test]
  fn clear_empties_the_store() {
    let store: CacheStore<Key, u16> = CacheStore::new();
    store.set(Key::Port, 3000);
    store.set(Key::Template, 1);

    store.clear();
    assert!(store.is_empty());
  }

  #[test]
  fn string_keys_support_borrowed_lookup() {
    let store: CacheStore<String, u32> = CacheStore::new();
    store.set("main.js".to_string(), 1);

    assert_eq!(store.get("main.js"), Some(1));
    assert!(store.require("missing.js").is_err());
  }
}
