//! The `SessionStore` trait and an in-memory implementation.
//!
//! The trait is implemented by storage backends (e.g. `tindev-store-sqlite`).
//! The screens depend on this abstraction, never on a concrete backend.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A small persistent key-value store.
///
/// All methods return `Send` futures so the trait can be used from tasks
/// spawned on a multi-threaded tokio runtime.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`. Returns `None` if unset.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Insert or overwrite the value stored under `key`.
  fn set<'a>(
    &'a self,
    key: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove every key.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// A [`SessionStore`] that forgets everything when the process exits.
///
/// Cloning is cheap; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    // A poisoned map is still a valid map.
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl SessionStore for MemoryStore {
  type Error = Infallible;

  async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    Ok(self.entries().get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    self.entries().insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  async fn clear(&self) -> Result<(), Self::Error> {
    self.entries().clear();
    Ok(())
  }
}
