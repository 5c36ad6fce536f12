//! Best-effort persistence for the popup "already shown" flag
//!
//! Features:
//! - Ordered list of independent backends (durable store, then cookie)
//! - Reads: first backend holding a truthy flag wins
//! - Writes/clears go to every backend; one failing never blocks the others
//! - Failures are logged and treated as "not shown" (fail open)

pub mod cookie;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use self::cookie::{CookieJar, CookieStore, MemoryCookieJar};
pub use self::memory::MemoryStore;

use crate::error::StorageError;

/// A key-value backend able to hold the flag
pub trait FlagStore {
    /// Short name for logs
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// A boolean flag replicated across several backends
pub struct LayeredFlag {
    key: String,
    backends: Vec<Box<dyn FlagStore>>,
}

impl std::fmt::Debug for LayeredFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredFlag")
            .field("key", &self.key)
            .field("backends", &self.backend_names())
            .finish()
    }
}

impl LayeredFlag {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            backends: Vec::new(),
        }
    }

    /// Append a backend; read order follows insertion order
    pub fn with_backend(mut self, backend: impl FlagStore + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// True if any backend reports the flag as set
    pub fn is_set(&self) -> bool {
        for backend in &self.backends {
            match read_flag(backend.as_ref(), &self.key) {
                Ok(true) => {
                    log::debug!("Flag `{}` found in {}", self.key, backend.name());
                    return true;
                }
                Ok(false) => {}
                Err(e) => log::warn!("Reading `{}` from {} failed: {}", self.key, backend.name(), e),
            }
        }
        false
    }

    /// Write the flag everywhere. Returns how many backends accepted it.
    pub fn set(&mut self) -> usize {
        let value = match serde_json::to_string(&true) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Encoding flag `{}` failed: {}", self.key, e);
                return 0;
            }
        };

        let mut written = 0;
        for backend in &mut self.backends {
            match backend.set(&self.key, &value) {
                Ok(()) => written += 1,
                Err(e) => log::warn!("Writing `{}` to {} failed: {}", self.key, backend.name(), e),
            }
        }
        written
    }

    /// Remove the flag everywhere. Returns how many backends cleared it.
    pub fn clear(&mut self) -> usize {
        let mut cleared = 0;
        for backend in &mut self.backends {
            match backend.remove(&self.key) {
                Ok(()) => cleared += 1,
                Err(e) => log::warn!("Clearing `{}` in {} failed: {}", self.key, backend.name(), e),
            }
        }
        cleared
    }
}

fn read_flag(backend: &dyn FlagStore, key: &str) -> Result<bool, StorageError> {
    match backend.get(key)? {
        Some(raw) => Ok(serde_json::from_str::<bool>(&raw)?),
        None => Ok(false),
    }
}

/// Durable store plus 30-day cookie, in that read order
#[cfg(target_arch = "wasm32")]
pub fn default_layers(key: &str) -> LayeredFlag {
    LayeredFlag::new(key)
        .with_backend(web::LocalStorageStore)
        .with_backend(CookieStore::new(web::DocumentCookieJar))
}

/// Native stand-in: in-memory store plus an in-memory cookie jar
#[cfg(not(target_arch = "wasm32"))]
pub fn default_layers(key: &str) -> LayeredFlag {
    LayeredFlag::new(key)
        .with_backend(MemoryStore::new())
        .with_backend(CookieStore::new(MemoryCookieJar::new()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend that fails every operation
    pub(crate) struct BrokenStore;

    impl FlagStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("broken"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken"))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken"))
        }
    }

    #[test]
    fn test_set_then_read() {
        let mut flag = default_layers("promo_shown");
        assert!(!flag.is_set());
        assert_eq!(flag.set(), 2);
        assert!(flag.is_set());
        assert_eq!(flag.clear(), 2);
        assert!(!flag.is_set());
    }

    #[test]
    fn test_either_layer_is_enough() {
        let store = MemoryStore::new();
        let jar = MemoryCookieJar::new();
        let mut flag = LayeredFlag::new("k")
            .with_backend(store.clone())
            .with_backend(CookieStore::new(jar.clone()));
        flag.set();

        // Durable store wiped, cookie survives
        store.clone().remove("k").unwrap();
        assert!(flag.is_set());

        // Only the durable store survives
        flag.set();
        CookieStore::new(jar.clone()).remove("k").unwrap();
        assert!(flag.is_set());
    }

    #[test]
    fn test_broken_backend_is_isolated() {
        let store = MemoryStore::new();
        let mut flag = LayeredFlag::new("k")
            .with_backend(BrokenStore)
            .with_backend(store.clone());

        assert!(!flag.is_set());
        assert_eq!(flag.set(), 1);
        assert!(flag.is_set());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("true"));
        assert_eq!(flag.clear(), 1);
        assert!(!flag.is_set());
    }

    #[test]
    fn test_garbage_value_reads_as_unset() {
        let mut store = MemoryStore::new();
        store.set("k", "not json").unwrap();
        let flag = LayeredFlag::new("k").with_backend(store);
        assert!(!flag.is_set());
    }

    #[test]
    fn test_debug_lists_backends() {
        let flag = default_layers("k");
        assert_eq!(flag.backend_names(), vec!["memory", "cookie"]);
        assert!(format!("{:?}", flag).contains("cookie"));
    }
}
