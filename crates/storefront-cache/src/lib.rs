//! Key-value persistence for storefront client state.
//!
//! Stands in for browser local storage: a tiny byte-oriented [`KvStore`]
//! interface with in-memory and file-backed implementations, plus a typed
//! [`Cache`] wrapper with automatic JSON serialization.
//!
//! # Example
//!
//! ```rust
//! use storefront_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! cache.set("cart", &vec![1, 2, 3]).unwrap();
//! let items: Option<Vec<u32>> = cache.get("cart").unwrap();
//! assert_eq!(items, Some(vec![1, 2, 3]));
//!
//! cache.delete("cart").unwrap();
//! assert!(!cache.exists("cart").unwrap());
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
