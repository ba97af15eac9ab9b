//! Best-effort embedding cache over a pluggable key/value store.

pub mod error;
pub mod layer;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;


pub use error::CacheError;
pub use layer::{CacheConfig, EmbeddingCache};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCacheStore;
pub use store::{CacheStore, MokaCacheStore};
