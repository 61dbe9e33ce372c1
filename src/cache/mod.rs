//! Cache Module
//!
//! The bounded LRU store and the synchronized handle shared by workers.
//!
//! ## Architecture
//! - `LruCache`: single-owner arena-backed LRU map, O(1) get/put
//! - `SharedCache`: cloneable `Arc<Mutex<LruCache>>` handle; every cache
//!   operation is atomic with respect to the others

mod lru;
mod shared;

pub use lru::{CacheStats, LruCache};
pub use shared::SharedCache;
