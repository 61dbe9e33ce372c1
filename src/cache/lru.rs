//! Bounded LRU cache with O(1) operations
//!
//! A HashMap maps each key to an index into an arena of nodes; the nodes
//! form a doubly-linked recency list through explicit prev/next indices.
//! Head is most-recently used, tail is least-recently used, and eviction
//! always removes the tail. Index links instead of pointers keep the
//! structure free of reference cycles and unsafe code.

use std::collections::HashMap;

/// Null link in the recency list
const NIL: usize = usize::MAX;

/// One cached entry plus its position in the recency list
#[derive(Debug)]
struct Node {
    key: String,
    value: String,
    prev: usize,
    next: usize,
}

/// Occupancy snapshot returned by [`LruCache::stats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently held
    pub len: usize,

    /// Fixed capacity the cache was built with
    pub capacity: usize,

    /// Entries evicted since construction
    pub evictions: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} entries used, {} evicted",
            self.len, self.capacity, self.evictions
        )
    }
}

/// Fixed-capacity key-value store with least-recently-used eviction
pub struct LruCache {
    capacity: usize,
    /// Key → arena index
    map: HashMap<String, usize>,
    /// Node storage; slots are recycled through `free`
    arena: Vec<Node>,
    /// Most-recently used node, or NIL when empty
    head: usize,
    /// Least-recently used node, or NIL when empty
    tail: usize,
    /// Recycled arena slots
    free: Vec<usize>,
    evictions: u64,
}

impl LruCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be at least 1");
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            arena: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: Vec::new(),
            evictions: 0,
        }
    }

    /// Look up a key, promoting it to most-recently used on a hit.
    ///
    /// A miss is a normal outcome and leaves size and recency order
    /// untouched.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        Some(self.arena[idx].value.as_str())
    }

    /// Insert or overwrite a key, promoting it to most-recently used.
    ///
    /// Returns the previous value when the key already existed (size
    /// unchanged). A new key that would push the cache past capacity
    /// evicts exactly the least-recently-used entry first.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some(&idx) = self.map.get(&key) {
            let old = std::mem::replace(&mut self.arena[idx].value, value);
            self.promote(idx);
            return Some(old);
        }

        if self.map.len() == self.capacity {
            self.evict_lru();
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: NIL,
            next: NIL,
        };
        let idx = match self.free.pop() {
            Some(slot) => {
                self.arena[slot] = node;
                slot
            }
            None => {
                self.arena.push(node);
                self.arena.len() - 1
            }
        };

        self.map.insert(key, idx);
        self.push_front(idx);
        None
    }

    /// O(1) occupancy snapshot
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            len: self.map.len(),
            capacity: self.capacity,
            evictions: self.evictions,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The entry next in line for eviction, if any
    pub fn peek_lru(&self) -> Option<(&str, &str)> {
        if self.tail == NIL {
            return None;
        }
        let node = &self.arena[self.tail];
        Some((node.key.as_str(), node.value.as_str()))
    }

    /// Remove the tail node and its index entry
    fn evict_lru(&mut self) {
        let idx = self.tail;
        debug_assert_ne!(idx, NIL, "evict called on an empty cache");

        self.unlink(idx);
        self.map.remove(&self.arena[idx].key);
        self.free.push(idx);
        self.evictions += 1;
    }

    /// Move a linked node to the head of the recency list
    fn promote(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Detach a node from the list, patching its neighbors
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.arena[idx].prev, self.arena[idx].next);

        match prev {
            NIL => self.head = next,
            p => self.arena[p].next = next,
        }
        match next {
            NIL => self.tail = prev,
            n => self.arena[n].prev = prev,
        }
    }

    /// Attach a detached node at the head of the list
    fn push_front(&mut self, idx: usize) {
        self.arena[idx].prev = NIL;
        self.arena[idx].next = self.head;

        match self.head {
            NIL => self.tail = idx,
            h => self.arena[h].prev = idx,
        }
        self.head = idx;
    }
}

impl std::fmt::Debug for LruCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("evictions", &self.evictions)
            .finish()
    }
}
