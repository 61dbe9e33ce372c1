//! Cache Tests
//!
//! LRU eviction-order behavior and the shared handle under concurrency.

use lrukv::{LruCache, SharedCache};

// =============================================================================
// Eviction Order
// =============================================================================

#[test]
fn test_insert_past_capacity_evicts_oldest() {
    let mut cache = LruCache::new(4);
    for i in 1..=5 {
        cache.put(format!("k{i}"), format!("v{i}"));
    }

    assert_eq!(cache.len(), 4);
    assert_eq!(cache.get("k1"), None);
    for i in 2..=5 {
        assert_eq!(cache.get(&format!("k{i}")), Some(format!("v{i}").as_str()));
    }
}

#[test]
fn test_reaccess_changes_eviction_victim() {
    let mut cache = LruCache::new(3);
    cache.put("k1", "v1");
    cache.put("k2", "v2");
    cache.put("k3", "v3");

    // k1 touched after k2's insertion, so k2 is now least recently used
    assert_eq!(cache.get("k1"), Some("v1"));

    cache.put("k4", "v4");
    assert_eq!(cache.get("k2"), None);
    assert_eq!(cache.get("k1"), Some("v1"));
    assert_eq!(cache.get("k4"), Some("v4"));
}

#[test]
fn test_miss_does_not_disturb_size_or_order() {
    let mut cache = LruCache::new(2);
    cache.put("a", "1");
    cache.put("b", "2");

    assert_eq!(cache.get("missing"), None);
    assert_eq!(cache.len(), 2);

    // "a" is still the eviction victim: the miss promoted nothing
    cache.put("c", "3");
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some("2"));
}

#[test]
fn test_overwrite_updates_and_promotes_without_growth() {
    let mut cache = LruCache::new(2);
    cache.put("a", "1");
    cache.put("b", "2");

    assert_eq!(cache.put("a", "10"), Some("1".to_string()));
    assert_eq!(cache.len(), 2);

    // The overwrite promoted "a", so "b" gets evicted next
    cache.put("c", "3");
    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some("10"));
}

#[test]
fn test_capacity_one() {
    let mut cache = LruCache::new(1);
    cache.put("a", "1");
    cache.put("b", "2");

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some("2"));
}

// =============================================================================
// Stats
// =============================================================================

#[test]
fn test_stats_snapshot() {
    let mut cache = LruCache::new(3);
    assert_eq!(cache.stats().len, 0);
    assert_eq!(cache.stats().capacity, 3);
    assert_eq!(cache.stats().evictions, 0);

    cache.put("a", "1");
    cache.put("b", "2");
    let stats = cache.stats();
    assert_eq!(stats.len, 2);
    assert_eq!(stats.capacity, 3);

    cache.put("c", "3");
    cache.put("d", "4");
    cache.put("e", "5");
    let stats = cache.stats();
    assert_eq!(stats.len, 3);
    assert_eq!(stats.evictions, 2);
}

#[test]
fn test_stats_display_embeds_occupancy() {
    let mut cache = LruCache::new(10);
    cache.put("a", "1");
    cache.put("b", "2");

    let text = cache.stats().to_string();
    assert!(text.contains("2 of 10"), "unexpected stats text: {text}");
}

// =============================================================================
// Shared Handle
// =============================================================================

#[test]
fn test_shared_cache_basic_operations() {
    let cache = SharedCache::new(2);

    assert_eq!(cache.put("a", "1"), None);
    assert_eq!(cache.put("a", "2"), Some("1".to_string()));
    assert_eq!(cache.get("a"), Some("2".to_string()));
    assert_eq!(cache.get("missing"), None);
    assert_eq!(cache.stats().len, 1);
}

#[test]
fn test_concurrent_hammering_never_exceeds_capacity() {
    const CAPACITY: usize = 10;
    const WORKERS: usize = 8;
    const OPS: usize = 200;

    let cache = SharedCache::new(CAPACITY);

    crossbeam::thread::scope(|s| {
        for worker in 0..WORKERS {
            let cache = cache.clone();
            s.spawn(move |_| {
                for i in 0..OPS {
                    // 20 overlapping keys across 8 workers
                    let key = format!("key{}", (worker * 7 + i) % 20);
                    cache.put(key.clone(), format!("w{worker}-{i}"));
                    cache.get(&key);
                }
            });
        }
    })
    .unwrap();

    assert!(
        cache.len() <= CAPACITY,
        "cache grew past capacity: {}",
        cache.len()
    );
}

#[test]
fn test_concurrent_puts_are_never_lost() {
    // Capacity far above the distinct key count, so nothing is evicted
    // and every committed put must remain visible.
    const WORKERS: usize = 8;
    const ROUNDS: usize = 50;

    let cache = SharedCache::new(100);

    crossbeam::thread::scope(|s| {
        for worker in 0..WORKERS {
            let cache = cache.clone();
            s.spawn(move |_| {
                let own_key = format!("own{worker}");
                for round in 0..ROUNDS {
                    cache.put(own_key.clone(), round.to_string());
                    // interleave traffic on keys shared by all workers
                    let shared = format!("shared{}", round % 10);
                    cache.put(shared.clone(), format!("w{worker}"));
                    cache.get(&shared);
                }
            });
        }
    })
    .unwrap();

    for worker in 0..WORKERS {
        assert_eq!(
            cache.get(&format!("own{worker}")),
            Some((ROUNDS - 1).to_string()),
            "lost the last put of worker {worker}"
        );
    }
}
