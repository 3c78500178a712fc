//! Small TTL cache for pricing lookups.
//!
//! Absorbs repeated breakdown requests from listing screens. Not persistent;
//! entries expire on a short TTL rather than being invalidated on mutation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct CacheSlot<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe map cache with per-instance TTL.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    slots: RwLock<HashMap<K, CacheSlot<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.read().ok()?;
        let slot = slots.get(key)?;
        if slot.expires_at <= Instant::now() {
            return None;
        }
        Some(slot.value.clone())
    }

    pub fn set(&self, key: K, value: V) {
        if let Ok(mut slots) = self.slots.write() {
            slots.insert(
                key,
                CacheSlot {
                    value,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }

    pub fn remove(&self, key: &K) {
        if let Ok(mut slots) = self.slots.write() {
            slots.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.write() {
            slots.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_values() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"k"), None);
        cache.set("k", 42);
        assert_eq!(cache.get(&"k"), Some(42));
        cache.remove(&"k");
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_millis(0));
        cache.set("k", 1);
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn clear_drops_everything() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear();
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), None);
    }
}
