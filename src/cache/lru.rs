//! LRU Tracker Module
//!
//! Combined index and recency list giving O(1) lookup, move-to-front,
//! arbitrary removal and least-recently-used removal.
//!
//! Nodes live in a slot arena and link to each other by slot index, so the
//! list needs no unsafe pointers. The index maps each key to its slot.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::entry::CacheEntry;

// == List Node ==
#[derive(Debug)]
struct Node<V> {
    entry: CacheEntry<V>,
    /// Towards the head (more recently used)
    prev: Option<usize>,
    /// Towards the tail (less recently used)
    next: Option<usize>,
}

// == LRU Tracker ==
/// Owns every entry and tracks access order for LRU eviction.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// The index and the list are only ever updated together, so the set of
/// indexed keys always equals the set of keys in the list.
#[derive(Debug)]
pub struct LruTracker<V> {
    /// Key to arena slot
    index: HashMap<String, usize>,
    /// Slot arena, `None` marks a free slot
    slots: Vec<Option<Node<V>>>,
    /// Free slots ready for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> Default for LruTracker<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LruTracker<V> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    // == Touch ==
    /// Marks a key as recently used (moves it to the head).
    ///
    /// Returns false and does nothing if the key is not tracked.
    pub fn touch(&mut self, key: &str) -> bool {
        let Some(&slot) = self.index.get(key) else {
            return false;
        };
        if self.head != Some(slot) {
            self.unlink(slot);
            self.link_front(slot);
        }
        true
    }

    // == Insert Front ==
    /// Adds a new entry as the most recently used.
    ///
    /// The key must not already be tracked; callers update existing entries
    /// in place through [`get_mut`](Self::get_mut) and [`touch`](Self::touch).
    pub fn insert_front(&mut self, entry: CacheEntry<V>) {
        debug_assert!(
            !self.index.contains_key(&entry.key),
            "insert_front called for a key already tracked"
        );

        let key = entry.key.clone();
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.index.insert(key, slot);
        self.link_front(slot);
    }

    // == Remove Tail ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the tracker is empty.
    pub fn remove_tail(&mut self) -> Option<CacheEntry<V>> {
        let slot = self.tail?;
        self.release(slot)
    }

    // == Remove ==
    /// Removes a key from both the index and the list.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let slot = *self.index.get(key)?;
        self.release(slot)
    }

    // == Remove Expired ==
    /// Removes every entry expired at `now`.
    ///
    /// Walks the recency list rather than the slot arena, so the cost is
    /// O(len) even after the arena has grown and emptied again.
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let mut expired = Vec::new();
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(node) = self.node(slot) else {
                break;
            };
            if node.entry.is_expired(now) {
                expired.push(slot);
            }
            cursor = node.next;
        }

        for &slot in &expired {
            self.release(slot);
        }
        expired.len()
    }

    // == Lookup ==
    /// Returns the entry for a key without changing its recency.
    pub fn get(&self, key: &str) -> Option<&CacheEntry<V>> {
        let slot = *self.index.get(key)?;
        self.node(slot).map(|node| &node.entry)
    }

    /// Returns the entry for a key mutably without changing its recency.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry<V>> {
        let slot = *self.index.get(key)?;
        self.node_mut(slot).map(|node| &mut node.entry)
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<&CacheEntry<V>> {
        self.tail
            .and_then(|slot| self.node(slot))
            .map(|node| &node.entry)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Iteration ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tracker: self,
            cursor: self.head,
        }
    }

    // == Internal Linking ==
    fn node(&self, slot: usize) -> Option<&Node<V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Detaches a node from its neighbours, leaving it in the arena.
    fn unlink(&mut self, slot: usize) {
        let Some((prev, next)) = self.node(slot).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev {
            Some(prev_slot) => {
                if let Some(prev_node) = self.node_mut(prev_slot) {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next_slot) => {
                if let Some(next_node) = self.node_mut(next_slot) {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = None;
        }
    }

    /// Links a detached node in at the head.
    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(slot) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head_slot) => {
                if let Some(head_node) = self.node_mut(head_slot) {
                    head_node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    /// Unlinks a slot, frees it and drops its key from the index.
    fn release(&mut self, slot: usize) -> Option<CacheEntry<V>> {
        self.unlink(slot);
        let node = self.slots.get_mut(slot)?.take()?;
        self.free.push(slot);
        self.index.remove(&node.entry.key);
        Some(node.entry)
    }

    /// Verifies that the index and the list describe the same key set and
    /// that the links are symmetric.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(node) = self.node(slot) else {
                return false;
            };
            if node.prev != prev || !seen.insert(node.entry.key.as_str()) {
                return false;
            }
            if self.index.get(&node.entry.key) != Some(&slot) {
                return false;
            }
            prev = Some(slot);
            cursor = node.next;
        }
        self.tail == prev && seen.len() == self.index.len()
    }
}

// == Iterator ==
/// Iterator over entries in recency order, most recent first.
pub struct Iter<'a, V> {
    tracker: &'a LruTracker<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a CacheEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tracker.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.entry)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn insert(lru: &mut LruTracker<u32>, key: &str, value: u32) {
        lru.insert_front(CacheEntry::new(key.to_string(), value, None));
    }

    fn keys(lru: &LruTracker<u32>) -> Vec<&str> {
        lru.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_lru_new() {
        let lru: LruTracker<u32> = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert!(lru.peek_oldest().is_none());
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_insert_front() {
        let mut lru = LruTracker::new();

        insert(&mut lru, "key1", 1);
        insert(&mut lru, "key2", 2);
        insert(&mut lru, "key3", 3);

        assert_eq!(lru.len(), 3);
        assert_eq!(keys(&lru), vec!["key3", "key2", "key1"]);
        // key1 is oldest (added first)
        assert_eq!(lru.peek_oldest().map(|e| e.key.as_str()), Some("key1"));
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        insert(&mut lru, "key1", 1);
        insert(&mut lru, "key2", 2);
        insert(&mut lru, "key3", 3);

        // Touch key1 again - should move to front
        assert!(lru.touch("key1"));

        assert_eq!(lru.len(), 3);
        assert_eq!(keys(&lru), vec!["key1", "key3", "key2"]);
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_touch_missing_key_is_noop() {
        let mut lru = LruTracker::new();
        insert(&mut lru, "a", 1);
        insert(&mut lru, "b", 2);

        assert!(!lru.touch("missing"));
        assert_eq!(keys(&lru), vec!["b", "a"]);
    }

    #[test]
    fn test_lru_touch_head_and_middle() {
        let mut lru = LruTracker::new();
        insert(&mut lru, "a", 1);
        insert(&mut lru, "b", 2);
        insert(&mut lru, "c", 3);

        assert!(lru.touch("c"));
        assert_eq!(keys(&lru), vec!["c", "b", "a"]);

        assert!(lru.touch("b"));
        assert_eq!(keys(&lru), vec!["b", "c", "a"]);
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_remove_tail() {
        let mut lru = LruTracker::new();

        insert(&mut lru, "key1", 1);
        insert(&mut lru, "key2", 2);
        insert(&mut lru, "key3", 3);

        let evicted = lru.remove_tail().unwrap();
        assert_eq!(evicted.key, "key1");
        assert_eq!(evicted.value, 1);
        assert_eq!(lru.len(), 2);

        let evicted = lru.remove_tail().unwrap();
        assert_eq!(evicted.key, "key2");
        assert_eq!(lru.len(), 1);
        assert!(!lru.contains("key2"));
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_remove_tail_empty() {
        let mut lru: LruTracker<u32> = LruTracker::new();
        assert!(lru.remove_tail().is_none());
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        insert(&mut lru, "key1", 1);
        insert(&mut lru, "key2", 2);
        insert(&mut lru, "key3", 3);

        let removed = lru.remove("key2").unwrap();
        assert_eq!(removed.value, 2);

        assert_eq!(lru.len(), 2);
        assert!(!lru.contains("key2"));
        assert_eq!(keys(&lru), vec!["key3", "key1"]);
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_remove_nonexistent_key() {
        let mut lru = LruTracker::new();

        insert(&mut lru, "key1", 1);
        insert(&mut lru, "key2", 2);

        // Should not panic or affect existing keys
        assert!(lru.remove("nonexistent").is_none());

        assert_eq!(lru.len(), 2);
        assert!(lru.contains("key1"));
        assert!(lru.contains("key2"));
    }

    #[test]
    fn test_lru_remove_only_entry() {
        let mut lru = LruTracker::new();
        insert(&mut lru, "solo", 1);

        assert!(lru.remove("solo").is_some());
        assert!(lru.is_empty());
        assert!(lru.peek_oldest().is_none());
        assert_eq!(lru.iter().count(), 0);
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_slots_are_reused() {
        let mut lru = LruTracker::new();
        insert(&mut lru, "a", 1);
        insert(&mut lru, "b", 2);
        lru.remove("a");
        insert(&mut lru, "c", 3);

        assert_eq!(lru.slots.len(), 2);
        assert_eq!(keys(&lru), vec!["c", "b"]);
        assert!(lru.is_consistent());
    }

    #[test]
    fn test_lru_get_does_not_touch() {
        let mut lru = LruTracker::new();
        insert(&mut lru, "a", 1);
        insert(&mut lru, "b", 2);

        assert_eq!(lru.get("a").map(|e| e.value), Some(1));
        lru.get_mut("a").unwrap().value = 10;

        assert_eq!(lru.get("a").map(|e| e.value), Some(10));
        assert_eq!(lru.peek_oldest().map(|e| e.key.as_str()), Some("a"));
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruTracker::new();

        insert(&mut lru, "a", 1);
        insert(&mut lru, "b", 2);
        insert(&mut lru, "c", 3);

        // Order after touches: front=[b, c, a]=back
        lru.touch("a");
        lru.touch("c");
        lru.touch("b");

        assert_eq!(lru.remove_tail().map(|e| e.key), Some("a".to_string()));
        assert_eq!(lru.remove_tail().map(|e| e.key), Some("c".to_string()));
        assert_eq!(lru.remove_tail().map(|e| e.key), Some("b".to_string()));
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_remove_expired() {
        let now = Instant::now();
        let mut lru = LruTracker::new();
        let short = Some(now + Duration::from_secs(1));
        let long = Some(now + Duration::from_secs(60));
        lru.insert_front(CacheEntry::new("short".to_string(), 1, short));
        lru.insert_front(CacheEntry::new("forever".to_string(), 2, None));
        lru.insert_front(CacheEntry::new("long".to_string(), 3, long));
        lru.insert_front(CacheEntry::new("shorter".to_string(), 4, Some(now)));

        assert_eq!(lru.remove_expired(now + Duration::from_secs(5)), 2);

        assert_eq!(keys(&lru), vec!["long", "forever"]);
        assert!(lru.is_consistent());

        // Nothing left to expire at the same instant
        assert_eq!(lru.remove_expired(now + Duration::from_secs(5)), 0);
    }

    #[test]
    fn test_lru_remove_expired_after_shrink() {
        let now = Instant::now();
        let deadline = Some(now + Duration::from_secs(1));
        let mut lru = LruTracker::new();

        for i in 0..64 {
            lru.insert_front(CacheEntry::new(format!("key{i}"), i, deadline));
        }
        for i in 0..60 {
            lru.remove(&format!("key{i}"));
        }
        // Reuses freed slots in the middle of the arena
        lru.insert_front(CacheEntry::new("fresh".to_string(), 100, None));

        assert_eq!(lru.slots.len(), 64);
        assert_eq!(lru.len(), 5);

        assert_eq!(lru.remove_expired(now + Duration::from_secs(2)), 4);
        assert_eq!(keys(&lru), vec!["fresh"]);
        assert!(lru.is_consistent());
    }
}
