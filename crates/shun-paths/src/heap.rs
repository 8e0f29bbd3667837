//! Addressable binary min-heap keyed by a two-component [`Key`].
//!
//! Both searches need to change the priority of, or drop, nodes that are
//! already queued. The heap keeps a node → slot index next to its array so
//! that `push` (insert or re-prioritise), `remove` and `contains` are
//! O(log n) / O(1) instead of a linear scan.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// A composite priority compared lexicographically: `primary` first, then
/// `secondary`. Uses [`f64::total_cmp`] so the order is total.
#[derive(Copy, Clone, Debug)]
pub struct Key {
    pub primary: f64,
    pub secondary: f64,
}

impl Key {
    #[inline]
    pub const fn new(primary: f64, secondary: f64) -> Self {
        Self { primary, secondary }
    }
}

impl Ord for Key {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.primary
            .total_cmp(&other.primary)
            .then(self.secondary.total_cmp(&other.secondary))
    }
}

impl PartialOrd for Key {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

/// Indexed binary min-heap over nodes of type `N`.
#[derive(Clone, Debug)]
pub struct IndexedHeap<N> {
    entries: Vec<(N, Key)>,
    slots: HashMap<N, usize>,
}

impl<N> Default for IndexedHeap<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> IndexedHeap<N> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: &N) -> bool {
        self.slots.contains_key(node)
    }

    /// Current key of `node`, if queued.
    #[inline]
    pub fn key_of(&self, node: &N) -> Option<Key> {
        self.slots.get(node).map(|&i| self.entries[i].1)
    }

    /// The minimum entry without removing it.
    #[inline]
    pub fn peek(&self) -> Option<(N, Key)> {
        self.entries.first().copied()
    }

    /// Insert `node` with `key`, or move it to `key` if already queued.
    pub fn push(&mut self, node: N, key: Key) {
        if let Some(&i) = self.slots.get(&node) {
            let old = self.entries[i].1;
            self.entries[i].1 = key;
            match key.cmp(&old) {
                Ordering::Less => self.sift_up(i),
                Ordering::Greater => self.sift_down(i),
                Ordering::Equal => {}
            }
            return;
        }
        let i = self.entries.len();
        self.entries.push((node, key));
        self.slots.insert(node, i);
        self.sift_up(i);
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop(&mut self) -> Option<(N, Key)> {
        self.take(0)
    }

    /// Remove `node` from the heap, returning its key if it was queued.
    pub fn remove(&mut self, node: &N) -> Option<Key> {
        let i = *self.slots.get(node)?;
        self.take(i).map(|(_, key)| key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }

    /// Iterate over queued entries in heap (not priority) order.
    pub fn iter(&self) -> impl Iterator<Item = &(N, Key)> + '_ {
        self.entries.iter()
    }

    // -----------------------------------------------------------------------
    // internals
    // -----------------------------------------------------------------------

    fn take(&mut self, i: usize) -> Option<(N, Key)> {
        let last = self.entries.len().checked_sub(1)?;
        self.swap(i, last);
        let entry = self.entries.pop()?;
        self.slots.remove(&entry.0);
        if i < self.entries.len() {
            self.sift_down(i);
            self.sift_up(i);
        }
        Some(entry)
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        self.slots.insert(self.entries[a].0, a);
        self.slots.insert(self.entries[b].0, b);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].1 >= self.entries[parent].1 {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.entries[right].1 < self.entries[left].1 {
                right
            } else {
                left
            };
            if self.entries[i].1 <= self.entries[child].1 {
                break;
            }
            self.swap(i, child);
            i = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn k(p: f64) -> Key {
        Key::new(p, 0.0)
    }

    #[test]
    fn key_orders_primary_then_secondary() {
        assert!(Key::new(1.0, 9.0) < Key::new(2.0, 0.0));
        assert!(Key::new(1.0, 1.0) < Key::new(1.0, 2.0));
        assert_eq!(Key::new(3.0, 4.0), Key::new(3.0, 4.0));
        assert!(Key::new(f64::INFINITY, 0.0) > Key::new(1e300, 1e300));
    }

    #[test]
    fn pops_in_key_order() {
        let mut h = IndexedHeap::new();
        for (n, p) in [(1, 5.0), (2, 1.0), (3, 3.0), (4, 4.0), (5, 2.0)] {
            h.push(n, k(p));
        }
        let order: Vec<_> = std::iter::from_fn(|| h.pop().map(|(n, _)| n)).collect();
        assert_eq!(order, vec![2, 5, 3, 4, 1]);
        assert!(h.is_empty());
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn ties_break_on_secondary() {
        let mut h = IndexedHeap::new();
        h.push('a', Key::new(1.0, 3.0));
        h.push('b', Key::new(1.0, 1.0));
        h.push('c', Key::new(1.0, 2.0));
        assert_eq!(h.pop().map(|e| e.0), Some('b'));
        assert_eq!(h.pop().map(|e| e.0), Some('c'));
        assert_eq!(h.pop().map(|e| e.0), Some('a'));
    }

    #[test]
    fn push_existing_reprioritises() {
        let mut h = IndexedHeap::new();
        h.push(1, k(1.0));
        h.push(2, k(2.0));
        h.push(3, k(3.0));
        h.push(3, k(0.5));
        assert_eq!(h.len(), 3);
        assert_eq!(h.peek().map(|e| e.0), Some(3));
        h.push(3, k(10.0));
        assert_eq!(h.key_of(&3), Some(k(10.0)));
        assert_eq!(h.pop().map(|e| e.0), Some(1));
    }

    #[test]
    fn remove_interior_entries() {
        let mut h = IndexedHeap::new();
        for n in 0..10 {
            h.push(n, k(n as f64));
        }
        assert_eq!(h.remove(&4), Some(k(4.0)));
        assert_eq!(h.remove(&4), None);
        assert!(!h.contains(&4));
        assert!(h.contains(&5));
        assert_eq!(h.remove(&0), Some(k(0.0)));
        let order: Vec<_> = std::iter::from_fn(|| h.pop().map(|(n, _)| n)).collect();
        assert_eq!(order, vec![1, 2, 3, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn clear_empties_index() {
        let mut h = IndexedHeap::new();
        h.push(1, k(1.0));
        h.clear();
        assert!(h.is_empty());
        assert!(!h.contains(&1));
        assert_eq!(h.key_of(&1), None);
    }

    proptest! {
        #[test]
        fn pops_sorted_after_mixed_operations(
            ops in proptest::collection::vec((0u8..32, 0u16..100, any::<bool>()), 1..200)
        ) {
            let mut h = IndexedHeap::new();
            let mut model: HashMap<u8, Key> = HashMap::new();
            for (node, prio, remove) in ops {
                if remove {
                    prop_assert_eq!(h.remove(&node), model.remove(&node));
                } else {
                    let key = Key::new(f64::from(prio), f64::from(node));
                    h.push(node, key);
                    model.insert(node, key);
                }
                prop_assert_eq!(h.len(), model.len());
            }
            let queued: HashMap<u8, Key> = h.iter().copied().collect();
            prop_assert_eq!(&queued, &model);
            let mut last: Option<Key> = None;
            while let Some((node, key)) = h.pop() {
                prop_assert_eq!(model.remove(&node), Some(key));
                if let Some(prev) = last {
                    prop_assert!(prev <= key);
                }
                last = Some(key);
            }
            prop_assert!(model.is_empty());
        }
    }
}
