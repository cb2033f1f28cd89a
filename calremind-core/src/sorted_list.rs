//! Ordered container used for every event cache in the engine.
//!
//! Items are kept sorted by an injected comparator. Items that compare equal
//! may sit in any relative order among themselves, so value-based lookups
//! (`find_index`, `remove`) land on *some* member of the matching bucket.
//! Callers that need an exact item must use a predicate instead.
//!
//! There is intentionally no mutable access to stored items: changing an item
//! in place could silently break the ordering. Replace items instead.

use std::cmp::Ordering;

const INITIAL_CAPACITY: usize = 4;

/// Pure ordering function injected into a [`SortedList`].
pub type Comparator<T> = fn(&T, &T) -> Ordering;

#[derive(Debug, Clone)]
pub struct SortedList<T> {
    items: Vec<T>,
    compare: Comparator<T>,
}

impl<T> SortedList<T> {
    pub fn new(compare: Comparator<T>) -> Self {
        Self::with_capacity(compare, INITIAL_CAPACITY)
    }

    pub fn with_capacity(compare: Comparator<T>, capacity: usize) -> Self {
        SortedList {
            items: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Size of the backing buffer. Never shrinks, not even on `clear`.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Insert an item at its sorted position and return that position.
    pub fn add(&mut self, item: T) -> usize {
        let index = self.suggest_index(&item);
        self.grow_if_full();
        self.items.insert(index, item);
        index
    }

    /// Append an item that sorts at or after the current last one, in O(1).
    ///
    /// Builds a list from already ordered input. An item that would break the
    /// order is inserted at its sorted position instead.
    pub fn push_sorted(&mut self, item: T) -> usize {
        if let Some(last) = self.items.last() {
            if (self.compare)(last, &item) == Ordering::Greater {
                return self.add(item);
            }
        }

        self.grow_if_full();
        self.items.push(item);
        self.items.len() - 1
    }

    fn grow_if_full(&mut self) {
        if self.items.len() == self.items.capacity() {
            // Double explicitly so growth doesn't depend on Vec's policy
            let additional = self.items.capacity().max(INITIAL_CAPACITY);
            self.items.reserve_exact(additional);
        }
    }

    /// Bounds-checked random access.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Index of an item that compares equal to `item`, in O(log n).
    pub fn find_index(&self, item: &T) -> Option<usize> {
        self.items
            .binary_search_by(|probe| (self.compare)(probe, item))
            .ok()
    }

    /// Index of the first item matching `predicate`, in O(n).
    pub fn find_index_by(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    /// First item matching `predicate`, in O(n).
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.find_index(item).is_some()
    }

    /// Remove one item that compares equal to `item`.
    ///
    /// Which member of an equal bucket gets removed is unspecified.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.find_index(item)?;
        self.remove_at(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }

        Some(self.items.remove(index))
    }

    /// Remove the first item matching `predicate`.
    pub fn remove_first(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let index = self.find_index_by(predicate)?;
        self.remove_at(index)
    }

    /// Keep only the items matching `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    /// Drop all items but keep the backing buffer for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the contents with a copy of `other`, reusing this list's buffer.
    pub fn copy_from(&mut self, other: &SortedList<T>)
    where
        T: Clone,
    {
        self.items.clone_from(&other.items);
        self.compare = other.compare;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn suggest_index(&self, item: &T) -> usize {
        // On a tie the found index is as good as any other within the bucket
        match self
            .items
            .binary_search_by(|probe| (self.compare)(probe, item))
        {
            Ok(index) | Err(index) => index,
        }
    }
}

impl<'a, T> IntoIterator for &'a SortedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn by_value(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    /// Orders pairs by their first element only, so pairs can share a bucket.
    fn by_key(a: &(i32, char), b: &(i32, char)) -> Ordering {
        a.0.cmp(&b.0)
    }

    fn assert_sorted(list: &SortedList<i32>) {
        for pair in list.as_slice().windows(2) {
            assert!(pair[0] <= pair[1], "{:?} out of order", list.as_slice());
        }
    }

    #[test]
    fn test_add_returns_sorted_position() {
        let mut list = SortedList::new(by_value);

        assert_eq!(list.add(5), 0);
        assert_eq!(list.add(1), 0);
        assert_eq!(list.add(9), 2);
        assert_eq!(list.add(7), 2);

        assert_eq!(list.as_slice(), &[1, 5, 7, 9]);
    }

    #[test]
    fn test_push_sorted_appends_ordered_input() {
        let mut list = SortedList::new(by_value);

        assert_eq!(list.push_sorted(1), 0);
        assert_eq!(list.push_sorted(3), 1);
        assert_eq!(list.push_sorted(3), 2);
        // Out of order still lands in place
        assert_eq!(list.push_sorted(2), 1);

        assert_eq!(list.as_slice(), &[1, 2, 3, 3]);
    }

    #[test]
    fn test_get_is_bounds_checked() {
        let mut list = SortedList::new(by_value);
        list.add(3);

        assert_eq!(list.get(0), Some(&3));
        assert_eq!(list.get(1), None);
        assert_eq!(list.remove_at(1), None);
    }

    #[test]
    fn test_buffer_grows_by_doubling_and_never_shrinks() {
        let mut list = SortedList::new(by_value);
        let initial = list.capacity();

        for value in 0..=initial as i32 {
            list.add(value);
        }
        assert!(list.capacity() >= initial * 2);

        let grown = list.capacity();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), grown);

        list.remove_first(|_| true);
        assert_eq!(list.capacity(), grown);
    }

    #[test]
    fn test_remove_by_value_hits_matching_bucket() {
        let mut list = SortedList::new(by_key);
        list.add((1, 'a'));
        list.add((2, 'b'));
        list.add((2, 'c'));
        list.add((3, 'd'));

        let removed = list.remove(&(2, 'z')).expect("bucket 2 has items");

        assert_eq!(removed.0, 2);
        assert_eq!(list.len(), 3);
        assert!(list.contains(&(2, '?')));
        assert!(list.remove(&(4, 'x')).is_none());
    }

    #[test]
    fn test_exact_removal_needs_a_predicate() {
        let mut list = SortedList::new(by_key);
        list.add((2, 'b'));
        list.add((2, 'c'));

        assert_eq!(list.remove_first(|item| item.1 == 'c'), Some((2, 'c')));
        assert_eq!(list.as_slice(), &[(2, 'b')]);
    }

    #[test]
    fn test_find_variants() {
        let mut list = SortedList::new(by_value);
        for value in [4, 8, 15, 16, 23, 42] {
            list.add(value);
        }

        assert_eq!(list.find_index(&15), Some(2));
        assert_eq!(list.find_index(&14), None);
        assert_eq!(list.find_index_by(|v| *v > 15), Some(3));
        assert_eq!(list.find(|v| v % 2 == 1), Some(&15));
        assert_eq!(list.find(|v| *v > 100), None);
    }

    #[test]
    fn test_find_index_on_empty_list() {
        let list: SortedList<i32> = SortedList::new(by_value);
        assert_eq!(list.find_index(&1), None);
        assert!(!list.contains(&1));
    }

    #[test]
    fn test_copy_from_reuses_buffer() {
        let mut source = SortedList::new(by_value);
        source.add(2);
        source.add(1);

        let mut target = SortedList::with_capacity(by_value, 32);
        target.add(99);
        target.copy_from(&source);

        assert_eq!(target.as_slice(), &[1, 2]);
        assert!(target.capacity() >= 32);
    }

    proptest! {
        #[test]
        fn prop_items_stay_sorted(values in proptest::collection::vec(-50i32..50, 0..64)) {
            let mut list = SortedList::new(by_value);
            for value in values {
                list.add(value);
                assert_sorted(&list);
            }
        }

        #[test]
        fn prop_add_then_remove_restores_multiset(
            values in proptest::collection::vec(-20i32..20, 0..32),
            extra in -20i32..20,
        ) {
            let mut list = SortedList::new(by_value);
            for value in &values {
                list.add(*value);
            }
            let before = list.as_slice().to_vec();

            list.add(extra);
            prop_assert_eq!(list.remove(&extra), Some(extra));

            prop_assert_eq!(list.as_slice(), before.as_slice());
        }

        #[test]
        fn prop_clear_then_add_matches_fresh_list(
            first in proptest::collection::vec(-20i32..20, 0..32),
            second in proptest::collection::vec(-20i32..20, 0..32),
        ) {
            let mut reused = SortedList::new(by_value);
            for value in first {
                reused.add(value);
            }
            reused.clear();

            let mut fresh = SortedList::new(by_value);
            for value in &second {
                reused.add(*value);
                fresh.add(*value);
            }

            prop_assert_eq!(reused.as_slice(), fresh.as_slice());
        }
    }
}
