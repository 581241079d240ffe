//! An insertion-order-preserving map used for grouping transactions.

use std::collections::HashMap;
use std::hash::Hash;

/// A map that remembers the order in which keys were first inserted.
///
/// Grouping for the dashboard is order-sensitive: category and month buckets
/// are emitted in the order they first appear in the transaction history,
/// not sorted. [OrderedMap::into_entries] yields entries in first-insertion
/// order; inserting into an existing key never changes its position.
pub(crate) struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Get a mutable reference to the value for `key`, inserting the value
    /// produced by `default` if the key has not been seen before.
    pub(crate) fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.clone(), position);
                self.entries.push((key, default()));
                position
            }
        };

        &mut self.entries[position].1
    }

    /// Consume the map, yielding entries in first-insertion order.
    pub(crate) fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedMap;

    #[test]
    fn entries_come_back_in_first_insertion_order() {
        let mut map = OrderedMap::new();

        *map.get_or_insert_with("b", || 0) += 1;
        *map.get_or_insert_with("a", || 0) += 1;
        *map.get_or_insert_with("c", || 0) += 1;

        let keys: Vec<&str> = map.into_entries().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn inserting_into_existing_key_accumulates_in_place() {
        let mut map = OrderedMap::new();

        *map.get_or_insert_with("a", || 0.0) += 1.0;
        *map.get_or_insert_with("b", || 0.0) += 10.0;
        *map.get_or_insert_with("a", || 0.0) += 2.0;

        assert_eq!(map.into_entries(), vec![("a", 3.0), ("b", 10.0)]);
    }

    #[test]
    fn empty_map_yields_no_entries() {
        let map: OrderedMap<String, f64> = OrderedMap::new();
        assert!(map.into_entries().is_empty());
    }
}
