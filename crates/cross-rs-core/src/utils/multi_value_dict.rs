//! An insertion-ordered dictionary that can hold multiple values per key.
//!
//! [`MultiValueDict`] backs query-string handling, where a key may appear
//! several times and the order of first appearance is significant when the
//! values are turned back into URL segments.

use std::hash::Hash;

use indexmap::map;
use indexmap::IndexMap;

/// A dictionary that maps keys to lists of values, preserving key order.
///
/// [`get`](MultiValueDict::get) returns the **last** value for a key, while
/// [`get_list`](MultiValueDict::get_list) returns all values. A key keeps the
/// position of its first insertion.
///
/// # Examples
///
/// ```
/// use cross_rs_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("color", "red");
/// d.append("size", "large");
/// d.append("color", "blue");
///
/// assert_eq!(d.get(&"color"), Some(&"blue"));
/// assert_eq!(d.keys().collect::<Vec<_>>(), vec![&"color", &"size"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueDict<K: Eq + Hash, V> {
    inner: IndexMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> MultiValueDict<K, V> {
    /// Creates an empty `MultiValueDict`.
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Returns the last value associated with the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key).and_then(|v| v.last())
    }

    /// Returns all values associated with the key.
    pub fn get_list(&self, key: &K) -> Option<&Vec<V>> {
        self.inner.get(key)
    }

    /// Sets the value for a key, replacing any existing values.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.insert(key, vec![value]);
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> map::Keys<'_, K, Vec<V>> {
        self.inner.keys()
    }

    /// Returns an iterator over the last value of each key, in key order.
    pub fn last_values(&self) -> impl Iterator<Item = &V> {
        self.inner.values().filter_map(|v| v.last())
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the dictionary contains the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over (key, value-list) pairs.
    pub fn iter(&self) -> map::Iter<'_, K, Vec<V>> {
        self.inner.iter()
    }
}

impl<K: Eq + Hash, V> IntoIterator for MultiValueDict<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let d: MultiValueDict<String, String> = MultiValueDict::new();
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn test_append_and_get_returns_last() {
        let mut d = MultiValueDict::new();
        d.append("color", "red");
        d.append("color", "blue");
        d.append("color", "green");

        assert_eq!(d.get(&"color"), Some(&"green"));
        assert_eq!(d.get_list(&"color"), Some(&vec!["red", "blue", "green"]));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_set_replaces_existing_in_place() {
        let mut d = MultiValueDict::new();
        d.append("k", "a");
        d.append("j", "x");
        d.set("k", "c");
        assert_eq!(d.get_list(&"k"), Some(&vec!["c"]));
        assert_eq!(d.keys().collect::<Vec<_>>(), vec![&"k", &"j"]);
    }

    #[test]
    fn test_last_values_in_key_order() {
        let mut d = MultiValueDict::new();
        d.append("a", 1);
        d.append("b", 2);
        d.append("a", 3);
        assert_eq!(d.last_values().copied().collect::<Vec<_>>(), vec![3, 2]);
    }

    #[test]
    fn test_get_missing_key() {
        let d: MultiValueDict<&str, &str> = MultiValueDict::new();
        assert_eq!(d.get(&"missing"), None);
        assert_eq!(d.get_list(&"missing"), None);
        assert!(!d.contains_key(&"missing"));
    }

    #[test]
    fn test_iter_order() {
        let mut d = MultiValueDict::new();
        d.append("z", 1);
        d.append("a", 2);
        let keys: Vec<_> = d.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
