use crate::{descriptor::RenderedMap, mode::DeliveryTarget, value::ValueSource};

/// Insertion-ordered mapping of keys to [`ValueSource`]s.
///
/// Used for both request parameters and custom headers. Keys are unique;
/// setting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueBag {
    entries: Vec<(String, ValueSource)>,
}

impl ValueBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`, keeping the original position on replace.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ValueSource>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Chaining form of [`ValueBag::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ValueSource>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns a new bag with `other` layered over `self`.
    ///
    /// Colliding keys keep their position from `self` and take the value from
    /// `other`; keys only present in `other` are appended in `other`'s order.
    pub fn merge(&self, other: &ValueBag) -> ValueBag {
        let mut merged = self.clone();
        for (key, value) in &other.entries {
            merged.set(key.clone(), value.clone());
        }
        merged
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&ValueSource> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the bag has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueSource)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Realizes every value, invoking each deferred producer exactly once.
    pub fn resolve(&self) -> RenderedMap {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.evaluate()))
            .collect()
    }

    /// Realizes every value the way `target` delivers it.
    ///
    /// Header delivery uses each deferred value's string form instead of
    /// invoking it; see [`ValueSource`].
    pub fn resolve_for(&self, target: DeliveryTarget) -> RenderedMap {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.render(target)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ValueBag
where
    K: Into<String>,
    V: Into<ValueSource>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl<K, V> Extend<(K, V)> for ValueBag
where
    K: Into<String>,
    V: Into<ValueSource>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ValueBag
where
    K: Into<String>,
    V: Into<ValueSource>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
