use core::any::TypeId;
use core::fmt;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;

/// A map keyed by [`TypeId`].
///
/// A `TypeId` is already a well distributed hash, so keys are not hashed
/// again (see [`NoOpHashState`]).
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use mw_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// names.insert(TypeId::of::<u8>(), "byte");
///
/// assert_eq!(names.get(&TypeId::of::<u8>()), Some(&"byte"));
/// assert!(!names.contains(&TypeId::of::<u16>()));
/// ```
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity_and_hasher(capacity, NoOpHashState))
    }

    /// Returns the value of `type_id`, inserting `f()` first if missing.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        self.0.entry(type_id).or_insert_with(f)
    }

    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Inserts a value, returning the one it replaced.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, value: V) -> Option<V> {
        self.0.insert(type_id, value)
    }

    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn get_or_insert_runs_once() {
        let mut map = TypeIdMap::<u32>::new();
        let mut calls = 0;

        *map.get_or_insert(TypeId::of::<u8>(), || {
            calls += 1;
            1
        }) += 1;
        map.get_or_insert(TypeId::of::<u8>(), || {
            calls += 1;
            10
        });

        assert_eq!(calls, 1);
        assert_eq!(map.get(&TypeId::of::<u8>()), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn insert_replaces() {
        let mut map = TypeIdMap::with_capacity(1);
        let key = TypeId::of::<String>();
        assert!(map.insert(key, "a").is_none());
        assert_eq!(map.insert(key, "b"), Some("a"));
        assert!(map.contains(&key));
        assert!(!map.contains(&TypeId::of::<str>()));
    }
}
