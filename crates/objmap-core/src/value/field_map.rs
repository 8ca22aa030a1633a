use crate::value::Value;
use derive_more::Deref;
use serde::{Serialize, Serializer, ser::SerializeMap};

///
/// FieldMap
///
/// Insertion-ordered, string-keyed map.
/// Overwriting an existing key keeps its position; new keys append.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct FieldMap<T = Value>(Vec<(String, T)>);

impl<T> FieldMap<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        if let Some((_, slot)) = self.0.iter_mut().find(|(key, _)| *key == name) {
            return Some(std::mem::replace(slot, value));
        }
        self.0.push((name, value));

        None
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        let index = self.0.iter().position(|(key, _)| key == name)?;

        Some(self.0.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter().map(|(_, v)| v)
    }

    /// Transform every value, keeping keys and order.
    pub fn try_map_values<U, E>(
        self,
        mut f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<FieldMap<U>, E> {
        self.0
            .into_iter()
            .map(|(key, v)| f(v).map(|u| (key, u)))
            .collect::<Result<Vec<_>, E>>()
            .map(FieldMap)
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for FieldMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);

        map
    }
}

impl<K: Into<String>, T> Extend<(K, T)> for FieldMap<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<T> IntoIterator for FieldMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a FieldMap<T> {
    type Item = &'a (String, T);
    type IntoIter = std::slice::Iter<'a, (String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Serialize> Serialize for FieldMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}
