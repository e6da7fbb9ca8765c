//! The parameter tree.
//!
//! [`Parameters`] is an insertion-ordered map of text keys to [`Value`]s plus
//! a permitted marker. Nested mappings are wrapped into `Parameters` when the
//! tree is built, carrying the parent's marker at that moment, so reads never
//! mutate the tree.
//!
//! Every derivation (`slice`, `except`, `merge`, `clone`, `delete_if`,
//! `keep_if`) carries the marker of the tree it came from. Only
//! [`Parameters::permit`] and [`Parameters::permit_all`] set it.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::ops::Index;

use crate::error::{ParamsError, ParamsResult};
use crate::key::normalize_key;
use crate::value::{Value, ABSENT};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    entries: IndexMap<String, Value>,
    permitted: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new()
    }
}

impl Parameters {
    /// An empty, unpermitted tree.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            permitted: false,
        }
    }

    pub(crate) fn from_parts(entries: IndexMap<String, Value>, permitted: bool) -> Self {
        Self { entries, permitted }
    }

    /// A tree holding `entries` with this tree's marker.
    fn derive(&self, entries: IndexMap<String, Value>) -> Self {
        Self {
            entries,
            permitted: self.permitted,
        }
    }

    pub fn is_permitted(&self) -> bool {
        self.permitted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.entries.contains_key(key.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order. Nested trees carry their own marker,
    /// which they inherited from this tree.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The stored value, or [`Value::Absent`] when the key is missing.
    pub fn get(&self, key: impl AsRef<str>) -> &Value {
        self.entries.get(key.as_ref()).unwrap_or(&ABSENT)
    }

    pub fn get_mut(&mut self, key: impl AsRef<str>) -> Option<&mut Value> {
        self.entries.get_mut(key.as_ref())
    }

    /// Assigns a field. Inserted mappings keep whatever marker they carry;
    /// assignment never escalates trust.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(normalize_key(key), value.into())
    }

    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Value> {
        self.entries.shift_remove(key.as_ref())
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn fetch(&self, key: impl AsRef<str>) -> ParamsResult<&Value> {
        let key = key.as_ref();
        self.entries
            .get(key)
            .ok_or_else(|| ParamsError::not_found(key))
    }

    /// Like [`fetch`](Self::fetch), returning `default` for a missing key.
    pub fn fetch_or<'a>(&'a self, key: impl AsRef<str>, default: &'a Value) -> &'a Value {
        self.entries.get(key.as_ref()).unwrap_or(default)
    }

    /// Like [`fetch`](Self::fetch), computing the fallback from the key.
    pub fn fetch_or_else<F>(&self, key: impl AsRef<str>, fallback: F) -> Cow<'_, Value>
    where
        F: FnOnce(&str) -> Value,
    {
        let key = key.as_ref();
        match self.entries.get(key) {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(fallback(key)),
        }
    }

    /// Values for `keys` in argument order, `Absent` for missing ones.
    pub fn values_at<I>(&self, keys: I) -> Vec<&Value>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        keys.into_iter().map(|key| self.get(key)).collect()
    }

    /// A tree with only the listed keys that are present, in argument order.
    pub fn slice<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut entries = IndexMap::new();
        for key in keys {
            let key = key.as_ref();
            if let Some(value) = self.entries.get(key) {
                entries.insert(key.to_string(), value.clone());
            }
        }
        self.derive(entries)
    }

    /// A tree without the listed keys.
    pub fn except<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut entries = self.entries.clone();
        for key in keys {
            entries.shift_remove(key.as_ref());
        }
        self.derive(entries)
    }

    /// This tree overlaid with `other`. The result carries this tree's
    /// marker regardless of where `other` came from.
    pub fn merge<I, K, V>(&self, other: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut entries = self.entries.clone();
        for (key, value) in other {
            entries.insert(normalize_key(key), value.into());
        }
        self.derive(entries)
    }

    /// Removes every entry for which `predicate` holds.
    pub fn delete_if<F>(&mut self, mut predicate: F) -> &mut Self
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.entries.retain(|k, v| !predicate(k, v));
        self
    }

    /// Keeps only the entries for which `predicate` holds.
    pub fn keep_if<F>(&mut self, mut predicate: F) -> &mut Self
    where
        F: FnMut(&str, &Value) -> bool,
    {
        self.entries.retain(|k, v| predicate(k, v));
        self
    }

    /// Marks this tree and everything nested in it as permitted, without
    /// filtering. Only for input whose structure was vetted some other way.
    pub fn permit_all(&mut self) -> &mut Self {
        self.permit_all_in_place();
        self
    }

    pub(crate) fn permit_all_in_place(&mut self) {
        self.permitted = true;
        self.entries.values_mut().for_each(Value::mark_permitted);
    }
}

impl Index<&str> for Parameters {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key)
    }
}

/// Builds an unpermitted tree.
impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (normalize_key(k), v.into()))
            .collect();
        Self::from_parts(entries, false)
    }
}

impl IntoIterator for Parameters {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
