use std::slice;

use crate::{Result, Tag, check_string_len};

/// A set of named tags with unique keys.
///
/// Entries are kept in insertion order so that encoding is deterministic,
/// but two compounds compare equal whenever they hold the same key/value
/// pairs, in any order.
#[derive(Clone, Debug, Default)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
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
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.position(key).map(|i| &mut self.entries[i].1)
    }

    /// Puts `value` under `key`, returning the value it replaces.
    ///
    /// # Errors
    ///
    /// [`Error::StringTooLong`](crate::Error::StringTooLong) if the key is
    /// longer than 32,767 bytes; the compound is left unchanged.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Tag>) -> Result<Option<Tag>> {
        let key = key.into();
        check_string_len(key.len())?;
        let value = value.into();
        Ok(match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        })
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    #[inline]
    pub fn iter(&self) -> CompoundIter<'_> {
        CompoundIter {
            inner: self.entries.iter(),
        }
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Appends an entry whose key is known to be new and short enough.
    #[inline]
    pub(crate) fn push_unchecked(&mut self, key: String, value: Tag) {
        debug_assert!(!self.contains_key(&key));
        self.entries.push((key, value));
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

pub struct CompoundIter<'a> {
    inner: slice::Iter<'a, (String, Tag)>,
}

impl<'a> Iterator for CompoundIter<'a> {
    type Item = (&'a str, &'a Tag);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key.as_str(), value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for CompoundIter<'_> {}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a str, &'a Tag);
    type IntoIter = CompoundIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = std::vec::IntoIter<(String, Tag)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, MAX_STRING_LEN};

    #[test]
    fn insert_replaces_existing_key() {
        let mut c = Compound::new();
        assert_eq!(c.insert("k", 1i32).unwrap(), None);
        assert_eq!(c.insert("k", 2i32).unwrap(), Some(Tag::Int(1)));
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("k"), Some(&Tag::Int(2)));
    }

    #[test]
    fn equality_ignores_order() {
        let mut a = Compound::new();
        a.insert("x", 1i32).unwrap();
        a.insert("y", 2i32).unwrap();
        let mut b = Compound::new();
        b.insert("y", 2i32).unwrap();
        b.insert("x", 1i32).unwrap();
        assert_eq!(a, b);
        b.insert("x", 3i32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn oversized_key_is_rejected() {
        let mut c = Compound::new();
        assert!(matches!(
            c.insert("k".repeat(MAX_STRING_LEN + 1), 0i8),
            Err(Error::StringTooLong(_))
        ));
        assert!(c.is_empty());
    }

    #[test]
    fn remove_returns_value() {
        let mut c = Compound::new();
        c.insert("a", 1i8).unwrap();
        c.insert("b", 2i8).unwrap();
        assert_eq!(c.remove("a"), Some(Tag::Byte(1)));
        assert_eq!(c.remove("a"), None);
        assert_eq!(c.keys().collect::<Vec<_>>(), ["b"]);
    }
}
