use std::slice;

use crate::{Compound, Error, Result, Tag, TagID, cold_path};

/// A homogeneous sequence of unnamed tags.
///
/// The element kind is fixed by [`List::of`] or by the first element added to
/// a [`List::new`] list; every later insertion must match it. A failed
/// insertion leaves the list unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct List {
    kind: TagID,
    items: Vec<Tag>,
}

impl Default for List {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl List {
    /// An empty list whose kind is fixed by its first element.
    #[inline]
    pub const fn new() -> Self {
        Self {
            kind: TagID::End,
            items: Vec::new(),
        }
    }

    /// An empty list locked to `kind`. `TagID::End` leaves it unlocked.
    #[inline]
    pub const fn of(kind: TagID) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// The element kind, `TagID::End` while still unlocked.
    #[inline]
    pub const fn kind(&self) -> TagID {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.items.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Tag] {
        &self.items
    }

    /// Checks `tag` against the element kind, locking it if still open.
    fn admit(&mut self, tag: &Tag) -> Result<()> {
        if self.kind == TagID::End {
            self.kind = tag.id();
            return Ok(());
        }
        if self.kind != tag.id() {
            cold_path();
            return Err(Error::TagMismatch(self.kind.id(), tag.id().id()));
        }
        Ok(())
    }

    /// Appends `tag`.
    ///
    /// # Errors
    ///
    /// [`Error::TagMismatch`] if the list is locked to another kind.
    pub fn push(&mut self, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        self.admit(&tag)?;
        self.items.push(tag);
        Ok(())
    }

    /// Inserts `tag` at `index`, shifting later elements.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfBounds`] if `index > len`
    /// - [`Error::TagMismatch`] if the list is locked to another kind
    pub fn insert(&mut self, index: usize, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        if index > self.items.len() {
            cold_path();
            return Err(Error::IndexOutOfBounds(index, self.items.len()));
        }
        self.admit(&tag)?;
        self.items.insert(index, tag);
        Ok(())
    }

    /// Replaces the element at `index` and returns the previous one.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexOutOfBounds`] if `index >= len`
    /// - [`Error::TagMismatch`] if `tag` is not of the list's kind
    pub fn set(&mut self, index: usize, tag: impl Into<Tag>) -> Result<Tag> {
        let tag = tag.into();
        let len = self.items.len();
        let Some(slot) = self.items.get_mut(index) else {
            cold_path();
            return Err(Error::IndexOutOfBounds(index, len));
        };
        if self.kind != tag.id() {
            cold_path();
            return Err(Error::TagMismatch(self.kind.id(), tag.id().id()));
        }
        Ok(std::mem::replace(slot, tag))
    }

    /// Removes and returns the element at `index`. The element kind stays
    /// locked even when the list becomes empty.
    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Mutable access to a compound element. The element kind cannot change
    /// through the returned reference.
    #[inline]
    pub fn compound_mut(&mut self, index: usize) -> Option<&mut Compound> {
        match self.items.get_mut(index) {
            Some(Tag::Compound(compound)) => Some(compound),
            _ => None,
        }
    }

    /// Mutable access to a nested list element.
    #[inline]
    pub fn list_mut(&mut self, index: usize) -> Option<&mut List> {
        match self.items.get_mut(index) {
            Some(Tag::List(list)) => Some(list),
            _ => None,
        }
    }

    /// Consumes the list, returning its kind and elements.
    #[inline]
    pub fn into_parts(self) -> (TagID, Vec<Tag>) {
        (self.kind, self.items)
    }

    /// Builds a list from already-checked parts.
    #[inline]
    pub(crate) fn from_parts_unchecked(kind: TagID, items: Vec<Tag>) -> Self {
        debug_assert!(items.iter().all(|item| item.id() == kind));
        Self { kind, items }
    }
}

impl TryFrom<Vec<Tag>> for List {
    type Error = Error;

    /// Locks the kind to the first element; fails if any other element
    /// differs from it.
    fn try_from(items: Vec<Tag>) -> Result<Self> {
        let kind = items.first().map_or(TagID::End, Tag::id);
        if let Some(stray) = items.iter().find(|item| item.id() != kind) {
            return Err(Error::TagMismatch(kind.id(), stray.id().id()));
        }
        Ok(Self { kind, items })
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_push_locks_kind() {
        let mut list = List::new();
        assert_eq!(list.kind(), TagID::End);
        list.push(1i32).unwrap();
        assert_eq!(list.kind(), TagID::Int);
        match list.push(1i64) {
            Err(Error::TagMismatch(3, 4)) => {}
            other => panic!("expected TagMismatch(3, 4), got {other:?}"),
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn rejected_set_leaves_list_unchanged() {
        let mut list = List::try_from(vec![Tag::Short(1), Tag::Short(2)]).unwrap();
        let before = list.clone();
        assert!(list.set(0, Tag::Byte(9)).is_err());
        assert!(list.insert(1, Tag::Byte(9)).is_err());
        assert_eq!(list, before);

        assert_eq!(list.set(1, Tag::Short(5)).unwrap(), Tag::Short(2));
        assert_eq!(list.get(1), Some(&Tag::Short(5)));
    }

    #[test]
    fn out_of_range_positions_are_errors() {
        let mut list = List::try_from(vec![Tag::Int(1)]).unwrap();
        assert!(matches!(
            list.set(1, Tag::Int(2)),
            Err(Error::IndexOutOfBounds(1, 1))
        ));
        assert!(matches!(
            list.insert(2, Tag::Int(2)),
            Err(Error::IndexOutOfBounds(2, 1))
        ));
        list.insert(1, Tag::Int(2)).unwrap();
        assert_eq!(list.as_slice(), [Tag::Int(1), Tag::Int(2)]);

        let mut empty = List::new();
        assert!(matches!(
            empty.set(0, Tag::Byte(1)),
            Err(Error::IndexOutOfBounds(0, 0))
        ));
        assert_eq!(empty.kind(), TagID::End);
    }

    #[test]
    fn kind_survives_removal() {
        let mut list = List::of(TagID::Double);
        list.push(1.5f64).unwrap();
        assert_eq!(list.remove(0), Some(Tag::Double(1.5)));
        assert!(list.is_empty());
        assert!(list.push(1i8).is_err());
        assert_eq!(list.remove(3), None);
    }

    #[test]
    fn try_from_rejects_mixed_kinds() {
        assert!(matches!(
            List::try_from(vec![Tag::Int(1), Tag::Long(2)]),
            Err(Error::TagMismatch(3, 4))
        ));
        assert_eq!(List::try_from(Vec::new()).unwrap().kind(), TagID::End);
    }

    #[test]
    fn nested_containers_are_mutable_in_place() {
        let mut list = List::new();
        list.push(Compound::new()).unwrap();
        list.compound_mut(0)
            .unwrap()
            .insert("x", Tag::Int(1))
            .unwrap();
        assert_eq!(
            list.get(0).and_then(|c| c.get("x")),
            Some(&Tag::Int(1))
        );
        assert!(list.list_mut(0).is_none());
    }
}
