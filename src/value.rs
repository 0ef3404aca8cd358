//! The in-memory tag tree.
//!
//! A [`Tag`] owns its children outright: lists and compounds hold their
//! elements by value, so a tree has no sharing and no cycles.

mod compound;
mod list;
mod string;

pub use compound::*;
pub use list::*;
pub use string::*;

use crate::{Error, Index, Position, Result, TagID};

/// One value of the tag tree.
///
/// Names are not part of a tag; they belong to the [`Compound`] entry or the
/// document root that holds it.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(NbtString),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    #[cfg(feature = "long_array")]
    LongArray(Vec<i64>),
}

macro_rules! projection {
    ($($variant:ident => $as_ref:ident, $as_mut:ident, $ty:ty;)*) => {
        $(
            #[doc = concat!("Returns the payload of a `", stringify!($variant), "` tag.")]
            #[inline]
            pub fn $as_ref(&self) -> Result<&$ty> {
                match self {
                    Tag::$variant(value) => Ok(value),
                    other => Err(Error::TagMismatch(TagID::$variant.id(), other.id().id())),
                }
            }

            #[inline]
            pub fn $as_mut(&mut self) -> Result<&mut $ty> {
                match self {
                    Tag::$variant(value) => Ok(value),
                    other => Err(Error::TagMismatch(TagID::$variant.id(), other.id().id())),
                }
            }
        )*
    };
}

macro_rules! scalar_projection {
    ($($variant:ident => $as_value:ident, $ty:ty;)*) => {
        $(
            #[doc = concat!("Returns the value of a `", stringify!($variant), "` tag.")]
            #[inline]
            pub fn $as_value(&self) -> Result<$ty> {
                match self {
                    Tag::$variant(value) => Ok(*value),
                    other => Err(Error::TagMismatch(TagID::$variant.id(), other.id().id())),
                }
            }
        )*
    };
}

impl Tag {
    /// Builds a `String` tag, failing if `value` encodes to more than
    /// 32,767 bytes.
    pub fn string(value: impl Into<String>) -> Result<Self> {
        NbtString::new(value).map(Tag::String)
    }

    /// Returns the kind of this tag.
    pub const fn id(&self) -> TagID {
        match self {
            Tag::Byte(_) => TagID::Byte,
            Tag::Short(_) => TagID::Short,
            Tag::Int(_) => TagID::Int,
            Tag::Long(_) => TagID::Long,
            Tag::Float(_) => TagID::Float,
            Tag::Double(_) => TagID::Double,
            Tag::ByteArray(_) => TagID::ByteArray,
            Tag::String(_) => TagID::String,
            Tag::List(_) => TagID::List,
            Tag::Compound(_) => TagID::Compound,
            Tag::IntArray(_) => TagID::IntArray,
            #[cfg(feature = "long_array")]
            Tag::LongArray(_) => TagID::LongArray,
        }
    }

    scalar_projection! {
        Byte => as_byte, i8;
        Short => as_short, i16;
        Int => as_int, i32;
        Long => as_long, i64;
        Float => as_float, f32;
        Double => as_double, f64;
    }

    projection! {
        ByteArray => as_byte_array, as_byte_array_mut, Vec<i8>;
        List => as_list, as_list_mut, List;
        Compound => as_compound, as_compound_mut, Compound;
        IntArray => as_int_array, as_int_array_mut, Vec<i32>;
    }

    #[cfg(feature = "long_array")]
    projection! {
        LongArray => as_long_array, as_long_array_mut, Vec<i64>;
    }

    /// Returns the text of a `String` tag.
    #[inline]
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Tag::String(value) => Ok(value.as_str()),
            other => Err(Error::TagMismatch(TagID::String.id(), other.id().id())),
        }
    }

    /// Looks up a child by list position or compound key.
    ///
    /// Returns `None` for leaf tags, out-of-range positions and missing keys.
    ///
    /// ```
    /// use tbnbt::{compound, List, Tag};
    ///
    /// let tag = Tag::Compound(compound! { "pos" => List::try_from(vec![Tag::Int(4), Tag::Int(2)]).unwrap() });
    /// assert_eq!(tag.get("pos").and_then(|pos| pos.get(1)), Some(&Tag::Int(2)));
    /// assert_eq!(tag.get(0), None);
    /// ```
    #[inline]
    pub fn get(&self, index: impl Index) -> Option<&Tag> {
        match (self, index.position()) {
            (Tag::List(list), Position::Element(i)) => list.get(i),
            (Tag::Compound(compound), Position::Key(key)) => compound.get(key),
            _ => None,
        }
    }

    /// Mutable lookup of a compound member by key. List elements are not
    /// reachable this way because replacing one could break the list's kind;
    /// use [`List::set`], [`List::compound_mut`] or [`List::list_mut`].
    #[inline]
    pub fn get_mut(&mut self, index: impl Index) -> Option<&mut Tag> {
        match (self, index.position()) {
            (Tag::Compound(compound), Position::Key(key)) => compound.get_mut(key),
            _ => None,
        }
    }
}

macro_rules! from_scalar {
    ($($ty:ty => $variant:ident;)*) => {
        $(
            impl From<$ty> for Tag {
                #[inline]
                fn from(value: $ty) -> Self {
                    Tag::$variant(value)
                }
            }
        )*
    };
}

from_scalar! {
    i8 => Byte;
    i16 => Short;
    i32 => Int;
    i64 => Long;
    f32 => Float;
    f64 => Double;
    Vec<i8> => ByteArray;
    NbtString => String;
    List => List;
    Compound => Compound;
    Vec<i32> => IntArray;
}

#[cfg(feature = "long_array")]
from_scalar! {
    Vec<i64> => LongArray;
}

impl From<bool> for Tag {
    #[inline]
    fn from(value: bool) -> Self {
        Tag::Byte(value as i8)
    }
}

impl TryFrom<&str> for Tag {
    type Error = Error;

    #[inline]
    fn try_from(value: &str) -> Result<Self> {
        Tag::string(value)
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    #[inline]
    fn try_from(value: String) -> Result<Self> {
        Tag::string(value)
    }
}

/// Builds a [`Compound`] from `key => value` pairs.
///
/// Values go through `TryFrom<_> for Tag`, so string literals can be used
/// directly. Panics if a string or key is longer than 32,767 bytes; use
/// [`Compound::insert`] for fallible construction.
///
/// ```
/// use tbnbt::{compound, Tag};
///
/// let c = compound! {
///     "version" => 1,
///     "name" => "MrYurihi",
/// };
/// assert_eq!(c.get("version"), Some(&Tag::Int(1)));
/// ```
#[macro_export]
macro_rules! compound {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut compound = $crate::Compound::new();
        $(
            let value = <$crate::Tag as ::core::convert::TryFrom<_>>::try_from($value)
                .expect("compound! value");
            compound.insert($key, value).expect("compound! key");
        )*
        compound
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projections_report_mismatch() {
        let tag = Tag::Int(7);
        assert_eq!(tag.as_int().unwrap(), 7);
        match tag.as_long() {
            Err(Error::TagMismatch(4, 3)) => {}
            other => panic!("expected TagMismatch(4, 3), got {other:?}"),
        }
        assert!(matches!(tag.as_str(), Err(Error::TagMismatch(8, 3))));
    }

    #[test]
    fn get_mut_reaches_compound_members_only() {
        let mut tag = Tag::Compound(compound! { "a" => 1 });
        *tag.get_mut("a").unwrap() = Tag::Long(2);
        assert_eq!(tag.get("a"), Some(&Tag::Long(2)));

        let mut list = Tag::List(List::try_from(vec![Tag::Int(1)]).unwrap());
        assert!(list.get_mut(0).is_none());
        assert_eq!(list.get(0), Some(&Tag::Int(1)));
    }
}
