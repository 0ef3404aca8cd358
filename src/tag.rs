use std::fmt;

use crate::{Error, Result};

/// The kind of a tag and its id on the wire.
///
/// `End` is the compound terminator and never a value of its own.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum TagID {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    #[cfg(feature = "long_array")]
    LongArray = 12,
}

impl TagID {
    /// Returns the wire id of this kind.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up the kind for a wire id.
    ///
    /// # Example
    ///
    /// ```
    /// use tbnbt::{Error, TagID};
    ///
    /// assert_eq!(TagID::from_id(10).unwrap(), TagID::Compound);
    /// assert!(matches!(TagID::from_id(42), Err(Error::InvalidTagType(42))));
    /// ```
    pub const fn from_id(id: u8) -> Result<Self> {
        Ok(match id {
            0 => Self::End,
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::Int,
            4 => Self::Long,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::ByteArray,
            8 => Self::String,
            9 => Self::List,
            10 => Self::Compound,
            11 => Self::IntArray,
            #[cfg(feature = "long_array")]
            12 => Self::LongArray,
            _ => return Err(Error::InvalidTagType(id)),
        })
    }

    /// Returns `true` if this is a primitive tag type.
    ///
    /// Primitive tags are: End, Byte, Short, Int, Long, Float, Double.
    /// These tags store their values directly without additional structure.
    ///
    /// # Example
    ///
    /// ```
    /// use tbnbt::TagID;
    ///
    /// assert!(TagID::Int.is_primitive());
    /// assert!(TagID::Double.is_primitive());
    /// assert!(!TagID::List.is_primitive());
    /// assert!(!TagID::ByteArray.is_primitive());
    /// ```
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::End
                | Self::Byte
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
        )
    }

    /// Returns `true` if this is an array tag type.
    ///
    /// Array tags are: ByteArray, IntArray and, with the `long_array`
    /// feature, LongArray.
    pub const fn is_array(self) -> bool {
        #[cfg(feature = "long_array")]
        if matches!(self, Self::LongArray) {
            return true;
        }
        matches!(self, Self::ByteArray | Self::IntArray)
    }

    /// Returns `true` if this is a composite tag type.
    ///
    /// Composite tags are: List, Compound.
    /// These contain other tags as children.
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::List | Self::Compound)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::End => "End",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::ByteArray => "ByteArray",
            Self::String => "String",
            Self::List => "List",
            Self::Compound => "Compound",
            Self::IntArray => "IntArray",
            #[cfg(feature = "long_array")]
            Self::LongArray => "LongArray",
        }
    }

    /// Fails with [`Error::TagMismatch`] unless `actual` is this kind.
    #[inline]
    pub(crate) fn expect(self, actual: TagID) -> Result<()> {
        if self == actual {
            Ok(())
        } else {
            Err(Error::TagMismatch(self.id(), actual.id()))
        }
    }
}

impl TryFrom<u8> for TagID {
    type Error = Error;

    #[inline]
    fn try_from(id: u8) -> Result<Self> {
        Self::from_id(id)
    }
}

impl From<TagID> for u8 {
    #[inline]
    fn from(tag: TagID) -> Self {
        tag.id()
    }
}

impl fmt::Display for TagID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
