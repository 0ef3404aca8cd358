//! Errors raised by the codec, the tag tree and the adapter registry.
//!
//! Decoding never panics on malformed input; every failure surfaces as an
//! [`Error`] variant that can be matched on.
//!
//! ```
//! use tbnbt::{AdapterRegistry, Error, from_slice};
//!
//! // A Short payload cut off after one byte.
//! let truncated = [0x02, 0x00, 0x00, 0x7F];
//! assert!(matches!(from_slice(&truncated), Err(Error::EndOfFile)));
//!
//! // An Int document read as a String.
//! let registry = AdapterRegistry::new();
//! let int = [0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A];
//! match registry.from_slice::<String>(&int) {
//!     Err(Error::TagMismatch(expected, actual)) => assert_eq!((expected, actual), (8, 3)),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use std::fmt::{self, Display};
use std::io;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading, writing or mapping tags.
///
/// Variants carrying two ids or lengths are ordered `(expected, actual)`.
#[derive(Debug)]
pub enum Error {
    /// A custom message, typically raised by a caller-provided adapter.
    Message(String),

    /// The underlying reader or writer failed with anything other than an
    /// unexpected end of file.
    IO(io::Error),

    /// The input stopped inside a document.
    EndOfFile,

    /// Extra bytes remain after decoding a complete document from a slice.
    TrailingData(usize),

    /// An invalid tag id was encountered.
    InvalidTagType(u8),

    /// An End tag was found where a value is required (a root document or a
    /// non-empty list of End).
    EndTag,

    /// A tag kind disagreed with the kind required at that position:
    /// `(expected, actual)`.
    TagMismatch(u8, u8),

    /// A string's encoded length exceeds 32,767 bytes.
    StringTooLong(usize),

    /// A string on the wire is not valid UTF-8.
    InvalidString,

    /// A length prefix on the wire is negative.
    NegativeLength(i32),

    /// A sequence is too long to be described by a 32-bit signed length.
    ListTooLong(usize),

    /// A list position past the end: `(index, len)`.
    IndexOutOfBounds(usize, usize),

    /// Nested lists and compounds exceed the decoder's depth limit.
    DepthLimit,

    /// No adapter could be resolved for the named type.
    Unsupported(&'static str),

    /// A fixed-size array was decoded from a list of a different length:
    /// `(expected, actual)`.
    LengthMismatch(usize, usize),

    /// An adapter received a value that is not of the type it handles.
    UnexpectedValue(&'static str),

    /// An absent optional value was asked to be written where a payload is
    /// mandatory (a root document, a list element).
    MissingValue(&'static str),
}

impl Error {
    /// Builds a [`Error::Message`] from anything displayable.
    pub fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::UnexpectedEof {
            Error::EndOfFile
        } else {
            Error::IO(error)
        }
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(message) => formatter.write_str(message),
            Error::IO(error) => formatter.write_str(&error.to_string()),
            Error::EndOfFile => formatter.write_str("unexpected end of input"),
            Error::TrailingData(remaining_bytes) => formatter.write_str(&format!(
                "trailing data after end of input: {remaining_bytes} bytes remaining"
            )),
            Error::InvalidTagType(tag) => {
                formatter.write_str(&format!("invalid tag type: {tag:#04x}"))
            }
            Error::EndTag => formatter.write_str("unexpected end tag"),
            Error::TagMismatch(expected, actual) => formatter.write_str(&format!(
                "tag mismatch: expected {expected:#04x}, got {actual:#04x}"
            )),
            Error::StringTooLong(len) => formatter.write_str(&format!(
                "string too long: {len} bytes, at most 32767 allowed"
            )),
            Error::InvalidString => formatter.write_str("string is not valid UTF-8"),
            Error::NegativeLength(len) => {
                formatter.write_str(&format!("negative length prefix: {len}"))
            }
            Error::ListTooLong(len) => formatter.write_str(&format!("list length too long: {len}")),
            Error::IndexOutOfBounds(index, len) => formatter.write_str(&format!(
                "index {index} out of bounds for list of length {len}"
            )),
            Error::DepthLimit => formatter.write_str("nesting depth limit exceeded"),
            Error::Unsupported(name) => {
                formatter.write_str(&format!("no adapter can handle type `{name}`"))
            }
            Error::LengthMismatch(expected, actual) => formatter.write_str(&format!(
                "array length mismatch: expected {expected}, got {actual}"
            )),
            Error::UnexpectedValue(name) => {
                formatter.write_str(&format!("value is not a `{name}`"))
            }
            Error::MissingValue(name) => {
                formatter.write_str(&format!("no value present for `{name}`"))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(error) => Some(error),
            _ => None,
        }
    }
}
