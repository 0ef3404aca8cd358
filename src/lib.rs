//! Named Binary Tag codec.
//!
//! Two ways in and out of the format:
//!
//! - the tag tree ([`Tag`], [`List`], [`Compound`]) with [`read_named`],
//!   [`write_named`], [`from_slice`] and [`to_vec`];
//! - the [`AdapterRegistry`], which maps Rust values straight to and from
//!   the wire without building a tree.
//!
//! [`TagReader`] and [`TagWriter`] wrap either mode around a stream, gzip
//! compressed by default.
//!
//! ```
//! use tbnbt::{compound, from_slice, to_vec, Tag};
//!
//! let tag = Tag::Compound(compound! { "version" => 1i16 });
//! let bytes = to_vec("", &tag).unwrap();
//! assert_eq!(from_slice(&bytes).unwrap(), (String::new(), tag));
//! ```

mod adapter;
mod error;
mod index;
mod read;
#[cfg(feature = "shared")]
mod shared;
mod stream;
mod tag;
mod util;
mod value;
mod write;

pub use adapter::*;
pub use error::*;
pub use index::*;
pub use read::*;
#[cfg(feature = "shared")]
pub use shared::*;
pub use stream::*;
pub use tag::*;
pub use util::*;
pub use value::*;
pub use write::*;

pub use flate2::Compression;
