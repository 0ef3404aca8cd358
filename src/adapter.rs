//! Mapping between Rust values and tagged payloads.
//!
//! A [`TypeAdapter`] encodes and decodes the payload of one kind of value. An
//! [`AdapterRegistry`] maps types to adapters: exact registrations first,
//! then [`AdapterFactory`]s for families of types (arrays, collections,
//! string-keyed maps), then the capabilities and parent a type declares in
//! its [`TypeDescriptor`], and finally the field-by-field [`ObjectAdapter`].
//!
//! ```
//! use tbnbt::{AdapterRegistry, nbt_object};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Player {
//!     name: String,
//!     level: i32,
//! }
//!
//! nbt_object!(Player { name, level });
//!
//! let registry = AdapterRegistry::new();
//! let player = Player { name: "Alex".into(), level: 7 };
//! let bytes = registry.to_vec(&player).unwrap();
//! assert_eq!(registry.from_slice::<Player>(&bytes).unwrap(), player);
//! ```

mod builtin;
mod descriptor;
mod map;
mod object;
mod registry;
mod sequence;
mod wrapper;

use std::{
    any::Any,
    io::{Read, Write},
    marker::PhantomData,
    sync::Arc,
};

pub use builtin::*;
pub use descriptor::*;
pub use map::*;
pub use object::*;
pub use registry::*;
pub use sequence::*;
pub use wrapper::*;

use crate::{Result, TagID};

/// Encodes and decodes the payload of values of one type.
///
/// Adapters never see the id or name of the tag they handle; the caller
/// (a container adapter, or the registry at the root) writes and consumes
/// those. `decode` receives the id that was actually read so that it can
/// reject a payload of the wrong kind.
pub trait TypeAdapter: Send + Sync {
    /// The tag kind this adapter writes.
    fn wire_kind(&self) -> TagID;

    /// Decodes one payload. `depth` counts the adapter calls enclosing this
    /// one; adapters that decode nested values pass it on one level deeper
    /// and fail with [`Error::DepthLimit`](crate::Error::DepthLimit) past the
    /// decoder's nesting limit.
    fn decode(
        &self,
        id: TagID,
        reader: &mut dyn Read,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
        depth: usize,
    ) -> Result<Box<dyn Any>>;

    fn encode(
        &self,
        writer: &mut dyn Write,
        value: &dyn Any,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Result<()>;
}

/// A statically typed adapter, registered with [`AdapterRegistry::register`].
///
/// ```
/// use std::io::{Read, Write};
/// use tbnbt::{Adapter, AdapterRegistry, Result, TagID, read_string, write_string};
///
/// // Stores booleans as the strings "yes" and "no".
/// struct YesNo;
///
/// impl Adapter<bool> for YesNo {
///     fn wire_kind(&self) -> TagID {
///         TagID::String
///     }
///
///     fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<bool> {
///         Ok(read_string(reader)? == "yes")
///     }
///
///     fn write(&self, writer: &mut dyn Write, value: &bool, _: &AdapterRegistry) -> Result<()> {
///         write_string(writer, if *value { "yes" } else { "no" })
///     }
/// }
///
/// let mut registry = AdapterRegistry::new();
/// registry.register::<bool>(YesNo);
/// assert_eq!(registry.to_vec(&true).unwrap(), [0x08, 0, 0, 0, 3, b'y', b'e', b's']);
/// ```
pub trait Adapter<T>: Send + Sync + 'static {
    fn wire_kind(&self) -> TagID;

    fn read(&self, reader: &mut dyn Read, registry: &AdapterRegistry) -> Result<T>;

    fn write(&self, writer: &mut dyn Write, value: &T, registry: &AdapterRegistry) -> Result<()>;
}

/// Produces adapters for a whole family of types.
///
/// Returns `None` when the factory does not apply to `ty`.
pub trait AdapterFactory: Send + Sync {
    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Option<Result<Arc<dyn TypeAdapter>>>;
}

/// Lifts a typed [`Adapter`] into a [`TypeAdapter`].
pub(crate) struct Typed<T, A> {
    adapter: A,
    _marker: PhantomData<fn() -> T>,
}

impl<T, A> Typed<T, A> {
    pub(crate) fn new(adapter: A) -> Self {
        Self {
            adapter,
            _marker: PhantomData,
        }
    }
}

impl<T: Any, A: Adapter<T>> TypeAdapter for Typed<T, A> {
    #[inline]
    fn wire_kind(&self) -> TagID {
        self.adapter.wire_kind()
    }

    fn decode(
        &self,
        id: TagID,
        reader: &mut dyn Read,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
        _: usize,
    ) -> Result<Box<dyn Any>> {
        self.adapter.wire_kind().expect(id)?;
        Ok(Box::new(self.adapter.read(reader, registry)?))
    }

    fn encode(
        &self,
        writer: &mut dyn Write,
        value: &dyn Any,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Result<()> {
        self.adapter
            .write(writer, downcast_ref::<T>(value)?, registry)
    }
}
