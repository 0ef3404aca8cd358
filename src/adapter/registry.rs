use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    io::{Read, Write},
    sync::Arc,
};

use tracing::{debug, trace};

use super::builtin;
use crate::{
    Adapter, AdapterFactory, ArrayFactory, CollectionFactory, Error, FieldDescriptor, MapFactory,
    ObjectAdapter, ProjectedAdapter, Reflect, Relation, Result, Shape, TagID, TypeAdapter,
    TypeDescriptor, Typed, check_string_len, cold_path, downcast, read_id, read_string, write_id,
    write_string,
};

/// Maps types to the adapters that encode them.
///
/// Populate it first, then share it by reference: resolution only reads the
/// registry, so a registry that is no longer mutated can serve any number of
/// threads. Nothing is cached; every lookup walks the cascade described in
/// [`AdapterRegistry::find`].
pub struct AdapterRegistry {
    adapters: HashMap<TypeId, Arc<dyn TypeAdapter>>,
    factories: Vec<Box<dyn AdapterFactory>>,
    renames: HashMap<(TypeId, &'static str), String>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.len())
            .field("factories", &self.factories.len())
            .field("renames", &self.renames.len())
            .finish()
    }
}

impl AdapterRegistry {
    /// A registry with adapters for the primitives, `String`, the array
    /// kinds and the tag containers, and the array, collection and map
    /// factories.
    pub fn new() -> Self {
        let mut registry = Self {
            adapters: HashMap::new(),
            factories: Vec::new(),
            renames: HashMap::new(),
        };
        builtin::install(&mut registry);
        registry
            .add_factory(ArrayFactory)
            .add_factory(CollectionFactory)
            .add_factory(MapFactory);
        registry
    }

    /// Uses `adapter` for `T` exactly, replacing any previous adapter.
    pub fn register<T: Any>(&mut self, adapter: impl Adapter<T>) -> &mut Self {
        self.register_adapter::<T>(Arc::new(Typed::<T, _>::new(adapter)))
    }

    /// Like [`register`](Self::register), for an untyped adapter.
    pub fn register_adapter<T: Any>(&mut self, adapter: Arc<dyn TypeAdapter>) -> &mut Self {
        debug!(ty = type_name::<T>(), kind = %adapter.wire_kind(), "registering adapter");
        self.adapters.insert(TypeId::of::<T>(), adapter);
        self
    }

    /// Appends a factory. Factories run in the order they were added, after
    /// the built-in array, collection and map factories.
    pub fn add_factory(&mut self, factory: impl AdapterFactory + 'static) -> &mut Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// Writes `field` of `T` under `wire`, overriding any name declared with
    /// the field itself.
    ///
    /// # Errors
    ///
    /// [`Error::StringTooLong`] if `wire` is longer than 32,767 bytes.
    pub fn rename_field<T: Any>(
        &mut self,
        field: &'static str,
        wire: impl Into<String>,
    ) -> Result<&mut Self> {
        let wire = wire.into();
        check_string_len(wire.len())?;
        debug!(ty = type_name::<T>(), field, wire = %wire, "renaming field");
        self.renames.insert((TypeId::of::<T>(), field), wire);
        Ok(self)
    }

    /// The name `field` of `ty` is written under: a registered override,
    /// else the name declared with the field, else the field's own name.
    pub fn wire_name<'a>(&'a self, ty: &TypeDescriptor, field: &'a FieldDescriptor) -> &'a str {
        match self.renames.get(&(ty.id(), field.name())) {
            Some(wire) => wire,
            None => field.rename().unwrap_or(field.name()),
        }
    }

    /// Looks for an adapter for `ty`, trying in order:
    ///
    /// 1. wrappers, through the adapter of what they wrap
    /// 2. an exact registration
    /// 3. the factories
    /// 4. each capability of `ty`, depth-first
    /// 5. the parent of `ty`, and its parents in turn
    ///
    /// A capability or parent that is itself an object type ends the walk
    /// with the [`ObjectAdapter`] for it.
    ///
    /// Returns `Ok(None)` if none of these apply. Errors come from resolving
    /// the element types of wrappers and factory-built adapters.
    pub fn find(&self, ty: &TypeDescriptor) -> Result<Option<Arc<dyn TypeAdapter>>> {
        if let Shape::Wrapper(relation) = ty.shape() {
            let target = relation.target();
            let inner = self.resolve(&target)?;
            trace!(ty = ty.name(), target = target.name(), "unwrapping");
            return Ok(Some(Arc::new(ProjectedAdapter::new(*relation, target, inner))));
        }
        if let Some(adapter) = self.adapters.get(&ty.id()) {
            trace!(ty = ty.name(), "exact adapter");
            return Ok(Some(Arc::clone(adapter)));
        }
        for factory in &self.factories {
            if let Some(adapter) = factory.create(ty, self) {
                trace!(ty = ty.name(), "factory adapter");
                return adapter.map(Some);
            }
        }
        for capability in ty.capabilities() {
            if let Some(adapter) = self.through(capability)? {
                trace!(ty = ty.name(), "capability adapter");
                return Ok(Some(adapter));
            }
        }
        match ty.parent() {
            Some(parent) => self.through(parent),
            None => Ok(None),
        }
    }

    /// Resolves `relation`'s target, which may end in the object adapter
    /// when the target is an object type.
    fn through(&self, relation: &Relation) -> Result<Option<Arc<dyn TypeAdapter>>> {
        let target = relation.target();
        let inner = match self.find(&target)? {
            Some(inner) => inner,
            None if matches!(target.shape(), Shape::Object(_)) => {
                trace!(target = target.name(), "object adapter for related type");
                Arc::new(ObjectAdapter) as Arc<dyn TypeAdapter>
            }
            None => return Ok(None),
        };
        let adapter: Arc<dyn TypeAdapter> =
            Arc::new(ProjectedAdapter::new(*relation, target, inner));
        Ok(Some(adapter))
    }

    /// Resolves the adapter for `ty`, falling back to [`ObjectAdapter`] for
    /// object types.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] if no adapter applies.
    pub fn resolve(&self, ty: &TypeDescriptor) -> Result<Arc<dyn TypeAdapter>> {
        if let Some(adapter) = self.find(ty)? {
            return Ok(adapter);
        }
        if let Shape::Object(_) = ty.shape() {
            trace!(ty = ty.name(), "object adapter");
            return Ok(Arc::new(ObjectAdapter));
        }
        cold_path();
        debug!(ty = ty.name(), "no adapter");
        Err(Error::Unsupported(ty.name()))
    }

    #[inline]
    pub fn adapter_for<T: Reflect>(&self) -> Result<Arc<dyn TypeAdapter>> {
        self.resolve(&T::descriptor())
    }

    /// Writes `value` as a root document: the adapter's kind, an empty
    /// name, then the payload.
    pub fn to_writer<T: Reflect, W: Write>(&self, writer: &mut W, value: &T) -> Result<()> {
        let ty = T::descriptor();
        let adapter = self.resolve(&ty)?;
        write_id(writer, adapter.wire_kind())?;
        write_string(writer, "")?;
        adapter.encode(writer, value, &ty, self)
    }

    /// Reads a root document as a `T`. The root name is read and dropped.
    pub fn from_reader<T: Reflect, R: Read>(&self, reader: &mut R) -> Result<T> {
        let ty = T::descriptor();
        let adapter = self.resolve(&ty)?;
        let id = read_id(reader)?;
        if id == TagID::End {
            cold_path();
            return Err(Error::EndTag);
        }
        read_string(reader)?;
        downcast::<T>(adapter.decode(id, reader, &ty, self, 0)?)
    }

    pub fn to_vec<T: Reflect>(&self, value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.to_writer(&mut buf, value)?;
        Ok(buf)
    }

    /// Like [`from_reader`](Self::from_reader), but the document must span
    /// the whole slice.
    pub fn from_slice<T: Reflect>(&self, bytes: &[u8]) -> Result<T> {
        let mut rest = bytes;
        let value = self.from_reader(&mut rest)?;
        if !rest.is_empty() {
            cold_path();
            return Err(Error::TrailingData(rest.len()));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdapterRegistry>();
    }

    #[test]
    fn opaque_types_are_unsupported() {
        struct Handle;

        impl Reflect for Handle {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::opaque::<Handle>()
            }
        }

        let registry = AdapterRegistry::new();
        assert!(matches!(
            registry.adapter_for::<Handle>(),
            Err(Error::Unsupported(name)) if name.ends_with("Handle")
        ));
        assert!(matches!(
            registry.adapter_for::<Vec<Handle>>(),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn exact_match_beats_factories() {
        let registry = AdapterRegistry::new();
        assert_eq!(
            registry.adapter_for::<Vec<i32>>().unwrap().wire_kind(),
            TagID::IntArray
        );
        assert_eq!(
            registry.adapter_for::<Vec<i16>>().unwrap().wire_kind(),
            TagID::List
        );
    }

    #[test]
    fn root_name_is_empty() {
        let registry = AdapterRegistry::new();
        assert_eq!(registry.to_vec(&5i8).unwrap(), [0x01, 0x00, 0x00, 0x05]);
        assert!(matches!(
            registry.from_slice::<i8>(&[0x01, 0x00, 0x00, 0x05, 0xFF]),
            Err(Error::TrailingData(1))
        ));
    }
}
