use std::{
    any::{Any, type_name},
    io::{Read, Write},
};

use tracing::trace;

use crate::{
    AdapterRegistry, DescriptorBuilder, Error, Extends, Reflect, Result, Shape, TagID,
    TypeAdapter, TypeDescriptor, downcast, downcast_ref, enter, read_id, read_string, skip_payload,
    write_id, write_string,
};

trait FieldAccess: Send + Sync {
    fn get<'a>(&self, object: &'a dyn Any) -> Result<&'a dyn Any>;

    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> Result<()>;
}

struct Accessor<O, F> {
    get: fn(&O) -> &F,
    get_mut: fn(&mut O) -> &mut F,
}

impl<O: Any, F: Any> FieldAccess for Accessor<O, F> {
    fn get<'a>(&self, object: &'a dyn Any) -> Result<&'a dyn Any> {
        let field: &F = (self.get)(downcast_ref::<O>(object)?);
        Ok(field as &dyn Any)
    }

    fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> Result<()> {
        let object = object
            .downcast_mut::<O>()
            .ok_or(Error::UnexpectedValue(type_name::<O>()))?;
        *(self.get_mut)(object) = downcast::<F>(value)?;
        Ok(())
    }
}

/// One named field of an object type.
pub struct FieldDescriptor {
    name: &'static str,
    rename: Option<&'static str>,
    ty: fn() -> TypeDescriptor,
    access: Box<dyn FieldAccess>,
}

impl FieldDescriptor {
    /// The field's own name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wire name declared with the field, if any.
    #[inline]
    pub fn rename(&self) -> Option<&'static str> {
        self.rename
    }

    #[inline]
    pub fn ty(&self) -> TypeDescriptor {
        (self.ty)()
    }

    #[inline]
    pub fn get<'a>(&self, object: &'a dyn Any) -> Result<&'a dyn Any> {
        self.access.get(object)
    }

    #[inline]
    pub fn set(&self, object: &mut dyn Any, value: Box<dyn Any>) -> Result<()> {
        self.access.set(object, value)
    }
}

/// The field table of an object type, in declaration order.
pub struct ObjectDescriptor {
    construct: fn() -> Box<dyn Any>,
    fields: Vec<FieldDescriptor>,
}

impl ObjectDescriptor {
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// A fresh value with every field at its default.
    #[inline]
    pub fn construct(&self) -> Box<dyn Any> {
        (self.construct)()
    }
}

fn construct<T: Default + Any>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Builds the descriptor of an object type field by field.
///
/// ```
/// use tbnbt::{ObjectDescriptor, Reflect, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Sign {
///     text: String,
///     glowing: bool,
/// }
///
/// impl Reflect for Sign {
///     fn descriptor() -> TypeDescriptor {
///         ObjectDescriptor::builder::<Sign>()
///             .field("text", |sign| &sign.text, |sign| &mut sign.text)
///             .renamed("glowing", "GlowingText", |sign| &sign.glowing, |sign| &mut sign.glowing)
///             .build()
///     }
/// }
/// ```
pub struct ObjectBuilder<T> {
    fields: Vec<FieldDescriptor>,
    inner: DescriptorBuilder<T>,
}

impl ObjectDescriptor {
    pub fn builder<T: Any + Default>() -> ObjectBuilder<T> {
        ObjectBuilder {
            fields: Vec::new(),
            inner: TypeDescriptor::builder::<T>(Shape::Opaque),
        }
    }
}

impl<T: Any + Default> ObjectBuilder<T> {
    pub fn field<F: Reflect>(
        self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.field_as(name, None, get, get_mut)
    }

    /// Adds a field that is written under `wire` instead of its own name.
    pub fn renamed<F: Reflect>(
        self,
        name: &'static str,
        wire: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.field_as(name, Some(wire), get, get_mut)
    }

    #[doc(hidden)]
    pub fn field_as<F: Reflect>(
        mut self,
        name: &'static str,
        rename: Option<&'static str>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            rename,
            ty: F::descriptor,
            access: Box::new(Accessor { get, get_mut }),
        });
        self
    }

    pub fn implements<C: Reflect>(mut self) -> Self
    where
        T: Extends<C>,
    {
        self.inner = self.inner.implements::<C>();
        self
    }

    pub fn extends<P: Reflect>(mut self) -> Self
    where
        T: Extends<P>,
    {
        self.inner = self.inner.extends::<P>();
        self
    }

    pub fn build(self) -> TypeDescriptor {
        let Self { fields, mut inner } = self;
        *inner.shape_mut() = Shape::Object(ObjectDescriptor {
            construct: construct::<T>,
            fields,
        });
        inner.build()
    }
}

/// Implements [`Reflect`] for a struct with named fields, so that the
/// registry can encode it field by field as a `Compound`.
///
/// The struct must implement `Default`; fields missing from the input keep
/// their default value. A field can be given a different wire name with
/// `as "name"`.
///
/// ```
/// use tbnbt::{AdapterRegistry, nbt_object};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Chest {
///     custom_name: Option<String>,
///     lock: String,
/// }
///
/// nbt_object!(Chest { custom_name as "CustomName", lock as "Lock" });
///
/// let registry = AdapterRegistry::new();
/// let chest = Chest { custom_name: None, lock: "key".into() };
/// let bytes = registry.to_vec(&chest).unwrap();
/// assert_eq!(registry.from_slice::<Chest>(&bytes).unwrap(), chest);
/// ```
#[macro_export]
macro_rules! nbt_object {
    (@wire) => {
        None
    };
    (@wire $wire:literal) => {
        Some($wire)
    };
    ($ty:ty { $($field:ident $(as $wire:literal)?),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::ObjectDescriptor::builder::<$ty>()
                    $(
                        .field_as(
                            stringify!($field),
                            $crate::nbt_object!(@wire $($wire)?),
                            |object| &object.$field,
                            |object| &mut object.$field,
                        )
                    )*
                    .build()
            }
        }
    };
}

/// Encodes a value as a `Compound` with one named entry per field.
///
/// Fields are written in declaration order; absent `Option` fields are left
/// out. On decode, entries are matched to fields by field name, then by the
/// declared rename or a registry override. Entries with no matching field
/// are skipped and fields with no entry keep their default.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectAdapter;

impl ObjectAdapter {
    fn descriptor(ty: &TypeDescriptor) -> Result<&ObjectDescriptor> {
        match ty.shape() {
            Shape::Object(object) => Ok(object),
            _ => Err(Error::Unsupported(ty.name())),
        }
    }
}

impl TypeAdapter for ObjectAdapter {
    #[inline]
    fn wire_kind(&self) -> TagID {
        TagID::Compound
    }

    fn decode(
        &self,
        id: TagID,
        reader: &mut dyn Read,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
        depth: usize,
    ) -> Result<Box<dyn Any>> {
        TagID::Compound.expect(id)?;
        let depth = enter(depth)?;
        let object = Self::descriptor(ty)?;
        let mut value = object.construct();
        loop {
            let id = read_id(reader)?;
            if id == TagID::End {
                return Ok(value);
            }
            let name = read_string(reader)?;
            let field = object
                .fields()
                .iter()
                .find(|field| field.name() == name)
                .or_else(|| {
                    object.fields().iter().find(|field| {
                        field.rename() == Some(name.as_str())
                            || registry.wire_name(ty, field) == name
                    })
                });
            let Some(field) = field else {
                trace!(ty = ty.name(), field = %name, "skipping unknown field");
                skip_payload(id, reader)?;
                continue;
            };
            let field_ty = field.ty();
            let adapter = registry.resolve(&field_ty)?;
            let field_value = adapter.decode(id, reader, &field_ty, registry, depth)?;
            field.set(&mut *value, field_value)?;
        }
    }

    fn encode(
        &self,
        writer: &mut dyn Write,
        value: &dyn Any,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Result<()> {
        let object = Self::descriptor(ty)?;
        for field in object.fields() {
            let field_value = field.get(value)?;
            let field_ty = field.ty();
            if field_ty.is_absent(field_value) {
                continue;
            }
            let adapter = registry.resolve(&field_ty)?;
            write_id(writer, adapter.wire_kind())?;
            write_string(writer, registry.wire_name(ty, field))?;
            adapter.encode(writer, field_value, &field_ty, registry)?;
        }
        write_id(writer, TagID::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    crate::nbt_object!(Point { x, y as "Y" });

    #[test]
    fn fields_follow_declaration_order() {
        let registry = AdapterRegistry::new();
        let bytes = registry.to_vec(&Point { x: 1, y: 2 }).unwrap();
        assert_eq!(
            bytes,
            [
                0x0A, 0, 0, //
                0x03, 0, 1, b'x', 0, 0, 0, 1, //
                0x03, 0, 1, b'Y', 0, 0, 0, 2, //
                0x00,
            ]
        );
    }

    #[test]
    fn decode_accepts_field_name_or_wire_name() {
        let registry = AdapterRegistry::new();
        let by_field_name = [0x0A, 0, 0, 0x03, 0, 1, b'y', 0, 0, 0, 9, 0x00];
        let by_wire_name = [0x0A, 0, 0, 0x03, 0, 1, b'Y', 0, 0, 0, 9, 0x00];
        for bytes in [by_field_name, by_wire_name] {
            assert_eq!(
                registry.from_slice::<Point>(&bytes).unwrap(),
                Point { x: 0, y: 9 }
            );
        }
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let registry = AdapterRegistry::new();
        let bytes = [
            0x0A, 0, 0, //
            0x08, 0, 1, b'z', 0, 2, b'h', b'i', //
            0x03, 0, 1, b'x', 0, 0, 0, 5, //
            0x00,
        ];
        assert_eq!(
            registry.from_slice::<Point>(&bytes).unwrap(),
            Point { x: 5, y: 0 }
        );
    }

    #[test]
    fn field_kind_is_checked() {
        let registry = AdapterRegistry::new();
        let bytes = [0x0A, 0, 0, 0x01, 0, 1, b'x', 5, 0x00];
        assert!(matches!(
            registry.from_slice::<Point>(&bytes),
            Err(Error::TagMismatch(3, 1))
        ));
    }

    #[derive(Debug, Default, PartialEq)]
    struct Node {
        child: Option<Box<Node>>,
    }

    crate::nbt_object!(Node { child });

    fn nested_nodes(levels: usize) -> Vec<u8> {
        let mut bytes = vec![0x0A, 0, 0];
        for _ in 0..levels {
            bytes.extend_from_slice(&[0x0A, 0, 5]);
            bytes.extend_from_slice(b"child");
        }
        bytes.extend(std::iter::repeat_n(0x00, levels + 1));
        bytes
    }

    #[test]
    fn recursive_types_decode_within_the_limit() {
        let registry = AdapterRegistry::new();
        let node = registry.from_slice::<Node>(&nested_nodes(3)).unwrap();
        let depth = std::iter::successors(Some(&node), |node| node.child.as_deref()).count();
        assert_eq!(depth, 4);
    }

    #[test]
    fn hostile_nesting_hits_the_depth_limit() {
        let registry = AdapterRegistry::new();
        for levels in [5_000, 200_000] {
            assert!(matches!(
                registry.from_slice::<Node>(&nested_nodes(levels)),
                Err(Error::DepthLimit)
            ));
        }
    }
}
