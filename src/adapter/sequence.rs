use std::{
    any::Any,
    collections::VecDeque,
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    AdapterFactory, AdapterRegistry, Error, PREALLOC_LIMIT, Reflect, Result, SequenceInfo, Shape,
    TagID, TypeAdapter, TypeDescriptor, cold_path, enter, read_id, read_len, write_id, write_len,
};

/// Encodes a sequence as a `List` of its elements' payloads.
///
/// The element adapter is resolved once, when the factory builds this
/// adapter, so every element is written with the same kind.
pub struct SequenceAdapter {
    info: SequenceInfo,
    element: TypeDescriptor,
    adapter: Arc<dyn TypeAdapter>,
}

impl SequenceAdapter {
    pub fn new(info: SequenceInfo, registry: &AdapterRegistry) -> Result<Self> {
        let element = info.element();
        let adapter = registry.resolve(&element)?;
        Ok(Self {
            info,
            element,
            adapter,
        })
    }
}

impl TypeAdapter for SequenceAdapter {
    #[inline]
    fn wire_kind(&self) -> TagID {
        TagID::List
    }

    fn decode(
        &self,
        id: TagID,
        reader: &mut dyn Read,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
        depth: usize,
    ) -> Result<Box<dyn Any>> {
        TagID::List.expect(id)?;
        let depth = enter(depth)?;
        let kind = read_id(reader)?;
        let len = read_len(reader)?;
        if kind == TagID::End && len > 0 {
            cold_path();
            return Err(Error::EndTag);
        }
        let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT / size_of::<Box<dyn Any>>()));
        for _ in 0..len {
            items.push(self.adapter.decode(kind, reader, &self.element, registry, depth)?);
        }
        self.info.collect(items)
    }

    fn encode(
        &self,
        writer: &mut dyn Write,
        value: &dyn Any,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Result<()> {
        let items = self.info.items(value)?;
        write_id(writer, self.adapter.wire_kind())?;
        write_len(writer, items.len())?;
        for item in items {
            self.adapter.encode(writer, item, &self.element, registry)?;
        }
        Ok(())
    }
}

/// Builds [`SequenceAdapter`]s for [`Shape::Array`] types.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayFactory;

impl AdapterFactory for ArrayFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Option<Result<Arc<dyn TypeAdapter>>> {
        match ty.shape() {
            Shape::Array(info) => Some(
                SequenceAdapter::new(*info, registry)
                    .map(|adapter| Arc::new(adapter) as Arc<dyn TypeAdapter>),
            ),
            _ => None,
        }
    }
}

/// Builds [`SequenceAdapter`]s for [`Shape::Collection`] types.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollectionFactory;

impl AdapterFactory for CollectionFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Option<Result<Arc<dyn TypeAdapter>>> {
        match ty.shape() {
            Shape::Collection(info) => Some(
                SequenceAdapter::new(*info, registry)
                    .map(|adapter| Arc::new(adapter) as Arc<dyn TypeAdapter>),
            ),
            _ => None,
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(Shape::Collection(SequenceInfo::of::<Self, T>()))
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(Shape::Collection(SequenceInfo::of::<Self, T>()))
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(Shape::Array(SequenceInfo::of::<Self, T>()))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(Shape::Array(SequenceInfo::array::<T, N>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_vec_is_a_list() {
        let registry = AdapterRegistry::new();
        let bytes = registry.to_vec(&vec![1i16, 2]).unwrap();
        assert_eq!(bytes, [0x09, 0, 0, 0x02, 0, 0, 0, 2, 0, 1, 0, 2]);
        assert_eq!(registry.from_slice::<Vec<i16>>(&bytes).unwrap(), [1, 2]);
    }

    #[test]
    fn fixed_array_checks_length() {
        let registry = AdapterRegistry::new();
        let bytes = registry.to_vec(&vec![1.0f32, 2.0, 3.0]).unwrap();
        assert_eq!(
            registry.from_slice::<[f32; 3]>(&bytes).unwrap(),
            [1.0, 2.0, 3.0]
        );
        assert!(matches!(
            registry.from_slice::<[f32; 2]>(&bytes),
            Err(Error::LengthMismatch(2, 3))
        ));
    }

    #[test]
    fn element_kind_is_checked() {
        let registry = AdapterRegistry::new();
        let bytes = registry.to_vec(&VecDeque::from([1i64])).unwrap();
        assert!(matches!(
            registry.from_slice::<Vec<i16>>(&bytes),
            Err(Error::TagMismatch(2, 4))
        ));
    }
}
