use std::{
    any::Any,
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    AdapterFactory, AdapterRegistry, MapInfo, Reflect, Result, Shape, TagID, TypeAdapter,
    TypeDescriptor, enter, read_id, read_string, write_id, write_string,
};

/// Encodes a string-keyed map as a `Compound`, one named entry per key.
///
/// Entries whose value is absent (`None`) are left out.
pub struct MapAdapter {
    info: MapInfo,
    value: TypeDescriptor,
    adapter: Arc<dyn TypeAdapter>,
}

impl MapAdapter {
    pub fn new(info: MapInfo, registry: &AdapterRegistry) -> Result<Self> {
        let value = info.value();
        let adapter = registry.resolve(&value)?;
        Ok(Self {
            info,
            value,
            adapter,
        })
    }
}

impl TypeAdapter for MapAdapter {
    #[inline]
    fn wire_kind(&self) -> TagID {
        TagID::Compound
    }

    fn decode(
        &self,
        id: TagID,
        reader: &mut dyn Read,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
        depth: usize,
    ) -> Result<Box<dyn Any>> {
        TagID::Compound.expect(id)?;
        let depth = enter(depth)?;
        let mut entries = Vec::new();
        loop {
            let id = read_id(reader)?;
            if id == TagID::End {
                break;
            }
            let key = read_string(reader)?;
            let value = self.adapter.decode(id, reader, &self.value, registry, depth)?;
            entries.push((key, value));
        }
        self.info.collect(entries)
    }

    fn encode(
        &self,
        writer: &mut dyn Write,
        value: &dyn Any,
        _: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Result<()> {
        for (key, value) in self.info.entries(value)? {
            if self.value.is_absent(value) {
                continue;
            }
            write_id(writer, self.adapter.wire_kind())?;
            write_string(writer, key)?;
            self.adapter.encode(writer, value, &self.value, registry)?;
        }
        write_id(writer, TagID::End)
    }
}

/// Builds [`MapAdapter`]s for [`Shape::StringMap`] types.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapFactory;

impl AdapterFactory for MapFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        registry: &AdapterRegistry,
    ) -> Option<Result<Arc<dyn TypeAdapter>>> {
        match ty.shape() {
            Shape::StringMap(info) => Some(
                MapAdapter::new(*info, registry)
                    .map(|adapter| Arc::new(adapter) as Arc<dyn TypeAdapter>),
            ),
            _ => None,
        }
    }
}

impl<V: Reflect, S: BuildHasher + Default + 'static> Reflect for HashMap<String, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(Shape::StringMap(MapInfo::of::<Self, V>()))
    }
}

impl<V: Reflect> Reflect for BTreeMap<String, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new::<Self>(Shape::StringMap(MapInfo::of::<Self, V>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btree_map_is_a_compound() {
        let registry = AdapterRegistry::new();
        let map = BTreeMap::from([("a".to_string(), 1i8), ("b".to_string(), 2i8)]);
        let bytes = registry.to_vec(&map).unwrap();
        assert_eq!(
            bytes,
            [
                0x0A, 0, 0, //
                0x01, 0, 1, b'a', 1, //
                0x01, 0, 1, b'b', 2, //
                0x00,
            ]
        );
        assert_eq!(
            registry.from_slice::<HashMap<String, i8>>(&bytes).unwrap(),
            HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)])
        );
    }

    #[test]
    fn absent_values_are_skipped() {
        let registry = AdapterRegistry::new();
        let map = BTreeMap::from([("gone".to_string(), None), ("kept".to_string(), Some(5i32))]);
        let bytes = registry.to_vec(&map).unwrap();
        let decoded = registry
            .from_slice::<BTreeMap<String, Option<i32>>>(&bytes)
            .unwrap();
        assert_eq!(decoded, BTreeMap::from([("kept".to_string(), Some(5))]));
    }
}
