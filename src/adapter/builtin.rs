use std::io::{Read, Write};

use crate::{
    Adapter, AdapterRegistry, Compound, List, Reflect, Result, TagID, TypeDescriptor,
    read_byte_array, read_f32, read_f64, read_i8, read_i16, read_i32, read_i64,
    read_int_array, read_string, write_byte_array, write_f32, write_f64, write_i8, write_i16,
    write_i32, write_i64, write_int_array, write_string,
};
#[cfg(feature = "long_array")]
use crate::{read_long_array, write_long_array};

macro_rules! scalar_adapter {
    ($($name:ident: $ty:ty => $kind:ident, $read:ident, $write:ident;)*) => {
        $(
            #[doc = concat!("`", stringify!($ty), "` as a `", stringify!($kind), "` payload.")]
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $name;

            impl Adapter<$ty> for $name {
                #[inline]
                fn wire_kind(&self) -> TagID {
                    TagID::$kind
                }

                #[inline]
                fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<$ty> {
                    $read(reader)
                }

                #[inline]
                fn write(&self, writer: &mut dyn Write, value: &$ty, _: &AdapterRegistry) -> Result<()> {
                    $write(writer, *value)
                }
            }
        )*
    };
}

scalar_adapter! {
    ByteAdapter: i8 => Byte, read_i8, write_i8;
    ShortAdapter: i16 => Short, read_i16, write_i16;
    IntAdapter: i32 => Int, read_i32, write_i32;
    LongAdapter: i64 => Long, read_i64, write_i64;
    FloatAdapter: f32 => Float, read_f32, write_f32;
    DoubleAdapter: f64 => Double, read_f64, write_f64;
}

/// `u8` as a `Byte` payload, reinterpreting the sign bit.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsignedByteAdapter;

impl Adapter<u8> for UnsignedByteAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::Byte
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<u8> {
        Ok(read_i8(reader)? as u8)
    }

    fn write(&self, writer: &mut dyn Write, value: &u8, _: &AdapterRegistry) -> Result<()> {
        write_i8(writer, *value as i8)
    }
}

/// `bool` as a `Byte` payload of 1 or 0. Any non-zero byte reads as `true`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolAdapter;

impl Adapter<bool> for BoolAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::Byte
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<bool> {
        Ok(read_i8(reader)? != 0)
    }

    fn write(&self, writer: &mut dyn Write, value: &bool, _: &AdapterRegistry) -> Result<()> {
        write_i8(writer, *value as i8)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StringAdapter;

impl Adapter<String> for StringAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::String
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<String> {
        read_string(reader)
    }

    fn write(&self, writer: &mut dyn Write, value: &String, _: &AdapterRegistry) -> Result<()> {
        write_string(writer, value)
    }
}

/// `Vec<i8>` as a `ByteArray` payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByteArrayAdapter;

impl Adapter<Vec<i8>> for ByteArrayAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::ByteArray
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<Vec<i8>> {
        read_byte_array(reader)
    }

    fn write(&self, writer: &mut dyn Write, value: &Vec<i8>, _: &AdapterRegistry) -> Result<()> {
        write_byte_array(writer, value)
    }
}

/// `Vec<u8>` as a `ByteArray` payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct BytesAdapter;

impl Adapter<Vec<u8>> for BytesAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::ByteArray
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<Vec<u8>> {
        let bytes = read_byte_array(reader)?;
        Ok(bytes.into_iter().map(|byte| byte as u8).collect())
    }

    fn write(&self, writer: &mut dyn Write, value: &Vec<u8>, _: &AdapterRegistry) -> Result<()> {
        let signed = value.iter().map(|&byte| byte as i8).collect::<Vec<_>>();
        write_byte_array(writer, &signed)
    }
}

/// `Vec<i32>` as an `IntArray` payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntArrayAdapter;

impl Adapter<Vec<i32>> for IntArrayAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::IntArray
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<Vec<i32>> {
        read_int_array(reader)
    }

    fn write(&self, writer: &mut dyn Write, value: &Vec<i32>, _: &AdapterRegistry) -> Result<()> {
        write_int_array(writer, value)
    }
}

/// `Vec<i64>` as a `LongArray` payload.
#[cfg(feature = "long_array")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LongArrayAdapter;

#[cfg(feature = "long_array")]
impl Adapter<Vec<i64>> for LongArrayAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::LongArray
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<Vec<i64>> {
        read_long_array(reader)
    }

    fn write(&self, writer: &mut dyn Write, value: &Vec<i64>, _: &AdapterRegistry) -> Result<()> {
        write_long_array(writer, value)
    }
}

/// A [`Compound`] tree as a `Compound` payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompoundAdapter;

impl Adapter<Compound> for CompoundAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::Compound
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<Compound> {
        Compound::read_payload(reader)
    }

    fn write(&self, writer: &mut dyn Write, value: &Compound, _: &AdapterRegistry) -> Result<()> {
        value.write_payload(writer)
    }
}

/// A [`List`] tree as a `List` payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListAdapter;

impl Adapter<List> for ListAdapter {
    fn wire_kind(&self) -> TagID {
        TagID::List
    }

    fn read(&self, reader: &mut dyn Read, _: &AdapterRegistry) -> Result<List> {
        List::read_payload(reader)
    }

    fn write(&self, writer: &mut dyn Write, value: &List, _: &AdapterRegistry) -> Result<()> {
        value.write_payload(writer)
    }
}

macro_rules! reflect_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                #[inline]
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::primitive::<$ty>()
                }
            }
        )*
    };
}

reflect_primitive!(i8, u8, i16, i32, i64, f32, f64, bool, String, Compound, List);

// No built-in adapter; callers register one to use them.
reflect_primitive!(u16, u32, u64);

/// Installs the adapters every registry starts with.
pub(crate) fn install(registry: &mut AdapterRegistry) {
    registry
        .register::<i8>(ByteAdapter)
        .register::<u8>(UnsignedByteAdapter)
        .register::<i16>(ShortAdapter)
        .register::<i32>(IntAdapter)
        .register::<i64>(LongAdapter)
        .register::<f32>(FloatAdapter)
        .register::<f64>(DoubleAdapter)
        .register::<bool>(BoolAdapter)
        .register::<String>(StringAdapter)
        .register::<Vec<i8>>(ByteArrayAdapter)
        .register::<Vec<u8>>(BytesAdapter)
        .register::<Vec<i32>>(IntArrayAdapter)
        .register::<Compound>(CompoundAdapter)
        .register::<List>(ListAdapter);
    #[cfg(feature = "long_array")]
    registry.register::<Vec<i64>>(LongArrayAdapter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_reads_any_nonzero_byte() {
        let registry = AdapterRegistry::new();
        assert!(BoolAdapter.read(&mut &[0x02u8][..], &registry).unwrap());
        assert!(!BoolAdapter.read(&mut &[0x00u8][..], &registry).unwrap());
    }

    #[test]
    fn unsigned_bytes_keep_their_bits() {
        let registry = AdapterRegistry::new();
        let mut buf = Vec::new();
        BytesAdapter
            .write(&mut buf, &vec![0xFF, 0x01], &registry)
            .unwrap();
        assert_eq!(buf, [0, 0, 0, 2, 0xFF, 0x01]);
        assert_eq!(
            BytesAdapter.read(&mut buf.as_slice(), &registry).unwrap(),
            [0xFF, 0x01]
        );
    }
}
