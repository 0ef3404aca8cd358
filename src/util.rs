//! Big-endian field primitives shared by the tag codec and the adapters.
//!
//! Every multi-byte value goes through `zerocopy`'s byte-order wrappers so the
//! wire layout is spelled out in one place. Custom [`Adapter`](crate::Adapter)
//! implementations can use these to frame their own payloads.

use std::io::{Read, Write};

use zerocopy::byteorder::{self, BigEndian};

use crate::{Error, Result, TagID};

/// Largest encoded length a string or a name may have.
pub const MAX_STRING_LEN: usize = i16::MAX as usize;

/// Deepest nesting the decoders accept: lists and compounds in the tree,
/// nested adapter calls in the registry.
pub(crate) const MAX_DEPTH: usize = 512;

/// Upper bound on capacity reserved from an untrusted length prefix.
pub(crate) const PREALLOC_LIMIT: usize = 64 * 1024;

#[inline(always)]
#[cold]
pub(crate) fn cold_path() {}

/// Steps one level deeper, failing once [`MAX_DEPTH`] is reached.
#[inline]
pub(crate) fn enter(depth: usize) -> Result<usize> {
    if depth >= MAX_DEPTH {
        cold_path();
        return Err(Error::DepthLimit);
    }
    Ok(depth + 1)
}

#[inline]
pub(crate) fn check_string_len(len: usize) -> Result<()> {
    if len > MAX_STRING_LEN {
        cold_path();
        return Err(Error::StringTooLong(len));
    }
    Ok(())
}

#[inline]
fn read_bytes<const N: usize, R: Read + ?Sized>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

#[inline]
pub fn read_i8<R: Read + ?Sized>(reader: &mut R) -> Result<i8> {
    Ok(read_bytes::<1, R>(reader)?[0] as i8)
}

#[inline]
pub fn write_i8<W: Write + ?Sized>(writer: &mut W, value: i8) -> Result<()> {
    writer.write_all(&[value as u8]).map_err(Error::IO)
}

macro_rules! big_endian_io {
    ($($read:ident, $write:ident, $ty:ty, $wrapper:ident, $size:literal;)*) => {
        $(
            #[inline]
            pub fn $read<R: Read + ?Sized>(reader: &mut R) -> Result<$ty> {
                Ok(byteorder::$wrapper::<BigEndian>::from_bytes(read_bytes::<$size, R>(reader)?).get())
            }

            #[inline]
            pub fn $write<W: Write + ?Sized>(writer: &mut W, value: $ty) -> Result<()> {
                writer
                    .write_all(&byteorder::$wrapper::<BigEndian>::new(value).to_bytes())
                    .map_err(Error::IO)
            }
        )*
    };
}

big_endian_io! {
    read_i16, write_i16, i16, I16, 2;
    read_u16, write_u16, u16, U16, 2;
    read_i32, write_i32, i32, I32, 4;
    read_i64, write_i64, i64, I64, 8;
    read_f32, write_f32, f32, F32, 4;
    read_f64, write_f64, f64, F64, 8;
}

/// Reads a one-byte tag id.
#[inline]
pub fn read_id<R: Read + ?Sized>(reader: &mut R) -> Result<TagID> {
    TagID::from_id(read_bytes::<1, R>(reader)?[0])
}

#[inline]
pub fn write_id<W: Write + ?Sized>(writer: &mut W, id: TagID) -> Result<()> {
    writer.write_all(&[id.id()]).map_err(Error::IO)
}

/// Reads an `i32` length prefix, rejecting negative values.
#[inline]
pub fn read_len<R: Read + ?Sized>(reader: &mut R) -> Result<usize> {
    let len = read_i32(reader)?;
    if len < 0 {
        cold_path();
        return Err(Error::NegativeLength(len));
    }
    Ok(len as usize)
}

/// Writes an `i32` length prefix.
#[inline]
pub fn write_len<W: Write + ?Sized>(writer: &mut W, len: usize) -> Result<()> {
    if len > i32::MAX as usize {
        cold_path();
        return Err(Error::ListTooLong(len));
    }
    write_i32(writer, len as i32)
}

/// Reads a `u16`-prefixed UTF-8 string.
pub fn read_string<R: Read + ?Sized>(reader: &mut R) -> Result<String> {
    let len = read_u16(reader)? as usize;
    check_string_len(len)?;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| Error::InvalidString)
}

/// Writes a `u16`-prefixed UTF-8 string, failing if it is longer than
/// [`MAX_STRING_LEN`] bytes.
pub fn write_string<W: Write + ?Sized>(writer: &mut W, value: &str) -> Result<()> {
    check_string_len(value.len())?;
    write_u16(writer, value.len() as u16)?;
    writer.write_all(value.as_bytes()).map_err(Error::IO)
}

/// Reads exactly `len` bytes without trusting `len` for the up-front
/// allocation.
pub(crate) fn read_vec<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    (&mut *reader).take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        cold_path();
        return Err(Error::EndOfFile);
    }
    Ok(buf)
}

/// Discards exactly `len` bytes.
pub(crate) fn skip_bytes<R: Read + ?Sized>(reader: &mut R, len: u64) -> Result<()> {
    let copied = std::io::copy(&mut (&mut *reader).take(len), &mut std::io::sink())?;
    if copied != len {
        cold_path();
        return Err(Error::EndOfFile);
    }
    Ok(())
}
