use std::io::Read;

use zerocopy::{
    FromBytes,
    byteorder::{self, BigEndian},
};

use crate::{
    Compound, Error, List, NbtString, PREALLOC_LIMIT, Result, Tag, TagID, cold_path, enter,
    read_f32, read_f64, read_i8, read_i16, read_i32, read_i64, read_id, read_len, read_string,
    read_u16, read_vec, skip_bytes,
};

/// Size in bytes of a fixed-width payload, `None` for variable-width kinds.
const fn fixed_size(id: TagID) -> Option<u64> {
    match id {
        TagID::Byte => Some(1),
        TagID::Short => Some(2),
        TagID::Int | TagID::Float => Some(4),
        TagID::Long | TagID::Double => Some(8),
        _ => None,
    }
}

macro_rules! read_number_array {
    ($reader:expr, $wrapper:ident, $width:literal) => {{
        let len = read_len($reader)?;
        let bytes = read_vec($reader, len * $width)?;
        let values = <[byteorder::$wrapper<BigEndian>]>::ref_from_bytes(&bytes)
            .map_err(|_| Error::EndOfFile)?;
        values.iter().map(|value| value.get()).collect::<Vec<_>>()
    }};
}

impl Tag {
    /// Decodes the payload of a tag of kind `id`. The id and any name have
    /// already been consumed.
    ///
    /// # Errors
    ///
    /// - [`Error::EndOfFile`] if the stream ends inside the payload
    /// - [`Error::InvalidTagType`] for an unknown id inside a container
    /// - [`Error::EndTag`] if `id` is End
    pub fn read_payload<R: Read + ?Sized>(id: TagID, reader: &mut R) -> Result<Tag> {
        read_payload_at(id, reader, 0)
    }
}

impl Compound {
    /// Decodes a compound payload: named entries up to the End marker.
    pub fn read_payload<R: Read + ?Sized>(reader: &mut R) -> Result<Compound> {
        read_compound(reader, enter(0)?)
    }
}

impl List {
    /// Decodes a list payload: element kind, length, unnamed elements.
    pub fn read_payload<R: Read + ?Sized>(reader: &mut R) -> Result<List> {
        read_list(reader, enter(0)?)
    }
}

fn read_payload_at<R: Read + ?Sized>(id: TagID, reader: &mut R, depth: usize) -> Result<Tag> {
    Ok(match id {
        TagID::End => {
            cold_path();
            return Err(Error::EndTag);
        }
        TagID::Byte => Tag::Byte(read_i8(reader)?),
        TagID::Short => Tag::Short(read_i16(reader)?),
        TagID::Int => Tag::Int(read_i32(reader)?),
        TagID::Long => Tag::Long(read_i64(reader)?),
        TagID::Float => Tag::Float(read_f32(reader)?),
        TagID::Double => Tag::Double(read_f64(reader)?),
        TagID::ByteArray => Tag::ByteArray(read_byte_array(reader)?),
        TagID::String => Tag::String(NbtString::new(read_string(reader)?)?),
        TagID::List => Tag::List(read_list(reader, enter(depth)?)?),
        TagID::Compound => Tag::Compound(read_compound(reader, enter(depth)?)?),
        TagID::IntArray => Tag::IntArray(read_int_array(reader)?),
        #[cfg(feature = "long_array")]
        TagID::LongArray => Tag::LongArray(read_long_array(reader)?),
    })
}

pub(crate) fn read_byte_array<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<i8>> {
    let len = read_len(reader)?;
    let bytes = read_vec(reader, len)?;
    Ok(bytes.into_iter().map(|byte| byte as i8).collect())
}

pub(crate) fn read_int_array<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<i32>> {
    Ok(read_number_array!(reader, I32, 4))
}

#[cfg(feature = "long_array")]
pub(crate) fn read_long_array<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<i64>> {
    Ok(read_number_array!(reader, I64, 8))
}

fn read_list<R: Read + ?Sized>(reader: &mut R, depth: usize) -> Result<List> {
    let kind = read_id(reader)?;
    let len = read_len(reader)?;
    if kind == TagID::End && len > 0 {
        cold_path();
        return Err(Error::EndTag);
    }
    let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT / size_of::<Tag>()));
    for _ in 0..len {
        items.push(read_payload_at(kind, reader, depth)?);
    }
    Ok(List::from_parts_unchecked(kind, items))
}

fn read_compound<R: Read + ?Sized>(reader: &mut R, depth: usize) -> Result<Compound> {
    let mut compound = Compound::new();
    loop {
        let id = read_id(reader)?;
        if id == TagID::End {
            return Ok(compound);
        }
        let name = read_string(reader)?;
        let value = read_payload_at(id, reader, depth)?;
        if compound.contains_key(&name) {
            cold_path();
            compound.insert(name, value)?;
        } else {
            compound.push_unchecked(name, value);
        }
    }
}

/// Reads one document: the root id, its name and its payload.
///
/// ```
/// use tbnbt::{read_named, Tag};
///
/// let bytes = [0x03, 0x00, 0x01, b'n', 0x00, 0x00, 0x00, 0x2A];
/// let (name, tag) = read_named(&mut &bytes[..]).unwrap();
/// assert_eq!(name, "n");
/// assert_eq!(tag, Tag::Int(42));
/// ```
pub fn read_named<R: Read + ?Sized>(reader: &mut R) -> Result<(String, Tag)> {
    let id = read_id(reader)?;
    if id == TagID::End {
        cold_path();
        return Err(Error::EndTag);
    }
    let name = read_string(reader)?;
    let tag = read_payload_at(id, reader, 0)?;
    Ok((name, tag))
}

/// Decodes a document that must span the whole slice.
///
/// # Errors
///
/// [`Error::TrailingData`] if bytes remain after the root payload.
pub fn from_slice(bytes: &[u8]) -> Result<(String, Tag)> {
    let mut rest = bytes;
    let document = read_named(&mut rest)?;
    if !rest.is_empty() {
        cold_path();
        return Err(Error::TrailingData(rest.len()));
    }
    Ok(document)
}

/// Consumes one payload of kind `id` without building it.
pub fn skip_payload<R: Read + ?Sized>(id: TagID, reader: &mut R) -> Result<()> {
    skip_payload_at(id, reader, 0)
}

fn skip_payload_at<R: Read + ?Sized>(id: TagID, reader: &mut R, depth: usize) -> Result<()> {
    if let Some(size) = fixed_size(id) {
        return skip_bytes(reader, size);
    }
    match id {
        TagID::End => {
            cold_path();
            Err(Error::EndTag)
        }
        TagID::ByteArray => {
            let len = read_len(reader)? as u64;
            skip_bytes(reader, len)
        }
        TagID::String => {
            let len = read_u16(reader)? as u64;
            skip_bytes(reader, len)
        }
        TagID::IntArray => {
            let len = read_len(reader)? as u64;
            skip_bytes(reader, len * 4)
        }
        #[cfg(feature = "long_array")]
        TagID::LongArray => {
            let len = read_len(reader)? as u64;
            skip_bytes(reader, len * 8)
        }
        TagID::List => {
            let depth = enter(depth)?;
            let kind = read_id(reader)?;
            let len = read_len(reader)?;
            if len == 0 {
                return Ok(());
            }
            match fixed_size(kind) {
                Some(size) => skip_bytes(reader, size * len as u64),
                None => {
                    for _ in 0..len {
                        skip_payload_at(kind, reader, depth)?;
                    }
                    Ok(())
                }
            }
        }
        TagID::Compound => {
            let depth = enter(depth)?;
            loop {
                let id = read_id(reader)?;
                if id == TagID::End {
                    return Ok(());
                }
                let name_len = read_u16(reader)? as u64;
                skip_bytes(reader, name_len)?;
                skip_payload_at(id, reader, depth)?;
            }
        }
        _ => unreachable!("fixed-size kinds are handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_DEPTH;

    #[test]
    fn skip_consumes_exactly_one_payload() {
        // compound { "a": list<int>[1, 2], "b": string "hi" } followed by a marker byte
        let bytes: &[u8] = &[
            0x09, 0x00, 0x01, b'a', 0x03, 0x00, 0x00, 0x00, 0x02, 0, 0, 0, 1, 0, 0, 0, 2, //
            0x08, 0x00, 0x01, b'b', 0x00, 0x02, b'h', b'i', //
            0x00, 0x7F,
        ];
        let mut src = bytes;
        skip_payload(TagID::Compound, &mut src).unwrap();
        assert_eq!(src, [0x7F]);
    }

    #[test]
    fn list_of_end_must_be_empty() {
        let mut src: &[u8] = &[0x00, 0x00, 0x00, 0x00, 0x00];
        let tag = Tag::read_payload(TagID::List, &mut src).unwrap();
        assert_eq!(tag.as_list().unwrap().kind(), TagID::End);

        let mut src: &[u8] = &[0x00, 0x00, 0x00, 0x00, 0x01];
        assert!(matches!(
            Tag::read_payload(TagID::List, &mut src),
            Err(Error::EndTag)
        ));
    }

    #[test]
    fn deep_nesting_hits_the_limit() {
        let mut bytes = Vec::new();
        for _ in 0..=MAX_DEPTH {
            bytes.extend_from_slice(&[0x09, 0x00, 0x00, 0x00, 0x01]);
        }
        let mut src = bytes.as_slice();
        assert!(matches!(
            Tag::read_payload(TagID::List, &mut src),
            Err(Error::DepthLimit)
        ));
    }
}
