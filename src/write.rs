use std::io::Write;

use zerocopy::{
    IntoBytes,
    byteorder::{self, BigEndian},
};

use crate::{
    Compound, Error, List, Result, Tag, TagID, write_f32, write_f64, write_i8, write_i16,
    write_i32, write_i64, write_id, write_len, write_string,
};

macro_rules! write_number_array {
    ($writer:expr, $values:expr, $wrapper:ident) => {{
        write_len($writer, $values.len())?;
        let encoded = $values
            .iter()
            .map(|value| byteorder::$wrapper::<BigEndian>::new(*value))
            .collect::<Vec<_>>();
        $writer.write_all(encoded.as_bytes()).map_err(Error::IO)
    }};
}

impl Tag {
    /// Encodes the payload of this tag, without id or name.
    pub fn write_payload<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match self {
            Tag::Byte(value) => write_i8(writer, *value),
            Tag::Short(value) => write_i16(writer, *value),
            Tag::Int(value) => write_i32(writer, *value),
            Tag::Long(value) => write_i64(writer, *value),
            Tag::Float(value) => write_f32(writer, *value),
            Tag::Double(value) => write_f64(writer, *value),
            Tag::ByteArray(value) => write_byte_array(writer, value),
            Tag::String(value) => write_string(writer, value),
            Tag::List(list) => write_list(writer, list),
            Tag::Compound(compound) => write_compound(writer, compound),
            Tag::IntArray(value) => write_int_array(writer, value),
            #[cfg(feature = "long_array")]
            Tag::LongArray(value) => write_long_array(writer, value),
        }
    }

    /// Encodes this tag as a named compound member: id, name, payload.
    pub fn write_entry<W: Write + ?Sized>(&self, writer: &mut W, name: &str) -> Result<()> {
        write_id(writer, self.id())?;
        write_string(writer, name)?;
        self.write_payload(writer)
    }
}

impl Compound {
    #[inline]
    pub fn write_payload<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_compound(writer, self)
    }
}

impl List {
    #[inline]
    pub fn write_payload<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        write_list(writer, self)
    }
}

pub(crate) fn write_byte_array<W: Write + ?Sized>(writer: &mut W, value: &[i8]) -> Result<()> {
    write_len(writer, value.len())?;
    writer.write_all(value.as_bytes()).map_err(Error::IO)
}

pub(crate) fn write_int_array<W: Write + ?Sized>(writer: &mut W, value: &[i32]) -> Result<()> {
    write_number_array!(writer, value, I32)
}

#[cfg(feature = "long_array")]
pub(crate) fn write_long_array<W: Write + ?Sized>(writer: &mut W, value: &[i64]) -> Result<()> {
    write_number_array!(writer, value, I64)
}

fn write_list<W: Write + ?Sized>(writer: &mut W, list: &List) -> Result<()> {
    write_id(writer, list.kind())?;
    write_len(writer, list.len())?;
    for item in list {
        item.write_payload(writer)?;
    }
    Ok(())
}

fn write_compound<W: Write + ?Sized>(writer: &mut W, compound: &Compound) -> Result<()> {
    for (name, value) in compound {
        value.write_entry(writer, name)?;
    }
    write_id(writer, TagID::End)
}

/// Writes one document: the root id, `name` and the payload of `tag`.
///
/// Bytes are written as they are produced; on error the writer may hold a
/// partial document. Use [`to_vec`] to stage a complete document first.
pub fn write_named<W: Write + ?Sized>(writer: &mut W, name: &str, tag: &Tag) -> Result<()> {
    tag.write_entry(writer, name)
}

/// Encodes one document into a new buffer.
///
/// ```
/// use tbnbt::{to_vec, Tag};
///
/// let bytes = to_vec("", &Tag::Short(0x0102)).unwrap();
/// assert_eq!(bytes, [0x02, 0x00, 0x00, 0x01, 0x02]);
/// ```
pub fn to_vec(name: &str, tag: &Tag) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_named(&mut buf, name, tag)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_elements_are_unnamed() {
        let list = List::try_from(vec![Tag::Byte(1), Tag::Byte(2)]).unwrap();
        let mut buf = Vec::new();
        Tag::List(list).write_payload(&mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x00, 0x00, 0x00, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn int_array_layout() {
        let mut buf = Vec::new();
        Tag::IntArray(vec![1, -1])
            .write_payload(&mut buf)
            .unwrap();
        assert_eq!(
            buf,
            [0, 0, 0, 2, 0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn empty_compound_is_only_the_terminator() {
        let mut buf = Vec::new();
        Tag::Compound(Compound::new())
            .write_payload(&mut buf)
            .unwrap();
        assert_eq!(buf, [0x00]);
    }
}
