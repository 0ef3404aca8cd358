use bytes::Bytes;

use crate::{Result, Tag, from_slice, to_vec};

/// Encodes one document into a [`Bytes`] buffer that can be handed to other
/// owners without copying.
pub fn to_bytes(name: &str, tag: &Tag) -> Result<Bytes> {
    to_vec(name, tag).map(Bytes::from)
}

/// Decodes a document that must span the whole buffer.
pub fn from_bytes(bytes: &Bytes) -> Result<(String, Tag)> {
    from_slice(bytes)
}
