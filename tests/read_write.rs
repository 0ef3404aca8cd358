use tbnbt::{
    Compound, Error, List, Tag, TagID, compound, from_slice, read_named, skip_payload, to_vec,
    write_named,
};

fn level_document() -> Vec<u8> {
    let mut bytes = vec![0x0A, 0x00, 0x00];
    bytes.extend_from_slice(&[0x03, 0x00, 0x07]);
    bytes.extend_from_slice(b"version");
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    bytes.extend_from_slice(&[0x08, 0x00, 0x04]);
    bytes.extend_from_slice(b"name");
    bytes.extend_from_slice(&[0x00, 0x08]);
    bytes.extend_from_slice(b"MrYurihi");
    bytes.push(0x00);
    bytes
}

#[test]
fn test_encode_level_document() {
    let tag = Tag::Compound(compound! {
        "version" => 1i32,
        "name" => "MrYurihi",
    });
    assert_eq!(to_vec("", &tag).unwrap(), level_document());
}

#[test]
fn test_decode_level_document() {
    let (name, tag) = from_slice(&level_document()).unwrap();
    assert_eq!(name, "");
    assert_eq!(tag.get("version"), Some(&Tag::Int(1)));
    assert_eq!(tag.get("name").unwrap().as_str().unwrap(), "MrYurihi");
    assert_eq!(tag.as_compound().unwrap().len(), 2);
}

#[test]
fn test_every_kind_round_trips() {
    let mut nested = List::of(TagID::Compound);
    nested
        .push(compound! { "a" => 1i8, "b" => Tag::Double(-0.5) })
        .unwrap();
    nested.push(Compound::new()).unwrap();

    let mut compound = compound! {
        "byte" => i8::MIN,
        "short" => i16::MAX,
        "int" => -7i32,
        "long" => i64::MIN,
        "float" => 3.25f32,
        "double" => f64::MAX,
        "bytes" => vec![-1i8, 0, 1],
        "string" => "héllo",
        "ints" => vec![i32::MIN, 0, i32::MAX],
        "nested" => nested,
        "empty" => List::new(),
    };
    #[cfg(feature = "long_array")]
    compound
        .insert("longs", Tag::LongArray(vec![1, -1]))
        .unwrap();

    let tag = Tag::Compound(compound);
    let bytes = to_vec("root", &tag).unwrap();
    assert_eq!(from_slice(&bytes).unwrap(), ("root".to_string(), tag));
}

#[test]
fn test_float_bit_patterns_survive() {
    let floats = [f32::NAN, -f32::NAN, f32::INFINITY, -0.0, f32::from_bits(0x7F80_0001)];
    let doubles = [f64::NAN, f64::NEG_INFINITY, -0.0, f64::from_bits(0x7FF0_0000_0000_0001)];
    for value in floats {
        let bytes = to_vec("", &Tag::Float(value)).unwrap();
        let (_, tag) = from_slice(&bytes).unwrap();
        assert_eq!(tag.as_float().unwrap().to_bits(), value.to_bits());
        assert_eq!(to_vec("", &tag).unwrap(), bytes);
    }
    for value in doubles {
        let bytes = to_vec("", &Tag::Double(value)).unwrap();
        let (_, tag) = from_slice(&bytes).unwrap();
        assert_eq!(tag.as_double().unwrap().to_bits(), value.to_bits());
    }
}

#[test]
fn test_streamed_documents_read_back_in_order() {
    let mut buf = Vec::new();
    write_named(&mut buf, "first", &Tag::Short(1)).unwrap();
    write_named(&mut buf, "second", &Tag::Short(2)).unwrap();

    let mut src = buf.as_slice();
    assert_eq!(read_named(&mut src).unwrap().0, "first");
    assert_eq!(read_named(&mut src).unwrap().1, Tag::Short(2));
    assert!(src.is_empty());
}

#[test]
fn test_truncated_input() {
    let bytes = level_document();
    for len in 0..bytes.len() {
        assert!(
            matches!(from_slice(&bytes[..len]), Err(Error::EndOfFile)),
            "prefix of {len} bytes"
        );
    }
}

#[test]
fn test_trailing_data() {
    let mut bytes = level_document();
    bytes.extend_from_slice(&[0xAA, 0xBB]);
    assert!(matches!(from_slice(&bytes), Err(Error::TrailingData(2))));
}

#[test]
fn test_unknown_tag_id() {
    let bytes = [0x0A, 0x00, 0x00, 0x63, 0x00, 0x00];
    assert!(matches!(from_slice(&bytes), Err(Error::InvalidTagType(0x63))));
}

#[test]
fn test_root_end_tag() {
    assert!(matches!(from_slice(&[0x00]), Err(Error::EndTag)));
}

#[test]
fn test_negative_length() {
    let bytes = [0x07, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFE];
    assert!(matches!(from_slice(&bytes), Err(Error::NegativeLength(-2))));
}

#[test]
fn test_invalid_utf8_string() {
    let bytes = [0x08, 0x00, 0x00, 0x00, 0x02, 0xC3, 0x28];
    assert!(matches!(from_slice(&bytes), Err(Error::InvalidString)));
}

#[test]
fn test_oversized_length_is_not_preallocated() {
    // claims i32::MAX elements but carries none
    let bytes = [0x0B, 0x00, 0x00, 0x7F, 0xFF, 0xFF, 0xFF];
    assert!(matches!(from_slice(&bytes), Err(Error::EndOfFile)));
}

#[test]
fn test_duplicate_keys_keep_last_value() {
    let bytes = [
        0x0A, 0x00, 0x00, //
        0x01, 0x00, 0x01, b'k', 0x01, //
        0x01, 0x00, 0x01, b'k', 0x02, //
        0x00,
    ];
    let (_, tag) = from_slice(&bytes).unwrap();
    assert_eq!(tag.as_compound().unwrap().len(), 1);
    assert_eq!(tag.get("k"), Some(&Tag::Byte(2)));
}

#[test]
fn test_skip_payload_of_each_kind() {
    let tags = [
        Tag::Byte(1),
        Tag::Long(2),
        Tag::ByteArray(vec![1, 2, 3]),
        Tag::string("skip me").unwrap(),
        Tag::IntArray(vec![4, 5]),
        Tag::Compound(compound! { "x" => List::try_from(vec![Tag::Int(1)]).unwrap() }),
    ];
    for tag in tags {
        let mut buf = Vec::new();
        tag.write_payload(&mut buf).unwrap();
        buf.push(0xEE);
        let mut src = buf.as_slice();
        skip_payload(tag.id(), &mut src).unwrap();
        assert_eq!(src, [0xEE], "{:?}", tag.id());
    }
}
