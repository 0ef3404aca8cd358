use std::io::{self, Write};

use flate2::Compression;
use tbnbt::{
    AdapterRegistry, Error, StreamOptions, Tag, TagReader, TagWriter, compound, nbt_object, to_vec,
};

#[derive(Debug, Default, PartialEq)]
struct Level {
    version: i32,
    name: String,
}

nbt_object!(Level { version, name });

#[test]
fn test_gzip_is_the_default() {
    let tag = Tag::Compound(compound! { "version" => 1i32, "name" => "MrYurihi" });
    let mut writer = TagWriter::new(Vec::new());
    writer.write_tag(&tag, "").unwrap();
    let compressed = writer.finish().unwrap();
    assert_eq!(compressed[..2], [0x1F, 0x8B]);

    let mut decoder = flate2::read::GzDecoder::new(compressed.as_slice());
    let mut raw = Vec::new();
    io::Read::read_to_end(&mut decoder, &mut raw).unwrap();
    assert_eq!(raw, to_vec("", &tag).unwrap());

    let mut reader = TagReader::new(compressed.as_slice());
    assert_eq!(reader.read_tag().unwrap(), tag);
}

#[test]
fn test_adapter_mode_through_gzip() {
    let level = Level {
        version: 19133,
        name: "world".to_string(),
    };
    let options = StreamOptions::default().level(Compression::best());
    let mut writer = TagWriter::with_options(Vec::new(), options);
    writer.write_as(&level).unwrap();
    writer.write_as(&vec![1i64, 2, 3]).unwrap();
    let compressed = writer.finish().unwrap();

    let mut reader = TagReader::with_options(compressed.as_slice(), options);
    assert_eq!(reader.read_as::<Level>().unwrap(), level);
    assert_eq!(reader.read_as::<Vec<i64>>().unwrap(), [1, 2, 3]);
}

#[test]
fn test_adapter_and_tree_modes_agree() {
    let level = Level {
        version: 1,
        name: "MrYurihi".to_string(),
    };
    let registry = AdapterRegistry::new();
    let mut writer = TagWriter::with_options(Vec::new(), StreamOptions::uncompressed());
    writer.write_as_with(&level, &registry).unwrap();
    let bytes = writer.finish().unwrap();

    let mut reader = TagReader::with_options(bytes.as_slice(), StreamOptions::uncompressed());
    let (name, tag) = reader.read_named_tag().unwrap();
    assert_eq!(name, "");
    assert_eq!(tag.get("version"), Some(&Tag::Int(1)));

    let mut reader = TagReader::with_options(bytes.as_slice(), StreamOptions::uncompressed());
    assert_eq!(reader.read_as_with::<Level>(&registry).unwrap(), level);
}

#[test]
fn test_plain_reader_rejects_gzip_input() {
    let mut writer = TagWriter::new(Vec::new());
    writer.write_tag(&Tag::Byte(1), "").unwrap();
    let compressed = writer.finish().unwrap();

    // 0x1F is not a tag id
    let mut reader = TagReader::with_options(compressed.as_slice(), StreamOptions::uncompressed());
    assert!(matches!(reader.read_tag(), Err(Error::InvalidTagType(0x1F))));
}

/// A sink that fails every write.
struct Broken;

impl Write for Broken {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

#[test]
fn test_write_failures_propagate() {
    let mut writer = TagWriter::with_options(Broken, StreamOptions::uncompressed());
    assert!(matches!(
        writer.write_tag(&Tag::Int(1), "x"),
        Err(Error::IO(_))
    ));
    assert!(matches!(writer.finish(), Err(Error::IO(_))));
}
