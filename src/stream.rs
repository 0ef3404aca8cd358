//! Document streams, optionally gzip compressed.

use std::{
    io::{self, BufReader, Read, Write},
    sync::OnceLock,
};

use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use tracing::debug;

use crate::{AdapterRegistry, Error, Reflect, Result, Tag, read_named, to_vec};

/// How a [`TagReader`] or [`TagWriter`] treats the underlying stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamOptions {
    /// Wrap the stream in gzip. On by default.
    pub compressed: bool,
    /// Compression level used by writers.
    pub level: Compression,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            compressed: true,
            level: Compression::default(),
        }
    }
}

impl StreamOptions {
    /// Options for a stream of raw, uncompressed documents.
    pub fn uncompressed() -> Self {
        Self {
            compressed: false,
            ..Self::default()
        }
    }

    pub fn level(self, level: Compression) -> Self {
        Self { level, ..self }
    }
}

fn default_registry() -> &'static AdapterRegistry {
    static REGISTRY: OnceLock<AdapterRegistry> = OnceLock::new();
    REGISTRY.get_or_init(AdapterRegistry::new)
}

enum Source<R: Read> {
    Plain(BufReader<R>),
    Gzip(GzDecoder<R>),
}

impl<R: Read> Read for Source<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Plain(reader) => reader.read(buf),
            Source::Gzip(reader) => reader.read(buf),
        }
    }
}

/// Reads documents one at a time from a byte stream.
///
/// Each call consumes exactly one root document. Plain streams are read
/// through an internal buffer, so bytes past the last document may already
/// have been pulled from the inner reader.
pub struct TagReader<R: Read> {
    source: Source<R>,
}

impl<R: Read> TagReader<R> {
    /// A reader for a gzip-compressed stream.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, StreamOptions::default())
    }

    pub fn with_options(inner: R, options: StreamOptions) -> Self {
        debug!(compressed = options.compressed, "opening tag reader");
        let source = if options.compressed {
            Source::Gzip(GzDecoder::new(inner))
        } else {
            Source::Plain(BufReader::new(inner))
        };
        Self { source }
    }

    /// Reads one document and drops its root name.
    pub fn read_tag(&mut self) -> Result<Tag> {
        self.read_named_tag().map(|(_, tag)| tag)
    }

    pub fn read_named_tag(&mut self) -> Result<(String, Tag)> {
        read_named(&mut self.source)
    }

    /// Reads one document as a `T`, using a registry with only the built-in
    /// adapters.
    pub fn read_as<T: Reflect>(&mut self) -> Result<T> {
        self.read_as_with(default_registry())
    }

    pub fn read_as_with<T: Reflect>(&mut self, registry: &AdapterRegistry) -> Result<T> {
        registry.from_reader(&mut self.source)
    }

    pub fn into_inner(self) -> R {
        match self.source {
            Source::Plain(reader) => reader.into_inner(),
            Source::Gzip(reader) => reader.into_inner(),
        }
    }
}

enum Sink<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> Sink<W> {
    #[inline]
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Sink::Plain(writer) => writer,
            Sink::Gzip(writer) => writer,
        }
    }
}

/// Writes documents one at a time to a byte stream.
///
/// Every document is encoded in memory first and committed with a single
/// `write_all`, so an encoding error never leaves half a document behind.
/// Call [`finish`](TagWriter::finish) to complete the stream; dropping a
/// compressed writer without it ends the gzip member but swallows errors.
///
/// ```
/// use tbnbt::{StreamOptions, Tag, TagReader, TagWriter};
///
/// let mut writer = TagWriter::new(Vec::new());
/// writer.write_tag(&Tag::Int(42), "answer").unwrap();
/// let compressed = writer.finish().unwrap();
/// assert_eq!(compressed[..2], [0x1F, 0x8B]);
///
/// let mut reader = TagReader::new(compressed.as_slice());
/// assert_eq!(reader.read_named_tag().unwrap(), ("answer".into(), Tag::Int(42)));
/// ```
pub struct TagWriter<W: Write> {
    sink: Sink<W>,
}

impl<W: Write> TagWriter<W> {
    /// A writer that gzip-compresses at the default level.
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, StreamOptions::default())
    }

    pub fn with_options(inner: W, options: StreamOptions) -> Self {
        debug!(compressed = options.compressed, level = options.level.level(), "opening tag writer");
        let sink = if options.compressed {
            Sink::Gzip(GzEncoder::new(inner, options.level))
        } else {
            Sink::Plain(inner)
        };
        Self { sink }
    }

    fn commit(&mut self, document: &[u8]) -> Result<()> {
        self.sink.writer().write_all(document).map_err(Error::IO)
    }

    pub fn write_tag(&mut self, tag: &Tag, name: &str) -> Result<()> {
        let document = to_vec(name, tag)?;
        self.commit(&document)
    }

    /// Writes `value` as one document, using a registry with only the
    /// built-in adapters.
    pub fn write_as<T: Reflect>(&mut self, value: &T) -> Result<()> {
        self.write_as_with(value, default_registry())
    }

    pub fn write_as_with<T: Reflect>(&mut self, value: &T, registry: &AdapterRegistry) -> Result<()> {
        let document = registry.to_vec(value)?;
        self.commit(&document)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.writer().flush().map_err(Error::IO)
    }

    /// Flushes the stream, ends the gzip member if compressed, and returns
    /// the inner writer.
    pub fn finish(self) -> Result<W> {
        let inner = match self.sink {
            Sink::Plain(mut writer) => {
                writer.flush()?;
                writer
            }
            Sink::Gzip(encoder) => encoder.finish()?,
        };
        debug!("finished tag writer");
        Ok(inner)
    }
}
