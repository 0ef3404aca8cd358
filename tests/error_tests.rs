//! Tests for the Error type

use std::error::Error as _;
use std::io;

use tbnbt::Error;

#[test]
fn test_error_display_end_of_file() {
    assert_eq!(Error::EndOfFile.to_string(), "unexpected end of input");
}

#[test]
fn test_error_display_trailing_data() {
    assert_eq!(
        Error::TrailingData(42).to_string(),
        "trailing data after end of input: 42 bytes remaining"
    );
}

#[test]
fn test_error_display_tag_ids_in_hex() {
    assert_eq!(
        Error::InvalidTagType(0xFF).to_string(),
        "invalid tag type: 0xff"
    );
    assert_eq!(
        Error::TagMismatch(3, 10).to_string(),
        "tag mismatch: expected 0x03, got 0x0a"
    );
}

#[test]
fn test_error_display_adapter_errors() {
    assert_eq!(
        Error::Unsupported("std::fs::File").to_string(),
        "no adapter can handle type `std::fs::File`"
    );
    assert_eq!(
        Error::LengthMismatch(3, 4).to_string(),
        "array length mismatch: expected 3, got 4"
    );
    assert_eq!(
        Error::MissingValue("core::option::Option<i32>").to_string(),
        "no value present for `core::option::Option<i32>`"
    );
}

#[test]
fn test_error_display_index_out_of_bounds() {
    assert_eq!(
        Error::IndexOutOfBounds(4, 2).to_string(),
        "index 4 out of bounds for list of length 2"
    );
}

#[test]
fn test_io_error_conversion() {
    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
    assert!(matches!(Error::from(eof), Error::EndOfFile));

    let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    let error = Error::from(denied);
    assert!(error.to_string().contains("denied"));
    assert!(error.source().is_some());
    assert!(Error::EndTag.source().is_none());
}

#[test]
fn test_custom_message() {
    let error = Error::custom(format_args!("bad value {}", 7));
    assert!(matches!(&error, Error::Message(message) if message == "bad value 7"));
    assert_eq!(error.to_string(), "bad value 7");
}

#[test]
fn test_error_is_send_sync() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<Error>();
}
