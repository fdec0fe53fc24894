use thiserror::Error;

/// Failure writing a CBOR document into a fixed-size buffer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// The destination buffer ran out of room.
    #[error("cbor writer: destination buffer is full")]
    BufferFull,
    /// `finish()` was called with an array, map, or byte-string container
    /// still open.
    #[error("cbor writer: {0} container(s) left open at finish")]
    UnclosedContainer(usize),
    /// A map was closed with an odd number of entries written inside it.
    #[error("cbor writer: map has an odd number of entries")]
    OddMapEntries,
    /// `open_array`/`open_map`/`open_bytes` nested deeper than the writer's
    /// configured maximum.
    #[error("cbor writer: nesting exceeds the configured maximum")]
    NestingTooDeep,
    /// A close call with no matching open call.
    #[error("cbor writer: close with nothing open")]
    NotOpen,
}

/// Failure reading a value out of a CBOR document.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// Fewer bytes remained than the value being read required.
    #[error("cbor reader: unexpected end of input")]
    Eof,
    /// The next major type did not match what the caller asked to read.
    #[error("cbor reader: major type does not match the requested read")]
    TypeMismatch,
    /// The additional-information nibble encoded an undefined length class.
    #[error("cbor reader: malformed length encoding")]
    Malformed,
    /// The encoded value does not fit in the target Rust integer type.
    #[error("cbor reader: value overflows the target type")]
    Overflow,
}
