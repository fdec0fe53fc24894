use crate::error::ReadError;
use crate::major::{MajorType, SimpleValue};

/// Reads a CBOR document out of a borrowed byte slice.
///
/// A thin cursor: every `read_*` call either consumes exactly the bytes it
/// describes and advances, or leaves the cursor untouched and returns an
/// error. Nothing is buffered or copied — byte-string and text-string
/// reads borrow directly from the input.
pub struct CborReader<'a> {
    data: &'a [u8],
}

impl<'a> CborReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// The next major type, or `None` if no bytes remain.
    pub fn peek_next(&self) -> Option<MajorType> {
        self.data.first().map(|&b| MajorType::from_leading_byte(b))
    }

    /// `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fails unless the cursor is exactly at the end of input.
    pub fn expect_end(&self) -> Result<(), ReadError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ReadError::Malformed)
        }
    }

    fn require_major(&self, expected: MajorType) -> Result<(), ReadError> {
        match self.peek_next() {
            Some(major) if major == expected => Ok(()),
            Some(_) => Err(ReadError::TypeMismatch),
            None => Err(ReadError::Eof),
        }
    }

    /// Reads the additional-information argument following the initial
    /// byte (assumed already matched against the expected major type),
    /// consuming the initial byte too.
    fn read_argument(&mut self) -> Result<u64, ReadError> {
        let (&first, rest) = self.data.split_first().ok_or(ReadError::Eof)?;
        let additional = first & 0x1F;
        self.data = rest;
        if additional < 24 {
            return Ok(additional as u64);
        }
        let width = match additional {
            24 => 1,
            25 => 2,
            26 => 4,
            27 => 8,
            _ => return Err(ReadError::Malformed),
        };
        if self.data.len() < width {
            return Err(ReadError::Eof);
        }
        let (bytes, rest) = self.data.split_at(width);
        let mut value = 0u64;
        for &b in bytes {
            value = (value << 8) | b as u64;
        }
        self.data = rest;
        Ok(value)
    }

    pub fn read_unsigned(&mut self) -> Result<u64, ReadError> {
        self.require_major(MajorType::Unsigned)?;
        self.read_argument()
    }

    pub fn read_signed(&mut self) -> Result<i64, ReadError> {
        match self.peek_next() {
            Some(MajorType::Unsigned) => {
                let value = self.read_argument()?;
                i64::try_from(value).map_err(|_| ReadError::Overflow)
            }
            Some(MajorType::Signed) => {
                let value = self.read_argument()?;
                if value > i64::MAX as u64 {
                    return Err(ReadError::Overflow);
                }
                Ok(-1 - value as i64)
            }
            Some(_) => Err(ReadError::TypeMismatch),
            None => Err(ReadError::Eof),
        }
    }

    fn read_string_body(&mut self) -> Result<&'a [u8], ReadError> {
        let len = self.read_argument()? as usize;
        if self.data.len() < len {
            return Err(ReadError::Eof);
        }
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8], ReadError> {
        self.require_major(MajorType::ByteString)?;
        self.read_string_body()
    }

    pub fn read_text(&mut self) -> Result<&'a str, ReadError> {
        self.require_major(MajorType::TextString)?;
        let bytes = self.read_string_body()?;
        core::str::from_utf8(bytes).map_err(|_| ReadError::Malformed)
    }

    pub fn read_simple(&mut self) -> Result<SimpleValue, ReadError> {
        let (&first, rest) = self.data.split_first().ok_or(ReadError::Eof)?;
        self.data = rest;
        Ok(SimpleValue::from_byte(first))
    }

    pub fn read_array_len(&mut self) -> Result<usize, ReadError> {
        self.require_major(MajorType::Array)?;
        let value = self.read_argument()?;
        usize::try_from(value).map_err(|_| ReadError::Overflow)
    }

    pub fn read_map_len(&mut self) -> Result<usize, ReadError> {
        self.require_major(MajorType::Map)?;
        let value = self.read_argument()?;
        usize::try_from(value).map_err(|_| ReadError::Overflow)
    }
}
