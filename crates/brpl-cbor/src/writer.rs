use crate::error::WriteError;
use crate::major::{MajorType, SimpleValue, SIZE_1, SIZE_2, SIZE_4, SIZE_8};

/// How deep `open_array`/`open_map`/`open_bytes` may nest before
/// [`WriteError::NestingTooDeep`]. A stack-sized bound, not a tunable —
/// pick it to cover the deepest structure the caller ever encodes.
pub const DEFAULT_MAX_NESTING: usize = 8;

struct NestingRecord {
    /// Offset into the buffer where this container's content begins.
    start: usize,
    /// Top-level objects written so far inside this container (for arrays);
    /// for maps, the running entry count is `objects / 2`.
    objects: u64,
}

/// Writes a CBOR document into a caller-owned, fixed-size buffer.
///
/// Mirrors the incremental-insertion trick length-prefixed CBOR requires:
/// content is appended first, and closing a container retroactively
/// inserts its length/count header before that content, shifting it
/// forward in the buffer. Once any write call fails, the writer is
/// poisoned: every later call becomes a no-op and [`CborWriter::finish`]
/// reports the first error encountered.
pub struct CborWriter<'a> {
    buffer: &'a mut [u8],
    len: usize,
    error: Option<WriteError>,
    stack: Vec<NestingRecord>,
    max_nesting: usize,
}

impl<'a> CborWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self::with_max_nesting(buffer, DEFAULT_MAX_NESTING)
    }

    pub fn with_max_nesting(buffer: &'a mut [u8], max_nesting: usize) -> Self {
        Self {
            buffer,
            len: 0,
            error: None,
            stack: Vec::new(),
            max_nesting,
        }
    }

    /// Finishes writing, returning the number of bytes written.
    ///
    /// Fails if any container is still open, or if an earlier write failed.
    pub fn finish(self) -> Result<usize, WriteError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(WriteError::UnclosedContainer(self.stack.len()));
        }
        Ok(self.len)
    }

    fn fail(&mut self, err: WriteError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn is_broken(&self) -> bool {
        self.error.is_some()
    }

    fn increment_parent(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.objects += 1;
        }
    }

    fn push_byte(&mut self, value: u8) {
        if self.is_broken() {
            return;
        }
        if self.len >= self.buffer.len() {
            self.fail(WriteError::BufferFull);
            return;
        }
        self.buffer[self.len] = value;
        self.len += 1;
        self.increment_parent();
    }

    fn push_bytes_raw(&mut self, data: &[u8]) {
        if data.is_empty() || self.is_broken() {
            return;
        }
        if self.buffer.len() - self.len < data.len() {
            self.fail(WriteError::BufferFull);
            return;
        }
        let end = self.len + data.len();
        self.buffer[self.len..end].copy_from_slice(data);
        self.len = end;
    }

    /// Inserts the fixed-point representation of `value` at `at` (which
    /// must equal `self.len` when called right after a first byte, or the
    /// recorded start of a container being closed), shifting any bytes
    /// already written past `at` to make room.
    fn insert_length(&mut self, at: usize, value: u64) {
        if self.is_broken() {
            return;
        }
        if value < SIZE_1 as u64 {
            self.buffer[at - 1] |= value as u8;
            return;
        }
        let (marker, width) = if value <= u8::MAX as u64 {
            (SIZE_1, 1)
        } else if value <= u16::MAX as u64 {
            (SIZE_2, 2)
        } else if value <= u32::MAX as u64 {
            (SIZE_4, 4)
        } else {
            (SIZE_8, 8)
        };
        self.buffer[at - 1] |= marker;
        if self.buffer.len() - self.len < width {
            self.fail(WriteError::BufferFull);
            return;
        }
        self.buffer.copy_within(at..self.len, at + width);
        self.len += width;
        let be = value.to_be_bytes();
        self.buffer[at..at + width].copy_from_slice(&be[8 - width..]);
    }

    /// Appends an already-encoded CBOR object verbatim (e.g. a value built
    /// by another writer and copied in), counting as one object of the
    /// currently open container.
    pub fn write_raw(&mut self, object: &[u8]) {
        if object.is_empty() {
            return;
        }
        self.push_bytes_raw(object);
        self.increment_parent();
    }

    pub fn write_unsigned(&mut self, value: u64) {
        self.push_byte(MajorType::UNSIGNED);
        let at = self.len;
        self.insert_length(at, value);
    }

    pub fn write_signed(&mut self, value: i64) {
        if value >= 0 {
            self.write_unsigned(value as u64);
        } else {
            self.push_byte(MajorType::SIGNED);
            let at = self.len;
            self.insert_length(at, (-1 - value) as u64);
        }
    }

    pub fn write_data(&mut self, data: &[u8]) {
        self.push_byte(MajorType::BYTE_STRING);
        let at = self.len;
        self.insert_length(at, data.len() as u64);
        self.push_bytes_raw(data);
    }

    pub fn write_text(&mut self, text: &str) {
        self.push_byte(MajorType::TEXT_STRING);
        let at = self.len;
        self.insert_length(at, text.len() as u64);
        self.push_bytes_raw(text.as_bytes());
    }

    pub fn write_null(&mut self) {
        self.push_byte(SimpleValue::NULL);
    }

    pub fn write_undefined(&mut self) {
        self.push_byte(SimpleValue::UNDEFINED);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.push_byte(if value {
            SimpleValue::TRUE
        } else {
            SimpleValue::FALSE
        });
    }

    fn open(&mut self, major: u8) {
        if self.is_broken() {
            return;
        }
        if self.stack.len() >= self.max_nesting {
            self.fail(WriteError::NestingTooDeep);
            return;
        }
        self.push_byte(major);
        self.stack.push(NestingRecord {
            start: self.len,
            objects: 0,
        });
    }

    fn close(&mut self, value: u64) {
        match self.stack.pop() {
            Some(record) => self.insert_length(record.start, value),
            None => self.fail(WriteError::NotOpen),
        }
    }

    /// Encloses subsequent writes in a byte string, to be closed with
    /// [`CborWriter::close_data`].
    pub fn open_data(&mut self) {
        self.open(MajorType::BYTE_STRING);
    }

    pub fn close_data(&mut self) {
        if self.is_broken() {
            return;
        }
        let Some(record) = self.stack.last() else {
            self.fail(WriteError::NotOpen);
            return;
        };
        let written = (self.len - record.start) as u64;
        self.close(written);
    }

    pub fn open_array(&mut self) {
        self.open(MajorType::ARRAY);
    }

    pub fn close_array(&mut self) {
        if self.is_broken() {
            return;
        }
        let Some(record) = self.stack.last() else {
            self.fail(WriteError::NotOpen);
            return;
        };
        let count = record.objects;
        self.close(count);
    }

    pub fn open_map(&mut self) {
        self.open(MajorType::MAP);
    }

    pub fn close_map(&mut self) {
        if self.is_broken() {
            return;
        }
        let Some(record) = self.stack.last() else {
            self.fail(WriteError::NotOpen);
            return;
        };
        if record.objects % 2 != 0 {
            self.fail(WriteError::OddMapEntries);
            return;
        }
        let entries = record.objects / 2;
        self.close(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CborReader;

    #[test]
    fn unsigned_small_is_one_byte() {
        let mut buf = [0u8; 8];
        let mut w = CborWriter::new(&mut buf);
        w.write_unsigned(5);
        let n = w.finish().unwrap();
        assert_eq!(n, 1);
        assert_eq!(buf[0], 5);
    }

    #[test]
    fn unsigned_large_picks_smallest_width() {
        let mut buf = [0u8; 16];
        let mut w = CborWriter::new(&mut buf);
        w.write_unsigned(300);
        let n = w.finish().unwrap();
        assert_eq!(n, 3); // marker + 2-byte big-endian payload
        assert_eq!(buf[0], 0x19);
        assert_eq!(&buf[1..3], &300u16.to_be_bytes());
    }

    #[test]
    fn negative_roundtrips_through_reader() {
        let mut buf = [0u8; 16];
        let mut w = CborWriter::new(&mut buf);
        w.write_signed(-1000);
        let n = w.finish().unwrap();
        let mut r = CborReader::new(&buf[..n]);
        assert_eq!(r.read_signed().unwrap(), -1000);
        assert!(r.is_empty());
    }

    #[test]
    fn array_roundtrips() {
        let mut buf = [0u8; 32];
        let mut w = CborWriter::new(&mut buf);
        w.open_array();
        w.write_unsigned(1);
        w.write_unsigned(2);
        w.write_unsigned(3);
        w.close_array();
        let n = w.finish().unwrap();

        let mut r = CborReader::new(&buf[..n]);
        let len = r.read_array_len().unwrap();
        assert_eq!(len, 3);
        assert_eq!(r.read_unsigned().unwrap(), 1);
        assert_eq!(r.read_unsigned().unwrap(), 2);
        assert_eq!(r.read_unsigned().unwrap(), 3);
    }

    #[test]
    fn nested_map_with_text_and_bytes_roundtrips() {
        let mut buf = [0u8; 64];
        let mut w = CborWriter::new(&mut buf);
        w.open_map();
        w.write_text("id");
        w.write_data(&[0xAA, 0xBB]);
        w.write_text("ok");
        w.write_bool(true);
        w.close_map();
        let n = w.finish().unwrap();

        let mut r = CborReader::new(&buf[..n]);
        assert_eq!(r.read_map_len().unwrap(), 2);
        assert_eq!(r.read_text().unwrap(), "id");
        assert_eq!(r.read_bytes().unwrap(), &[0xAA, 0xBB]);
        assert_eq!(r.read_text().unwrap(), "ok");
        assert_eq!(r.read_simple().unwrap(), crate::major::SimpleValue::True);
    }

    #[test]
    fn finish_fails_on_unclosed_container() {
        let mut buf = [0u8; 16];
        let mut w = CborWriter::new(&mut buf);
        w.open_array();
        w.write_unsigned(1);
        assert_eq!(w.finish().unwrap_err(), WriteError::UnclosedContainer(1));
    }

    #[test]
    fn finish_fails_on_odd_map_entries() {
        let mut buf = [0u8; 16];
        let mut w = CborWriter::new(&mut buf);
        w.open_map();
        w.write_unsigned(1);
        w.close_map();
        assert_eq!(w.finish().unwrap_err(), WriteError::OddMapEntries);
    }

    #[test]
    fn overflow_breaks_the_writer() {
        let mut buf = [0u8; 1];
        let mut w = CborWriter::new(&mut buf);
        w.write_unsigned(300); // needs 3 bytes, buffer holds 1
        assert_eq!(w.finish().unwrap_err(), WriteError::BufferFull);
    }

    #[test]
    fn nesting_beyond_max_breaks_the_writer() {
        let mut buf = [0u8; 64];
        let mut w = CborWriter::with_max_nesting(&mut buf, 1);
        w.open_array();
        w.open_array();
        assert_eq!(w.finish().unwrap_err(), WriteError::NestingTooDeep);
    }

    #[test]
    fn open_data_records_nested_byte_length() {
        let mut buf = [0u8; 32];
        let mut w = CborWriter::new(&mut buf);
        w.open_data();
        w.write_unsigned(1);
        w.write_unsigned(2);
        w.close_data();
        let n = w.finish().unwrap();

        let mut r = CborReader::new(&buf[..n]);
        let inner = r.read_bytes().unwrap();
        let mut inner_reader = CborReader::new(inner);
        assert_eq!(inner_reader.read_unsigned().unwrap(), 1);
        assert_eq!(inner_reader.read_unsigned().unwrap(), 2);
        assert!(inner_reader.is_empty());
    }
}
