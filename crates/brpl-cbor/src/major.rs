/// The seven CBOR major types, as the top 3 bits of the initial byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorType {
    Unsigned,
    Signed,
    ByteString,
    TextString,
    Array,
    Map,
    Simple,
}

impl MajorType {
    pub(crate) const UNSIGNED: u8 = 0x00;
    pub(crate) const SIGNED: u8 = 0x20;
    pub(crate) const BYTE_STRING: u8 = 0x40;
    pub(crate) const TEXT_STRING: u8 = 0x60;
    pub(crate) const ARRAY: u8 = 0x80;
    pub(crate) const MAP: u8 = 0xA0;
    pub(crate) const SIMPLE: u8 = 0xE0;

    pub(crate) fn from_leading_byte(byte: u8) -> Self {
        match byte & 0xE0 {
            Self::UNSIGNED => MajorType::Unsigned,
            Self::SIGNED => MajorType::Signed,
            Self::BYTE_STRING => MajorType::ByteString,
            Self::TEXT_STRING => MajorType::TextString,
            Self::ARRAY => MajorType::Array,
            Self::MAP => MajorType::Map,
            _ => MajorType::Simple,
        }
    }
}

/// Simple values (CBOR major type 7, no embedded argument).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleValue {
    False,
    True,
    Null,
    Undefined,
    Other(u8),
}

impl SimpleValue {
    pub(crate) const FALSE: u8 = 0xF4;
    pub(crate) const TRUE: u8 = 0xF5;
    pub(crate) const NULL: u8 = 0xF6;
    pub(crate) const UNDEFINED: u8 = 0xF7;

    pub(crate) fn from_byte(byte: u8) -> Self {
        match byte {
            Self::FALSE => SimpleValue::False,
            Self::TRUE => SimpleValue::True,
            Self::NULL => SimpleValue::Null,
            Self::UNDEFINED => SimpleValue::Undefined,
            other => SimpleValue::Other(other),
        }
    }
}

/// Additional-information markers used for multi-byte length/value
/// encodings (values 0..=23 are encoded inline in the initial byte).
pub(crate) const SIZE_1: u8 = 0x18;
pub(crate) const SIZE_2: u8 = 0x19;
pub(crate) const SIZE_4: u8 = 0x1A;
pub(crate) const SIZE_8: u8 = 0x1B;
