//! Wire types, field tags, and encoded-size helpers.

/// Largest field number that can be represented in a field tag.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Wire type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WireType {
    /// Variable-width integer.
    ///
    /// Encodes integers using a variable number of bytes, depending on the magnitude of the value, consuming between
    /// one and ten bytes on the wire.
    Varint,

    /// Fixed 64-bit integer or double-precision floating-point number.
    ///
    /// Consumes eight bytes on the wire.
    Fixed64,

    /// Length-delimited field.
    ///
    /// Used for strings, bytes and embedded messages.
    LengthDelimited,

    /// Fixed 32-bit integer or single-precision floating-point number.
    ///
    /// Consumes four bytes on the wire.
    Fixed32,
}

impl WireType {
    /// Gets the integer representation of the wire type.
    pub const fn as_u32(self) -> u32 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::Fixed32 => 5,
        }
    }

    /// Gets the wire type for the given integer representation, if it is one this crate writes.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }
}

/// Computes the tag for the given field number and wire type.
///
/// Field numbers above [`MAX_FIELD_NUMBER`] cannot be represented and will produce a corrupt tag.
pub const fn tag(field_number: u32, wire_type: WireType) -> u32 {
    debug_assert!(field_number <= MAX_FIELD_NUMBER);
    (field_number << 3) | wire_type.as_u32()
}

/// Computes the binary size of the varint encoded u64.
pub const fn sizeof_varint(v: u64) -> usize {
    match v {
        0x0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1FFFFF => 3,
        0x200000..=0xFFFFFFF => 4,
        0x10000000..=0x7FFFFFFFF => 5,
        0x0800000000..=0x3FFFFFFFFFF => 6,
        0x040000000000..=0x1FFFFFFFFFFFF => 7,
        0x02000000000000..=0xFFFFFFFFFFFFFF => 8,
        0x0100000000000000..=0x7FFFFFFFFFFFFFFF => 9,
        _ => 10,
    }
}

/// Computes the binary size of a length-delimited value, excluding its tag.
///
/// The total size is the varint encoded length size plus the length itself.
pub const fn sizeof_len(len: usize) -> usize {
    sizeof_varint(len as u64) + len
}

/// Computes the binary size of a field tag.
pub const fn sizeof_tag(field_number: u32) -> usize {
    // The wire type only occupies the low three bits, so it never changes the encoded size.
    sizeof_varint(tag(field_number, WireType::Varint) as u64)
}
