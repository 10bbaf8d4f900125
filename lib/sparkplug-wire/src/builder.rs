use byteorder::{ByteOrder as _, LittleEndian as LE};

use crate::helpers::{tag, WireType};

/// An append-only builder for Protocol Buffers-encoded bytes.
///
/// Each `encode_*` method writes a complete field (tag followed by the value) to the end of an internal, owned buffer.
/// The builder performs no validation: callers are responsible for using field numbers and value types consistently
/// with the schema they are targeting.
///
/// Signed integers are never zig-zag encoded here. Callers that need to write a signed value reinterpret its bits as an
/// unsigned integer first, which matches how `int32`/`int64` fields are represented on the wire.
///
/// A builder can be reused for multiple independent messages by calling [`clear`][Self::clear] in between, or by
/// taking the encoded bytes with [`take`][Self::take].
#[derive(Clone, Debug, Default)]
pub struct ByteStreamBuilder {
    buf: Vec<u8>,
}

impl ByteStreamBuilder {
    /// Creates a new, empty `ByteStreamBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty `ByteStreamBuilder` with at least the given capacity preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Writes a base-128 varint.
    ///
    /// Each byte carries seven bits of the value, least significant group first, with the high bit set on every byte
    /// except the last.
    pub fn encode_varint(&mut self, mut value: u64) {
        while value > 0x7F {
            self.buf.push(((value as u8) & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    /// Writes a field tag, which represents both the field number and the wire type.
    pub fn encode_tag(&mut self, field_number: u32, wire_type: WireType) {
        self.encode_varint(u64::from(tag(field_number, wire_type)));
    }

    /// Writes a `uint32` field.
    pub fn encode_uint32(&mut self, field_number: u32, value: u32) {
        self.encode_tag(field_number, WireType::Varint);
        self.encode_varint(u64::from(value));
    }

    /// Writes a `uint64` field.
    pub fn encode_uint64(&mut self, field_number: u32, value: u64) {
        self.encode_tag(field_number, WireType::Varint);
        self.encode_varint(value);
    }

    /// Writes a `bool` field, as a varint of `1` for `true` and `0` for `false`.
    pub fn encode_bool(&mut self, field_number: u32, value: bool) {
        self.encode_tag(field_number, WireType::Varint);
        self.encode_varint(u64::from(value));
    }

    /// Writes a `float` field as the little-endian IEEE-754 bit pattern of `value`.
    pub fn encode_float(&mut self, field_number: u32, value: f32) {
        self.encode_tag(field_number, WireType::Fixed32);

        let mut raw = [0; 4];
        LE::write_f32(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    /// Writes a `double` field as the little-endian IEEE-754 bit pattern of `value`.
    pub fn encode_double(&mut self, field_number: u32, value: f64) {
        self.encode_tag(field_number, WireType::Fixed64);

        let mut raw = [0; 8];
        LE::write_f64(&mut raw, value);
        self.buf.extend_from_slice(&raw);
    }

    /// Writes a `string` field: the length as a varint, then the UTF-8 bytes verbatim.
    pub fn encode_string(&mut self, field_number: u32, value: &str) {
        self.encode_bytes(field_number, value.as_bytes());
    }

    /// Writes a `bytes` field: the length as a varint, then the bytes verbatim.
    pub fn encode_bytes(&mut self, field_number: u32, value: &[u8]) {
        self.encode_tag(field_number, WireType::LengthDelimited);
        self.encode_varint(value.len() as u64);
        self.buf.extend_from_slice(value);
    }

    /// Writes an embedded message field from its already-encoded bytes.
    ///
    /// The framing is identical to a `bytes` field.
    pub fn encode_nested(&mut self, field_number: u32, message: &[u8]) {
        self.encode_bytes(field_number, message);
    }

    /// Clears the builder, removing all encoded bytes.
    ///
    /// This has no effect on the allocated capacity of the builder.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Reserves capacity for at least `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    /// Returns the number of bytes encoded so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been encoded yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Extracts a slice containing the encoded bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..]
    }

    /// Takes the encoded bytes out of the builder, leaving it empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Consumes the builder, returning the encoded bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
