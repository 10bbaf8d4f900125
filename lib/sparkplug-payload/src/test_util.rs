//! Reference decoding of encoded payloads, backed by `protobuf`'s `CodedInputStream`.

use protobuf::CodedInputStream;
use sparkplug_wire::WireType;

use crate::field_numbers::*;

/// A decoded `Metric` message.
///
/// Every field is optional, so that tests can distinguish "omitted" from "emitted with a zero value".
#[derive(Debug, Default, PartialEq)]
pub struct DecodedMetric {
    pub name: Option<String>,
    pub alias: Option<u64>,
    pub timestamp: Option<u64>,
    pub datatype: Option<u32>,
    pub is_null: Option<bool>,
    pub int_value: Option<u32>,
    pub long_value: Option<u64>,
    pub float_value: Option<u32>,
    pub double_value: Option<u64>,
    pub boolean_value: Option<bool>,
    pub string_value: Option<String>,

    /// Field numbers in the order they appeared on the wire.
    pub fields: Vec<u32>,
}

impl DecodedMetric {
    /// Returns the field numbers of all value fields that were present.
    pub fn value_fields(&self) -> Vec<u32> {
        self.fields
            .iter()
            .copied()
            .filter(|field| (METRIC_INT_VALUE..=METRIC_STRING_VALUE).contains(field))
            .collect()
    }
}

/// A decoded `Payload` message.
#[derive(Debug, Default, PartialEq)]
pub struct DecodedPayload {
    pub timestamp: Option<u64>,
    pub seq: Option<u64>,
    pub metrics: Vec<DecodedMetric>,

    /// Field numbers in the order they appeared on the wire.
    pub fields: Vec<u32>,
}

fn split_tag(tag: u32) -> (u32, WireType) {
    let wire_type = WireType::from_u32(tag & 0x7).expect("unexpected wire type");
    (tag >> 3, wire_type)
}

fn expect_wire_type(field_number: u32, actual: WireType, expected: WireType) {
    assert_eq!(actual, expected, "field {} has the wrong wire type", field_number);
}

/// Decodes a `Metric` message, panicking on malformed input or unknown fields.
pub fn decode_metric(buf: &[u8]) -> DecodedMetric {
    let mut is = CodedInputStream::from_bytes(buf);
    let mut metric = DecodedMetric::default();

    while let Some(tag) = is.read_raw_tag_or_eof().unwrap() {
        let (field_number, wire_type) = split_tag(tag);
        metric.fields.push(field_number);

        match field_number {
            METRIC_NAME => {
                expect_wire_type(field_number, wire_type, WireType::LengthDelimited);
                metric.name = Some(is.read_string().unwrap());
            }
            METRIC_ALIAS => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.alias = Some(is.read_uint64().unwrap());
            }
            METRIC_TIMESTAMP => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.timestamp = Some(is.read_uint64().unwrap());
            }
            METRIC_DATATYPE => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.datatype = Some(is.read_uint32().unwrap());
            }
            METRIC_IS_NULL => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.is_null = Some(is.read_bool().unwrap());
            }
            METRIC_INT_VALUE => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.int_value = Some(is.read_uint32().unwrap());
            }
            METRIC_LONG_VALUE => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.long_value = Some(is.read_uint64().unwrap());
            }
            METRIC_FLOAT_VALUE => {
                expect_wire_type(field_number, wire_type, WireType::Fixed32);
                metric.float_value = Some(is.read_fixed32().unwrap());
            }
            METRIC_DOUBLE_VALUE => {
                expect_wire_type(field_number, wire_type, WireType::Fixed64);
                metric.double_value = Some(is.read_fixed64().unwrap());
            }
            METRIC_BOOLEAN_VALUE => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                metric.boolean_value = Some(is.read_bool().unwrap());
            }
            METRIC_STRING_VALUE => {
                expect_wire_type(field_number, wire_type, WireType::LengthDelimited);
                metric.string_value = Some(is.read_string().unwrap());
            }
            other => panic!("unexpected metric field {}", other),
        }
    }

    metric
}

/// Decodes a `Payload` message, panicking on malformed input or unknown fields.
pub fn decode_payload(buf: &[u8]) -> DecodedPayload {
    let mut is = CodedInputStream::from_bytes(buf);
    let mut payload = DecodedPayload::default();

    while let Some(tag) = is.read_raw_tag_or_eof().unwrap() {
        let (field_number, wire_type) = split_tag(tag);
        payload.fields.push(field_number);

        match field_number {
            PAYLOAD_TIMESTAMP => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                payload.timestamp = Some(is.read_uint64().unwrap());
            }
            PAYLOAD_METRICS => {
                expect_wire_type(field_number, wire_type, WireType::LengthDelimited);
                let nested = is.read_bytes().unwrap();
                payload.metrics.push(decode_metric(&nested));
            }
            PAYLOAD_SEQ => {
                expect_wire_type(field_number, wire_type, WireType::Varint);
                payload.seq = Some(is.read_uint64().unwrap());
            }
            other => panic!("unexpected payload field {}", other),
        }
    }

    payload
}
