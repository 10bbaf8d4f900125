use bytes::Bytes;
use sparkplug_wire::{sizeof_len, sizeof_tag, sizeof_varint, ByteStreamBuilder};
use tracing::{debug, trace};

use crate::{field_numbers::*, DataType, Metric, MetricValue, Payload};

/// The value field a metric is encoded with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ValueField<'a> {
    Int(u32),
    Long(u64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(&'a str),
}

impl ValueField<'_> {
    fn encode(self, builder: &mut ByteStreamBuilder) {
        match self {
            Self::Int(value) => builder.encode_uint32(METRIC_INT_VALUE, value),
            Self::Long(value) => builder.encode_uint64(METRIC_LONG_VALUE, value),
            Self::Float(value) => builder.encode_float(METRIC_FLOAT_VALUE, value),
            Self::Double(value) => builder.encode_double(METRIC_DOUBLE_VALUE, value),
            Self::Boolean(value) => builder.encode_bool(METRIC_BOOLEAN_VALUE, value),
            Self::String(value) => builder.encode_string(METRIC_STRING_VALUE, value),
        }
    }

    fn encoded_len(self) -> usize {
        match self {
            Self::Int(value) => sizeof_tag(METRIC_INT_VALUE) + sizeof_varint(u64::from(value)),
            Self::Long(value) => sizeof_tag(METRIC_LONG_VALUE) + sizeof_varint(value),
            Self::Float(_) => sizeof_tag(METRIC_FLOAT_VALUE) + 4,
            Self::Double(_) => sizeof_tag(METRIC_DOUBLE_VALUE) + 8,
            Self::Boolean(_) => sizeof_tag(METRIC_BOOLEAN_VALUE) + 1,
            Self::String(value) => sizeof_tag(METRIC_STRING_VALUE) + sizeof_len(value.len()),
        }
    }
}

/// Resolves the value field for the given data type and value.
///
/// Narrow integers are truncated to 32 bits, and signed integers are carried as their two's complement bit pattern.
/// Returns `None` if the data type has no value field, or if the value cannot be represented by the data type.
pub(crate) fn resolve_value_field(datatype: DataType, value: &MetricValue) -> Option<ValueField<'_>> {
    let field = match (datatype, value) {
        (DataType::Int8 | DataType::Int16 | DataType::Int32, MetricValue::Int(v)) => ValueField::Int(*v as u32),
        (DataType::UInt8 | DataType::UInt16 | DataType::UInt32, MetricValue::UInt(v)) => ValueField::Int(*v as u32),
        (DataType::Int64, MetricValue::Int(v)) => ValueField::Long(*v as u64),
        (DataType::UInt64 | DataType::DateTime, MetricValue::UInt(v)) => ValueField::Long(*v),
        (DataType::Float, MetricValue::Float(v)) => ValueField::Float(*v),
        (DataType::Double, MetricValue::Double(v)) => ValueField::Double(*v),
        (DataType::Boolean, MetricValue::Boolean(v)) => ValueField::Boolean(*v),
        (DataType::String | DataType::Text, MetricValue::Text(v)) => ValueField::String(v),
        _ => return None,
    };

    Some(field)
}

/// Encodes a single metric as a `Metric` message, appending it to `builder`.
///
/// Empty names, zero aliases, and zero timestamps are omitted. The data type is always written. Null metrics write the
/// `is_null` flag instead of a value field.
///
/// If the metric's value cannot be represented by its data type, the value field is omitted and the metric is otherwise
/// encoded as normal.
pub fn encode_metric(metric: &Metric, builder: &mut ByteStreamBuilder) {
    if !metric.name().is_empty() {
        builder.encode_string(METRIC_NAME, metric.name());
    }

    if metric.alias() != 0 {
        builder.encode_uint64(METRIC_ALIAS, metric.alias());
    }

    if metric.timestamp() != 0 {
        builder.encode_uint64(METRIC_TIMESTAMP, metric.timestamp());
    }

    builder.encode_uint32(METRIC_DATATYPE, metric.datatype().as_u32());

    match metric.value() {
        None => builder.encode_bool(METRIC_IS_NULL, true),
        Some(value) => match resolve_value_field(metric.datatype(), value) {
            Some(field) => field.encode(builder),
            None => debug!(
                %metric,
                value_kind = value.kind(),
                "Value cannot be encoded for metric data type. Omitting value field."
            ),
        },
    }
}

/// Computes the exact encoded size of a metric as produced by [`encode_metric`].
pub fn metric_encoded_len(metric: &Metric) -> usize {
    let mut len = 0;

    if !metric.name().is_empty() {
        len += sizeof_tag(METRIC_NAME) + sizeof_len(metric.name().len());
    }

    if metric.alias() != 0 {
        len += sizeof_tag(METRIC_ALIAS) + sizeof_varint(metric.alias());
    }

    if metric.timestamp() != 0 {
        len += sizeof_tag(METRIC_TIMESTAMP) + sizeof_varint(metric.timestamp());
    }

    len += sizeof_tag(METRIC_DATATYPE) + sizeof_varint(u64::from(metric.datatype().as_u32()));

    match metric.value() {
        None => len += sizeof_tag(METRIC_IS_NULL) + 1,
        Some(value) => {
            if let Some(field) = resolve_value_field(metric.datatype(), value) {
                len += field.encoded_len();
            }
        }
    }

    len
}

/// Computes the exact encoded size of a payload as produced by [`PayloadEncoder::encode`].
pub fn payload_encoded_len(payload: &Payload) -> usize {
    let metrics_len: usize = payload
        .metrics()
        .iter()
        .map(|metric| sizeof_tag(PAYLOAD_METRICS) + sizeof_len(metric_encoded_len(metric)))
        .sum();

    sizeof_tag(PAYLOAD_TIMESTAMP)
        + sizeof_varint(payload.timestamp())
        + metrics_len
        + sizeof_tag(PAYLOAD_SEQ)
        + sizeof_varint(payload.seq())
}

/// A reusable payload encoder.
///
/// `PayloadEncoder` owns its output and scratch buffers, which are cleared at the start of every call to
/// [`encode`][Self::encode]. The encoded bytes are handed to the caller by value, so nothing carries over from one
/// payload to the next.
#[derive(Debug, Default)]
pub struct PayloadEncoder {
    output: ByteStreamBuilder,
    scratch: ByteStreamBuilder,
}

impl PayloadEncoder {
    /// Creates a new `PayloadEncoder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes the given payload as a `Payload` message.
    ///
    /// The payload timestamp and sequence number are always written, even when zero. Metrics are written in insertion
    /// order, each as a nested `Metric` message.
    pub fn encode(&mut self, payload: &Payload) -> Bytes {
        self.output.clear();
        self.output.reserve(payload_encoded_len(payload));

        self.output.encode_uint64(PAYLOAD_TIMESTAMP, payload.timestamp());

        for metric in payload.metrics() {
            self.scratch.clear();
            encode_metric(metric, &mut self.scratch);
            self.output.encode_nested(PAYLOAD_METRICS, self.scratch.as_slice());

            trace!(%metric, encoded_len = self.scratch.len(), "Encoded metric.");
        }

        self.output.encode_uint64(PAYLOAD_SEQ, payload.seq());

        trace!(
            timestamp = payload.timestamp(),
            seq = payload.seq(),
            metrics_len = payload.metrics().len(),
            encoded_len = self.output.len(),
            "Encoded payload."
        );

        Bytes::from(self.output.take())
    }
}
