use bytes::Bytes;
use snafu::Snafu;

use crate::{
    encoder::{payload_encoded_len, resolve_value_field},
    AliasTable, DataType, Metric, MetricValue, PayloadEncoder,
};

/// Payload validation error.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(context(suffix(false)))]
pub enum ValidationError {
    /// Metric data type has no value field.
    #[snafu(display("metric #{} has data type {} which cannot carry a value", index, datatype))]
    UnsupportedDatatype {
        /// Position of the metric in the payload.
        index: usize,

        /// Data type of the metric.
        datatype: DataType,
    },

    /// Metric value cannot be represented by the metric data type.
    #[snafu(display("metric #{} has data type {} but holds a {} value", index, datatype, value_kind))]
    ValueMismatch {
        /// Position of the metric in the payload.
        index: usize,

        /// Data type of the metric.
        datatype: DataType,

        /// Kind of value held by the metric.
        value_kind: &'static str,
    },

    /// Metric value does not fit in the metric data type.
    #[snafu(display("metric #{} holds {} which is out of range for data type {}", index, value, datatype))]
    ValueOutOfRange {
        /// Position of the metric in the payload.
        index: usize,

        /// Data type of the metric.
        datatype: DataType,

        /// Value held by the metric.
        value: MetricValue,
    },
}

/// A Sparkplug B payload.
///
/// A payload carries a timestamp, a sequence number, and an ordered list of metrics. Metrics are encoded in the order
/// they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    timestamp: u64,
    seq: u64,
    metrics: Vec<Metric>,
}

impl Payload {
    /// Creates a new, empty `Payload` with the given timestamp and sequence number.
    ///
    /// The timestamp is in milliseconds since the Unix epoch. Sequence numbers are not checked or advanced here; see
    /// [`SequenceCounter`][crate::SequenceCounter].
    pub fn new(timestamp: u64, seq: u64) -> Self {
        Self {
            timestamp,
            seq,
            metrics: Vec::new(),
        }
    }

    /// Gets the payload timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Gets the sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Gets the metrics.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Adds a metric.
    pub fn add_metric(&mut self, metric: Metric) {
        self.metrics.push(metric);
    }

    /// Adds a `Float` metric.
    ///
    /// A NaN value is added as a null metric.
    pub fn add_metric_float(&mut self, name: &str, alias: u64, value: f32) {
        self.add_metric(Metric::float(name, alias, value));
    }

    /// Adds an `Int64` metric.
    pub fn add_metric_int(&mut self, name: &str, alias: u64, value: i64) {
        self.add_metric(Metric::int(name, alias, value));
    }

    /// Adds a `UInt64` metric.
    pub fn add_metric_uint(&mut self, name: &str, alias: u64, value: u64) {
        self.add_metric(Metric::uint(name, alias, value));
    }

    /// Adds a `Boolean` metric.
    pub fn add_metric_bool(&mut self, name: &str, alias: u64, value: bool) {
        self.add_metric(Metric::boolean(name, alias, value));
    }

    /// Adds a `String` metric.
    pub fn add_metric_string(&mut self, name: &str, alias: u64, value: &str) {
        self.add_metric(Metric::string(name, alias, value));
    }

    /// Fills in missing metric names from the given alias table.
    ///
    /// Used when building definition ("birth") messages, which must carry metric names so that consumers can learn the
    /// alias mapping. Metrics that already have a name, or whose alias is not in the table, are left as-is.
    pub fn with_names(mut self, aliases: &AliasTable) -> Self {
        for metric in &mut self.metrics {
            if metric.name().is_empty() {
                if let Some(name) = aliases.name_of(metric.alias()) {
                    metric.set_name(name);
                }
            }
        }
        self
    }

    /// Removes names from all metrics that have an alias.
    ///
    /// Used when building compact ("data") messages, where metrics are identified by alias alone.
    pub fn into_compact(mut self) -> Self {
        for metric in &mut self.metrics {
            if metric.alias() != 0 {
                metric.clear_name();
            }
        }
        self
    }

    /// Checks that every metric value can be encoded as declared.
    ///
    /// Encoding never fails: a metric whose value can't be represented by its data type is written without a value
    /// field. Callers that would rather reject such payloads can validate them before encoding.
    ///
    /// # Errors
    ///
    /// If a non-null metric has a data type without a value field, holds a value of the wrong kind, or holds an integer
    /// that doesn't fit in its declared width, an error is returned for the first such metric.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (index, metric) in self.metrics.iter().enumerate() {
            let datatype = metric.datatype();
            let Some(value) = metric.value() else {
                continue;
            };

            if !datatype.has_value_field() {
                return UnsupportedDatatype { index, datatype }.fail();
            }

            if resolve_value_field(datatype, value).is_none() {
                return ValueMismatch {
                    index,
                    datatype,
                    value_kind: value.kind(),
                }
                .fail();
            }

            if !fits_datatype(datatype, value) {
                return ValueOutOfRange {
                    index,
                    datatype,
                    value: value.clone(),
                }
                .fail();
            }
        }

        Ok(())
    }

    /// Computes the exact size of the encoded payload.
    pub fn encoded_len(&self) -> usize {
        payload_encoded_len(self)
    }

    /// Encodes the payload.
    ///
    /// Callers encoding many payloads can reuse a [`PayloadEncoder`] instead.
    pub fn encode(&self) -> Bytes {
        PayloadEncoder::new().encode(self)
    }
}

fn fits_datatype(datatype: DataType, value: &MetricValue) -> bool {
    match (datatype, value) {
        (DataType::Int8, MetricValue::Int(v)) => i8::try_from(*v).is_ok(),
        (DataType::Int16, MetricValue::Int(v)) => i16::try_from(*v).is_ok(),
        (DataType::Int32, MetricValue::Int(v)) => i32::try_from(*v).is_ok(),
        (DataType::UInt8, MetricValue::UInt(v)) => u8::try_from(*v).is_ok(),
        (DataType::UInt16, MetricValue::UInt(v)) => u16::try_from(*v).is_ok(),
        (DataType::UInt32, MetricValue::UInt(v)) => u32::try_from(*v).is_ok(),
        _ => true,
    }
}
