//! Field numbers from `sparkplug_b.proto`.

/// `Payload.timestamp`
pub const PAYLOAD_TIMESTAMP: u32 = 1;
/// `Payload.metrics`
pub const PAYLOAD_METRICS: u32 = 2;
/// `Payload.seq`
pub const PAYLOAD_SEQ: u32 = 3;

/// `Metric.name`
pub const METRIC_NAME: u32 = 1;
/// `Metric.alias`
pub const METRIC_ALIAS: u32 = 2;
/// `Metric.timestamp`
pub const METRIC_TIMESTAMP: u32 = 3;
/// `Metric.datatype`
pub const METRIC_DATATYPE: u32 = 4;
/// `Metric.is_null`
pub const METRIC_IS_NULL: u32 = 6;
/// `Metric.int_value`
pub const METRIC_INT_VALUE: u32 = 7;
/// `Metric.long_value`
pub const METRIC_LONG_VALUE: u32 = 8;
/// `Metric.float_value`
pub const METRIC_FLOAT_VALUE: u32 = 9;
/// `Metric.double_value`
pub const METRIC_DOUBLE_VALUE: u32 = 10;
/// `Metric.boolean_value`
pub const METRIC_BOOLEAN_VALUE: u32 = 11;
/// `Metric.string_value`
pub const METRIC_STRING_VALUE: u32 = 12;
