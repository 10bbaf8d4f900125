//! Sparkplug B payloads.
//!
//! This crate models Sparkplug B payloads and their metrics, and encodes them into the Protocol Buffers wire format
//! expected by Sparkplug B consumers. Only the scalar metric data types are supported, and only encoding is provided.
//!
//! Encoding is infallible: every payload produces bytes that a standard decoder accepts. Callers that want to reject
//! metrics whose value does not match their declared data type can do so with [`Payload::validate`] before encoding.

#![deny(missing_docs)]

mod alias;
pub use self::alias::{well_known, well_known_aliases, AliasTable, AliasTableError, MetricAlias};

mod config;
pub use self::config::EncoderConfiguration;

mod datatype;
pub use self::datatype::DataType;

mod encoder;
pub use self::encoder::{encode_metric, metric_encoded_len, PayloadEncoder};

pub mod field_numbers;

mod metric;
pub use self::metric::{Metric, MetricValue};

mod payload;
pub use self::payload::{Payload, ValidationError};

mod sequence;
pub use self::sequence::SequenceCounter;

mod topic;
pub use self::topic::{MessageType, Topic, TopicError, NAMESPACE};

#[cfg(test)]
mod test_util;
