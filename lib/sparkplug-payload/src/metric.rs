use std::fmt;

use crate::DataType;

/// A metric value.
///
/// Only the variant matching the metric's declared [`DataType`] is encoded. Signed integers of every width are held as
/// `Int`, and unsigned integers (including date-time values) as `UInt`.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricValue {
    /// A signed integer.
    Int(i64),

    /// An unsigned integer.
    UInt(u64),

    /// A single-precision floating-point number.
    Float(f32),

    /// A double-precision floating-point number.
    Double(f64),

    /// A boolean.
    Boolean(bool),

    /// A string.
    Text(String),
}

impl MetricValue {
    /// Returns a short, human-readable name for the kind of value.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "signed integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::UInt(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Double(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::Text(value) => write!(f, "{:?}", value),
        }
    }
}

/// A metric.
///
/// Metrics are identified by a name, an alias, or both. Definition ("birth") messages carry the name so that consumers
/// can learn the alias mapping, while compact ("data") messages typically carry only the alias. An empty name and an
/// alias of zero are both treated as absent.
///
/// ## Null metrics
///
/// A metric without a value is null: it is still reported, along with its data type, but consumers must interpret it
/// as "no value available" rather than as zero. Null metrics never emit a value field, regardless of their data type.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    name: String,
    alias: u64,
    timestamp: u64,
    datatype: DataType,
    value: Option<MetricValue>,
}

impl Metric {
    /// Creates a new `Metric` with the given data type and value.
    ///
    /// The value is not checked against the data type. A value that cannot be represented by the data type is not
    /// encoded; use [`Payload::validate`][crate::Payload::validate] to catch these cases ahead of time.
    pub fn new<N>(name: N, alias: u64, datatype: DataType, value: Option<MetricValue>) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            alias,
            timestamp: 0,
            datatype,
            value,
        }
    }

    /// Creates a new null `Metric` with the given data type.
    pub fn null<N>(name: N, alias: u64, datatype: DataType) -> Self
    where
        N: Into<String>,
    {
        Self::new(name, alias, datatype, None)
    }

    /// Creates a new `Float` metric.
    ///
    /// A NaN value produces a null metric.
    pub fn float<N>(name: N, alias: u64, value: f32) -> Self
    where
        N: Into<String>,
    {
        let value = (!value.is_nan()).then_some(MetricValue::Float(value));
        Self::new(name, alias, DataType::Float, value)
    }

    /// Creates a new `Int64` metric.
    pub fn int<N>(name: N, alias: u64, value: i64) -> Self
    where
        N: Into<String>,
    {
        Self::new(name, alias, DataType::Int64, Some(MetricValue::Int(value)))
    }

    /// Creates a new `UInt64` metric.
    pub fn uint<N>(name: N, alias: u64, value: u64) -> Self
    where
        N: Into<String>,
    {
        Self::new(name, alias, DataType::UInt64, Some(MetricValue::UInt(value)))
    }

    /// Creates a new `Boolean` metric.
    pub fn boolean<N>(name: N, alias: u64, value: bool) -> Self
    where
        N: Into<String>,
    {
        Self::new(name, alias, DataType::Boolean, Some(MetricValue::Boolean(value)))
    }

    /// Creates a new `String` metric.
    pub fn string<N, V>(name: N, alias: u64, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self::new(name, alias, DataType::String, Some(MetricValue::Text(value.into())))
    }

    /// Sets the metric timestamp, in milliseconds since the Unix epoch.
    ///
    /// A timestamp of zero is treated as absent.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Gets the name.
    ///
    /// Returns an empty string if the metric is only identified by its alias.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the alias.
    pub fn alias(&self) -> u64 {
        self.alias
    }

    /// Gets the metric timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Gets the data type.
    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// Gets a reference to the value, if the metric is not null.
    pub fn value(&self) -> Option<&MetricValue> {
        self.value.as_ref()
    }

    /// Returns `true` if the metric has no value.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
    }

    pub(crate) fn clear_name(&mut self) {
        self.name.clear();
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{}", self.alias)?;
        } else {
            write!(f, "{}", self.name)?;
        }

        match &self.value {
            Some(value) => write!(f, "[{} {}]", self.datatype, value),
            None => write!(f, "[{} null]", self.datatype),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_nan_is_null() {
        let metric = Metric::float("x", 1, f32::NAN);
        assert!(metric.is_null());
        assert_eq!(metric.datatype(), DataType::Float);
        assert_eq!(metric.value(), None);

        let metric = Metric::float("x", 1, f32::INFINITY);
        assert!(!metric.is_null());
        assert_eq!(metric.value(), Some(&MetricValue::Float(f32::INFINITY)));
    }

    #[test]
    fn typed_constructors_set_datatype_and_value() {
        let metric = Metric::int("a", 1, -5);
        assert_eq!(metric.datatype(), DataType::Int64);
        assert_eq!(metric.value(), Some(&MetricValue::Int(-5)));

        let metric = Metric::uint("b", 2, 5);
        assert_eq!(metric.datatype(), DataType::UInt64);
        assert_eq!(metric.value(), Some(&MetricValue::UInt(5)));

        let metric = Metric::boolean("c", 3, true);
        assert_eq!(metric.datatype(), DataType::Boolean);
        assert_eq!(metric.value(), Some(&MetricValue::Boolean(true)));

        let metric = Metric::string("d", 4, "hello");
        assert_eq!(metric.datatype(), DataType::String);
        assert_eq!(metric.value(), Some(&MetricValue::Text("hello".to_string())));

        for metric in [
            Metric::int("a", 1, 0),
            Metric::uint("b", 2, 0),
            Metric::boolean("c", 3, false),
            Metric::string("d", 4, ""),
        ] {
            assert!(!metric.is_null());
            assert_eq!(metric.timestamp(), 0);
        }
    }

    #[test]
    fn display() {
        let metric = Metric::float("pm_total_count", 6, 12.5).with_timestamp(1000);
        assert_eq!(metric.to_string(), "pm_total_count[Float 12.5]");
        assert_eq!(metric.timestamp(), 1000);

        let metric = Metric::null("", 7, DataType::Boolean);
        assert_eq!(metric.to_string(), "#7[Boolean null]");
    }
}
