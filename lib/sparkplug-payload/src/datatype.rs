use std::fmt;

/// Sparkplug B metric data type.
///
/// These match the `DataType` enum in `sparkplug_b.proto`, and the numeric values are part of the wire contract. Only
/// the scalar types are supported here: datasets, templates, property sets and arrays are not.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum DataType {
    /// No known data type.
    ///
    /// Metrics with this data type never carry a value field.
    Unknown = 0,
    /// Signed 8-bit integer.
    Int8 = 1,
    /// Signed 16-bit integer.
    Int16 = 2,
    /// Signed 32-bit integer.
    Int32 = 3,
    /// Signed 64-bit integer.
    Int64 = 4,
    /// Unsigned 8-bit integer.
    UInt8 = 5,
    /// Unsigned 16-bit integer.
    UInt16 = 6,
    /// Unsigned 32-bit integer.
    UInt32 = 7,
    /// Unsigned 64-bit integer.
    UInt64 = 8,
    /// Single-precision floating-point number.
    Float = 9,
    /// Double-precision floating-point number.
    Double = 10,
    /// Boolean.
    Boolean = 11,
    /// UTF-8 string.
    String = 12,
    /// Milliseconds since the Unix epoch, carried as an unsigned 64-bit value.
    DateTime = 13,
    /// UTF-8 text.
    Text = 14,
}

impl DataType {
    /// Returns the numeric value for encoding in the `datatype` field.
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Gets the data type for the given numeric value.
    pub const fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Unknown,
            1 => Self::Int8,
            2 => Self::Int16,
            3 => Self::Int32,
            4 => Self::Int64,
            5 => Self::UInt8,
            6 => Self::UInt16,
            7 => Self::UInt32,
            8 => Self::UInt64,
            9 => Self::Float,
            10 => Self::Double,
            11 => Self::Boolean,
            12 => Self::String,
            13 => Self::DateTime,
            14 => Self::Text,
            _ => return None,
        })
    }

    /// Returns the name of the data type, as it appears in the schema.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Text => "Text",
        }
    }

    /// Gets the data type by its schema name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        (0..=14)
            .filter_map(Self::from_u32)
            .find(|datatype| datatype.as_str().eq_ignore_ascii_case(name))
    }

    /// Returns `true` if values of this data type are carried in a value field.
    pub const fn has_value_field(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_match_schema() {
        assert_eq!(DataType::Unknown.as_u32(), 0);
        assert_eq!(DataType::Int8.as_u32(), 1);
        assert_eq!(DataType::Int64.as_u32(), 4);
        assert_eq!(DataType::UInt64.as_u32(), 8);
        assert_eq!(DataType::Float.as_u32(), 9);
        assert_eq!(DataType::Double.as_u32(), 10);
        assert_eq!(DataType::Boolean.as_u32(), 11);
        assert_eq!(DataType::String.as_u32(), 12);
        assert_eq!(DataType::DateTime.as_u32(), 13);
        assert_eq!(DataType::Text.as_u32(), 14);
    }

    #[test]
    fn numeric_and_name_roundtrip() {
        for value in 0..=14 {
            let datatype = DataType::from_u32(value).unwrap();
            assert_eq!(datatype.as_u32(), value);
            assert_eq!(DataType::from_name(datatype.as_str()), Some(datatype));
        }
        assert_eq!(DataType::from_u32(15), None);
        assert_eq!(DataType::from_name("uint32"), Some(DataType::UInt32));
        assert_eq!(DataType::from_name("dataset"), None);
    }

    #[test]
    fn only_unknown_lacks_value_field() {
        assert!(!DataType::Unknown.has_value_field());
        assert!(DataType::DateTime.has_value_field());
        assert!(DataType::Text.has_value_field());
    }
}
