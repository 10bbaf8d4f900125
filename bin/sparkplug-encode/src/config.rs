use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use sparkplug_config::{ConfigurationLoader, GenericError};
use sparkplug_payload::{
    AliasTable, DataType, EncoderConfiguration, MessageType, Metric, MetricValue, Payload, Topic,
};

/// Prefix for environment variables that override values from the configuration file.
const ENV_PREFIX: &str = "SPARKPLUG";

/// Payload kind.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// Definition message, where every metric carries its name.
    Birth,

    /// Compact message, where aliased metrics carry only their alias.
    Data,
}

/// A metric data type, given by name.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct DataTypeName(DataType);

impl TryFrom<String> for DataTypeName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DataType::from_name(&value)
            .map(Self)
            .ok_or_else(|| format!("unknown metric data type '{}'", value))
    }
}

/// A metric value, as written in the payload document.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DocumentValue {
    Boolean(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

/// A metric, as written in the payload document.
#[derive(Clone, Debug, Deserialize)]
pub struct MetricDocument {
    /// The metric alias.
    ///
    /// Defaults to `0`, which means the metric has no alias.
    #[serde(default)]
    pub alias: u64,

    /// The metric name.
    ///
    /// Birth payloads fill in missing names from the alias table.
    #[serde(default)]
    pub name: String,

    /// The metric timestamp, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,

    /// The metric data type.
    ///
    /// When unset, the data type is inferred from the value: booleans are `Boolean`, negative integers are `Int64`,
    /// other integers are `UInt64`, decimals are `Float` and strings are `String`.
    #[serde(default)]
    pub datatype: Option<DataTypeName>,

    /// The metric value.
    ///
    /// When unset, the metric is null.
    #[serde(default)]
    pub value: Option<DocumentValue>,
}

impl MetricDocument {
    /// Converts this document into a `Metric`.
    ///
    /// Numeric values are converted to the representation implied by the data type where that can be done without
    /// loss. Anything else is kept as-is, and left for validation to report.
    pub fn into_metric(self) -> Metric {
        let datatype = match (&self.datatype, &self.value) {
            (Some(DataTypeName(datatype)), _) => *datatype,
            (None, Some(value)) => infer_datatype(value),
            (None, None) => DataType::Unknown,
        };

        let value = self
            .value
            .map(|value| to_metric_value(datatype, value))
            .filter(|value| !is_nan(value));

        Metric::new(self.name, self.alias, datatype, value).with_timestamp(self.timestamp)
    }
}

fn infer_datatype(value: &DocumentValue) -> DataType {
    match value {
        DocumentValue::Boolean(_) => DataType::Boolean,
        DocumentValue::Int(v) if *v < 0 => DataType::Int64,
        DocumentValue::Int(_) | DocumentValue::UInt(_) => DataType::UInt64,
        DocumentValue::Float(_) => DataType::Float,
        DocumentValue::Text(_) => DataType::String,
    }
}

fn to_metric_value(datatype: DataType, value: DocumentValue) -> MetricValue {
    match (datatype, value) {
        (DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64, DocumentValue::UInt(v)) => {
            match i64::try_from(v) {
                Ok(v) => MetricValue::Int(v),
                Err(_) => MetricValue::UInt(v),
            }
        }
        (
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 | DataType::DateTime,
            DocumentValue::Int(v),
        ) => match u64::try_from(v) {
            Ok(v) => MetricValue::UInt(v),
            Err(_) => MetricValue::Int(v),
        },
        (DataType::Float, DocumentValue::Int(v)) => MetricValue::Float(v as f32),
        (DataType::Float, DocumentValue::UInt(v)) => MetricValue::Float(v as f32),
        (DataType::Float, DocumentValue::Float(v)) => MetricValue::Float(v as f32),
        (DataType::Double, DocumentValue::Int(v)) => MetricValue::Double(v as f64),
        (DataType::Double, DocumentValue::UInt(v)) => MetricValue::Double(v as f64),
        (_, DocumentValue::Boolean(v)) => MetricValue::Boolean(v),
        (_, DocumentValue::Int(v)) => MetricValue::Int(v),
        (_, DocumentValue::UInt(v)) => MetricValue::UInt(v),
        (_, DocumentValue::Float(v)) => MetricValue::Double(v),
        (_, DocumentValue::Text(v)) => MetricValue::Text(v),
    }
}

fn is_nan(value: &MetricValue) -> bool {
    match value {
        MetricValue::Float(v) => v.is_nan(),
        MetricValue::Double(v) => v.is_nan(),
        _ => false,
    }
}

/// A payload, as written in the configuration file.
#[derive(Clone, Debug, Deserialize)]
pub struct PayloadDocument {
    /// The payload kind.
    pub kind: PayloadKind,

    /// The payload timestamp, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: u64,

    /// The payload sequence number.
    #[serde(default)]
    pub seq: u64,

    /// The payload metrics, in order.
    #[serde(default)]
    pub metrics: Vec<MetricDocument>,
}

impl PayloadDocument {
    /// Builds the payload described by this document.
    ///
    /// Birth payloads have missing metric names filled in from `aliases`, and data payloads have names stripped from
    /// all aliased metrics.
    pub fn into_payload(self, aliases: &AliasTable) -> Payload {
        let mut payload = Payload::new(self.timestamp, self.seq);
        for metric in self.metrics {
            payload.add_metric(metric.into_metric());
        }

        match self.kind {
            PayloadKind::Birth => payload.with_names(aliases),
            PayloadKind::Data => payload.into_compact(),
        }
    }
}

/// Encoder configuration.
pub struct Config {
    /// Encoder settings.
    pub encoder: EncoderConfiguration,

    /// The payload to encode.
    pub payload: PayloadDocument,

    /// Where to write the encoded payload.
    ///
    /// When unset, the encoded payload is written to standard output.
    pub output: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration from the given file, with overrides from `SPARKPLUG_`-prefixed environment variables.
    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GenericError> {
        let path = path.as_ref();
        let loader = ConfigurationLoader::default()
            .from_yaml(path)
            .with_context(|| format!("Failed to load configuration file '{}'.", path.display()))?
            .from_environment(ENV_PREFIX)?;

        Self::from_loader(loader)
    }

    /// Builds the configuration from the sources already added to `loader`.
    pub fn from_loader(loader: ConfigurationLoader) -> Result<Self, GenericError> {
        let config = loader.into_generic();

        let encoder = EncoderConfiguration::from_configuration(&config)?;
        let payload = config
            .get_typed::<PayloadDocument>("payload")
            .context("Failed to read payload document.")?;
        let output = config.try_get_typed::<PathBuf>("output")?;

        Ok(Self {
            encoder,
            payload,
            output,
        })
    }

    /// Builds the payload to encode.
    ///
    /// When strict validation is enabled, payloads holding values that can't be encoded as declared are rejected.
    pub fn build_payload(&self) -> Result<Payload, GenericError> {
        let aliases = self
            .encoder
            .alias_table()
            .context("Invalid metric alias configuration.")?;

        let payload = self.payload.clone().into_payload(&aliases);
        if self.encoder.strict_validation() {
            payload.validate().context("Payload failed validation.")?;
        }

        Ok(payload)
    }

    /// Returns the topic the payload would be published to.
    pub fn topic(&self) -> Result<Topic, GenericError> {
        let device_level = self.encoder.device_id().is_some();
        let message_type = match (self.payload.kind, device_level) {
            (PayloadKind::Birth, false) => MessageType::NBirth,
            (PayloadKind::Birth, true) => MessageType::DBirth,
            (PayloadKind::Data, false) => MessageType::NData,
            (PayloadKind::Data, true) => MessageType::DData,
        };

        Ok(self.encoder.topic(message_type)?)
    }
}
