use serde::Deserialize;
use sparkplug_config::{GenericConfiguration, GenericError};

use crate::{
    alias::{well_known_aliases, AliasTable, AliasTableError, MetricAlias},
    topic::{MessageType, Topic, TopicError},
};

fn default_group_id() -> String {
    "ApolloAutomation".to_string()
}

fn default_edge_node_id() -> String {
    "edge".to_string()
}

/// Encoder configuration.
///
/// Holds the identity used to address encoded payloads, and the metric alias table shared with consumers of compact
/// messages. Each encoder is built from its own configuration, so several devices can be served by one process.
#[derive(Clone, Debug, Deserialize)]
pub struct EncoderConfiguration {
    /// The Sparkplug group ID.
    ///
    /// Defaults to `ApolloAutomation`.
    #[serde(default = "default_group_id")]
    group_id: String,

    /// The Sparkplug edge node ID.
    ///
    /// Defaults to `edge`.
    #[serde(default = "default_edge_node_id")]
    edge_node_id: String,

    /// The Sparkplug device ID.
    ///
    /// Required when addressing device-level messages. Defaults to unset.
    #[serde(default)]
    device_id: Option<String>,

    /// Metric aliases.
    ///
    /// Defaults to the well-known particle counter aliases.
    #[serde(default = "well_known_aliases")]
    metric_aliases: Vec<MetricAlias>,

    /// Whether or not payloads should be validated before they are encoded.
    ///
    /// Encoding itself never fails, and writes metrics whose value doesn't match their data type without a value.
    /// When enabled, such payloads are rejected instead.
    ///
    /// Defaults to `false`.
    #[serde(default)]
    strict_validation: bool,
}

impl EncoderConfiguration {
    /// Creates a new `EncoderConfiguration` from the given configuration.
    pub fn from_configuration(config: &GenericConfiguration) -> Result<Self, GenericError> {
        Ok(config.as_typed()?)
    }

    /// Gets the group ID.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Gets the edge node ID.
    pub fn edge_node_id(&self) -> &str {
        &self.edge_node_id
    }

    /// Gets the device ID, if one is configured.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Returns `true` if payloads should be validated before encoding.
    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }

    /// Builds the metric alias table.
    ///
    /// # Errors
    ///
    /// If the configured aliases are invalid, an error is returned.
    pub fn alias_table(&self) -> Result<AliasTable, AliasTableError> {
        AliasTable::new(self.metric_aliases.iter().cloned())
    }

    /// Builds the topic for the given message type.
    ///
    /// The configured device ID is used for device-level message types only.
    ///
    /// # Errors
    ///
    /// If the configured IDs cannot be used in a topic, or if a device-level message type is requested without a
    /// configured device ID, an error is returned.
    pub fn topic(&self, message_type: MessageType) -> Result<Topic, TopicError> {
        let device_id = if message_type.is_device_level() {
            self.device_id()
        } else {
            None
        };

        Topic::new(&self.group_id, message_type, &self.edge_node_id, device_id)
    }
}
