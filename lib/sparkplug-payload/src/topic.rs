use std::fmt;

use snafu::{ensure, Snafu};

/// Sparkplug B topic namespace.
pub const NAMESPACE: &str = "spBv1.0";

/// Sparkplug message type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MessageType {
    /// Edge node birth certificate.
    NBirth,
    /// Edge node death certificate.
    NDeath,
    /// Device birth certificate.
    DBirth,
    /// Device death certificate.
    DDeath,
    /// Edge node data.
    NData,
    /// Device data.
    DData,
    /// Edge node command.
    NCmd,
    /// Device command.
    DCmd,
}

impl MessageType {
    /// Returns the message type as it appears in a topic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NBirth => "NBIRTH",
            Self::NDeath => "NDEATH",
            Self::DBirth => "DBIRTH",
            Self::DDeath => "DDEATH",
            Self::NData => "NDATA",
            Self::DData => "DDATA",
            Self::NCmd => "NCMD",
            Self::DCmd => "DCMD",
        }
    }

    /// Returns `true` if the message type addresses a device, rather than an edge node.
    pub const fn is_device_level(self) -> bool {
        matches!(self, Self::DBirth | Self::DDeath | Self::DData | Self::DCmd)
    }

    /// Returns `true` if the message type is a birth certificate.
    pub const fn is_birth(self) -> bool {
        matches!(self, Self::NBirth | Self::DBirth)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic error.
#[derive(Debug, Eq, PartialEq, Snafu)]
#[snafu(context(suffix(false)))]
pub enum TopicError {
    /// Topic element is empty, or contains a reserved character.
    #[snafu(display("{} '{}' must be non-empty and must not contain '/', '+' or '#'", element, value))]
    InvalidElement {
        /// Name of the topic element.
        element: &'static str,

        /// Value of the topic element.
        value: String,
    },

    /// Device-level message type used without a device ID.
    #[snafu(display("message type {} requires a device ID", message_type))]
    MissingDeviceId {
        /// Message type.
        message_type: MessageType,
    },

    /// Node-level message type used with a device ID.
    #[snafu(display("message type {} does not take a device ID", message_type))]
    UnexpectedDeviceId {
        /// Message type.
        message_type: MessageType,
    },
}

/// A Sparkplug B topic.
///
/// Topics have the form `spBv1.0/<group_id>/<message_type>/<edge_node_id>[/<device_id>]`, where the device ID is present
/// only for device-level message types.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Topic {
    group_id: String,
    message_type: MessageType,
    edge_node_id: String,
    device_id: Option<String>,
}

impl Topic {
    /// Creates a new `Topic`.
    ///
    /// # Errors
    ///
    /// If any of the IDs are empty or contain a reserved character, or if a device ID is given for a node-level message
    /// type (or missing for a device-level one), an error is returned.
    pub fn new(
        group_id: &str, message_type: MessageType, edge_node_id: &str, device_id: Option<&str>,
    ) -> Result<Self, TopicError> {
        check_element("group ID", group_id)?;
        check_element("edge node ID", edge_node_id)?;

        match device_id {
            Some(device_id) => {
                ensure!(message_type.is_device_level(), UnexpectedDeviceId { message_type });
                check_element("device ID", device_id)?;
            }
            None => ensure!(!message_type.is_device_level(), MissingDeviceId { message_type }),
        }

        Ok(Self {
            group_id: group_id.to_string(),
            message_type,
            edge_node_id: edge_node_id.to_string(),
            device_id: device_id.map(str::to_string),
        })
    }

    /// Gets the group ID.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Gets the message type.
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Gets the edge node ID.
    pub fn edge_node_id(&self) -> &str {
        &self.edge_node_id
    }

    /// Gets the device ID, if any.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            NAMESPACE, self.group_id, self.message_type, self.edge_node_id
        )?;

        if let Some(device_id) = &self.device_id {
            write!(f, "/{}", device_id)?;
        }

        Ok(())
    }
}

fn check_element(element: &'static str, value: &str) -> Result<(), TopicError> {
    ensure!(
        !value.is_empty() && !value.contains(['/', '+', '#']),
        InvalidElement { element, value }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_topic() {
        let topic = Topic::new("ApolloAutomation", MessageType::NBirth, "edge", None).unwrap();
        assert_eq!(topic.to_string(), "spBv1.0/ApolloAutomation/NBIRTH/edge");
        assert!(topic.message_type().is_birth());
    }

    #[test]
    fn device_topic() {
        let topic = Topic::new("ApolloAutomation", MessageType::DData, "edge", Some("temp-pro-1")).unwrap();
        assert_eq!(topic.to_string(), "spBv1.0/ApolloAutomation/DDATA/edge/temp-pro-1");
        assert_eq!(topic.device_id(), Some("temp-pro-1"));
    }

    #[test]
    fn device_id_must_match_message_level() {
        assert_eq!(
            Topic::new("g", MessageType::DBirth, "e", None).unwrap_err(),
            TopicError::MissingDeviceId {
                message_type: MessageType::DBirth
            }
        );
        assert_eq!(
            Topic::new("g", MessageType::NData, "e", Some("d")).unwrap_err(),
            TopicError::UnexpectedDeviceId {
                message_type: MessageType::NData
            }
        );
    }

    #[test]
    fn rejects_reserved_characters() {
        for bad in ["", "a/b", "a+", "#"] {
            let err = Topic::new(bad, MessageType::NData, "e", None).unwrap_err();
            assert!(matches!(err, TopicError::InvalidElement { element: "group ID", .. }));
        }

        let err = Topic::new("g", MessageType::DCmd, "e", Some("d/1")).unwrap_err();
        assert!(matches!(err, TopicError::InvalidElement { element: "device ID", .. }));
    }
}
