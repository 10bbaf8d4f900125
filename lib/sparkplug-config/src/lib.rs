//! Configuration loading for Sparkplug encoders.
//!
//! Configuration is layered from serializable defaults, YAML or JSON files, and prefixed environment variables, and
//! can then be extracted either as a whole into a typed struct or queried key by key.
#![deny(missing_docs)]

use std::{borrow::Cow, path::Path, sync::Arc};

use figment::{
    error::Kind,
    providers::{Env, Serialized},
    value::{Dict, Map},
    Figment, Metadata, Profile, Provider,
};
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use tracing::debug;

mod provider;
use self::provider::{FileFormat, ResolvedProvider};

/// A generic error, for use where a specific error type is not needed.
pub type GenericError = anyhow::Error;

/// A configuration error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum ConfigurationError {
    /// Environment variable prefix was empty.
    #[snafu(display("Environment variable prefix must be non-empty."))]
    EmptyPrefix,

    /// Field was not present in any configuration source.
    #[snafu(display("Configuration field '{}' is not set. {}", field, help_text))]
    MissingField {
        /// How the field can be set, including its environment variable name when environment variables are loaded.
        help_text: String,

        /// Name of the missing field.
        field: Cow<'static, str>,
    },

    /// Field was present, but held a value of the wrong type.
    #[snafu(display("Configuration field '{}' should be {}, but is {}.", field, expected_ty, actual_ty))]
    InvalidFieldType {
        /// Period-separated path to the field.
        field: String,

        /// Expected type.
        expected_ty: String,

        /// Actual type.
        actual_ty: String,
    },

    /// Any other configuration error.
    #[snafu(display("Failed to load configuration."))]
    Generic {
        /// Error source.
        source: GenericError,
    },
}

impl From<figment::Error> for ConfigurationError {
    fn from(e: figment::Error) -> Self {
        map_figment_error(&[], e)
    }
}

/// A type-erased figment provider, so sources of different types can be layered in order.
struct DynProvider(Box<dyn Provider>);

impl Provider for DynProvider {
    fn metadata(&self) -> Metadata {
        self.0.metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        self.0.data()
    }
}

/// Layered configuration loader.
///
/// Each source added overrides the sources added before it: nested tables are merged key by key, while any other value,
/// lists included, is replaced as a whole. Sources are read when they are added, so that a missing
/// file or an unreadable environment is reported by the call that added it.
#[derive(Default)]
pub struct ConfigurationLoader {
    providers: Vec<DynProvider>,
    env_prefixes: Vec<String>,
}

impl ConfigurationLoader {
    fn push<P>(mut self, provider: P) -> Self
    where
        P: Provider + 'static,
    {
        self.providers.push(DynProvider(Box::new(provider)));
        self
    }

    fn load_file(self, path: &Path, format: FileFormat) -> Result<Self, ConfigurationError> {
        let provider = ResolvedProvider::from_file(path, format)?;
        Ok(self.push(provider))
    }

    fn load_optional_file(self, path: &Path, format: FileFormat) -> Self {
        match ResolvedProvider::from_file(path, format) {
            Ok(provider) => self.push(provider),
            Err(e) => {
                debug!(error = %e, path = %path.display(), format = format.as_str(), "Skipping optional configuration file.");
                self
            }
        }
    }

    /// Adds default values, serialized from `defaults`.
    pub fn add_defaults<T>(self, defaults: T) -> Self
    where
        T: Serialize + 'static,
    {
        self.push(Serialized::defaults(defaults))
    }

    /// Adds a YAML file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or is not valid YAML, an error is returned.
    pub fn from_yaml<P>(self, path: P) -> Result<Self, ConfigurationError>
    where
        P: AsRef<Path>,
    {
        self.load_file(path.as_ref(), FileFormat::Yaml)
    }

    /// Adds a YAML file if it can be read and parsed, and skips it otherwise.
    pub fn try_from_yaml<P>(self, path: P) -> Self
    where
        P: AsRef<Path>,
    {
        self.load_optional_file(path.as_ref(), FileFormat::Yaml)
    }

    /// Adds a JSON file.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or is not valid JSON, an error is returned.
    pub fn from_json<P>(self, path: P) -> Result<Self, ConfigurationError>
    where
        P: AsRef<Path>,
    {
        self.load_file(path.as_ref(), FileFormat::Json)
    }

    /// Adds a JSON file if it can be read and parsed, and skips it otherwise.
    pub fn try_from_json<P>(self, path: P) -> Self
    where
        P: AsRef<Path>,
    {
        self.load_optional_file(path.as_ref(), FileFormat::Json)
    }

    /// Adds the environment variables starting with `prefix`.
    ///
    /// The prefix is matched case-insensitively, and an underscore is appended when it doesn't already end with one.
    /// With a prefix of `sparkplug`, `SPARKPLUG_GROUP_ID` sets the `group_id` key.
    ///
    /// # Errors
    ///
    /// If the prefix is empty, or the matching variables cannot be parsed, an error is returned.
    pub fn from_environment(mut self, prefix: &str) -> Result<Self, ConfigurationError> {
        if prefix.is_empty() {
            return EmptyPrefix.fail();
        }

        let mut prefix = prefix.to_uppercase();
        if !prefix.ends_with('_') {
            prefix.push('_');
        }

        // Snapshot the matching variables now, rather than at extraction time.
        let snapshot = Env::prefixed(&prefix).data()?.remove(&Profile::Default);
        if let Some(values) = snapshot {
            self.env_prefixes.push(prefix);
            self = self.push(Serialized::defaults(values));
        }

        Ok(self)
    }

    /// Extracts the layered configuration as `T`.
    ///
    /// # Errors
    ///
    /// If the configuration cannot be deserialized as `T`, an error is returned.
    pub fn into_typed<'a, T>(self) -> Result<T, ConfigurationError>
    where
        T: Deserialize<'a>,
    {
        self.into_generic().as_typed()
    }

    /// Finishes loading, returning a queryable [`GenericConfiguration`].
    pub fn into_generic(self) -> GenericConfiguration {
        let figment = self
            .providers
            .into_iter()
            .fold(Figment::new(), |figment, provider| figment.merge(provider));

        GenericConfiguration {
            inner: Arc::new(Inner {
                figment,
                env_prefixes: self.env_prefixes,
            }),
        }
    }
}

#[derive(Debug)]
struct Inner {
    figment: Figment,
    env_prefixes: Vec<String>,
}

/// Loaded configuration.
///
/// Cheap to clone. Keys are period-separated paths, such as `limits.max_metrics`.
#[derive(Clone, Debug)]
pub struct GenericConfiguration {
    inner: Arc<Inner>,
}

impl GenericConfiguration {
    fn lookup<'a, T>(&self, key: &str) -> Result<T, ConfigurationError>
    where
        T: Deserialize<'a>,
    {
        let figment = &self.inner.figment;
        let result = match figment.extract_inner(key) {
            // Environment variables can't express nesting, so `a.b` may only exist as `a_b`.
            Err(e) if matches!(e.kind, Kind::MissingField(_)) && key.contains('.') => {
                figment.extract_inner(&key.replace('.', "_"))
            }
            result => result,
        };

        result.map_err(|e| map_figment_error(&self.inner.env_prefixes, e))
    }

    /// Gets the value of `key` as `T`.
    ///
    /// # Errors
    ///
    /// If the key is not set, or its value cannot be deserialized as `T`, an error is returned.
    pub fn get_typed<'a, T>(&self, key: &str) -> Result<T, ConfigurationError>
    where
        T: Deserialize<'a>,
    {
        self.lookup(key)
    }

    /// Gets the value of `key` as `T`, falling back to `T::default()` on any error.
    pub fn get_typed_or_default<'a, T>(&self, key: &str) -> T
    where
        T: Default + Deserialize<'a>,
    {
        self.lookup(key).unwrap_or_default()
    }

    /// Gets the value of `key` as `T`, or `None` if the key is not set.
    ///
    /// # Errors
    ///
    /// If the key is set but its value cannot be deserialized as `T`, an error is returned.
    pub fn try_get_typed<'a, T>(&self, key: &str) -> Result<Option<T>, ConfigurationError>
    where
        T: Deserialize<'a>,
    {
        match self.lookup(key) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigurationError::MissingField { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Deserializes the whole configuration as `T`.
    ///
    /// # Errors
    ///
    /// If the configuration cannot be deserialized as `T`, an error is returned.
    pub fn as_typed<'a, T>(&self) -> Result<T, ConfigurationError>
    where
        T: Deserialize<'a>,
    {
        self.inner
            .figment
            .extract()
            .map_err(|e| map_figment_error(&self.inner.env_prefixes, e))
    }
}

fn env_var_name(prefix: &str, field: &str) -> String {
    format!("{}{}", prefix, field.replace('.', "_").to_uppercase())
}

fn map_figment_error(env_prefixes: &[String], e: figment::Error) -> ConfigurationError {
    match e.kind {
        Kind::MissingField(field) => {
            let mut help_text = format!("Set `{}` in a configuration file", field);
            for prefix in env_prefixes {
                help_text.push_str(&format!(" or `{}` in the environment", env_var_name(prefix, &field)));
            }
            help_text.push('.');

            ConfigurationError::MissingField { help_text, field }
        }
        Kind::InvalidType(actual, expected) => ConfigurationError::InvalidFieldType {
            field: e.path.join("."),
            expected_ty: expected,
            actual_ty: actual.to_string(),
        },
        _ => ConfigurationError::Generic { source: e.into() },
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Node {
        group_id: String,
        edge_node_id: String,
        #[serde(default)]
        device_id: Option<String>,
    }

    fn write_file(contents: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yaml_file_into_typed() {
        let file = write_file("group_id: plant-a\nedge_node_id: gateway-1\n", ".yaml");

        let node: Node = ConfigurationLoader::default()
            .from_yaml(file.path())
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(
            node,
            Node {
                group_id: "plant-a".to_string(),
                edge_node_id: "gateway-1".to_string(),
                device_id: None,
            }
        );
    }

    #[test]
    fn json_file_into_generic() {
        let file = write_file(r#"{"group_id": "plant-b", "limits": {"max_metrics": 16}}"#, ".json");

        let config = ConfigurationLoader::default()
            .from_json(file.path())
            .unwrap()
            .into_generic();
        assert_eq!(config.get_typed::<String>("group_id").unwrap(), "plant-b");
        assert_eq!(config.get_typed::<u32>("limits.max_metrics").unwrap(), 16);
        assert_eq!(config.try_get_typed::<String>("edge_node_id").unwrap(), None);
        assert_eq!(config.get_typed_or_default::<u32>("limits.missing"), 0);
    }

    #[test]
    fn later_sources_take_precedence() {
        let defaults = Node {
            group_id: "default-group".to_string(),
            edge_node_id: "default-edge".to_string(),
            device_id: Some("default-device".to_string()),
        };
        let file = write_file("edge_node_id: gateway-2\n", ".yaml");

        let node: Node = ConfigurationLoader::default()
            .add_defaults(defaults)
            .from_yaml(file.path())
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(node.group_id, "default-group");
        assert_eq!(node.edge_node_id, "gateway-2");
        assert_eq!(node.device_id.as_deref(), Some("default-device"));
    }

    #[test]
    fn later_lists_replace_earlier_lists() {
        #[derive(Debug, Deserialize, Serialize)]
        struct Aliases {
            metric_aliases: Vec<u64>,
        }

        let file = write_file("metric_aliases: [9]\n", ".yaml");

        let aliases: Aliases = ConfigurationLoader::default()
            .add_defaults(Aliases {
                metric_aliases: vec![1, 2],
            })
            .from_yaml(file.path())
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(aliases.metric_aliases, vec![9]);
    }

    #[test]
    fn environment_overrides_file() {
        std::env::set_var("SPBCFGTEST_ENV_GROUP_ID", "from-env");
        let file = write_file("group_id: from-file\nedge_node_id: gateway-3\n", ".yaml");

        let node: Node = ConfigurationLoader::default()
            .from_yaml(file.path())
            .unwrap()
            .from_environment("spbcfgtest_env")
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(node.group_id, "from-env");
        assert_eq!(node.edge_node_id, "gateway-3");
    }

    #[test]
    fn empty_environment_prefix_is_rejected() {
        let result = ConfigurationLoader::default().from_environment("");
        assert!(matches!(result, Err(ConfigurationError::EmptyPrefix)));
    }

    #[test]
    fn missing_field_mentions_environment_variable() {
        std::env::set_var("SPBCFGTEST_MISSING_EDGE_NODE_ID", "gateway-4");

        let config = ConfigurationLoader::default()
            .from_environment("spbcfgtest_missing")
            .unwrap()
            .into_generic();
        assert_eq!(config.get_typed::<String>("edge_node_id").unwrap(), "gateway-4");

        match config.get_typed::<String>("group_id") {
            Err(ConfigurationError::MissingField { help_text, field }) => {
                assert_eq!(field, "group_id");
                assert!(help_text.contains("SPBCFGTEST_MISSING_GROUP_ID"), "help text: {}", help_text);
            }
            other => panic!("expected missing field error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_field_type() {
        let file = write_file("limits:\n  max_metrics: lots\n", ".yaml");

        let config = ConfigurationLoader::default()
            .from_yaml(file.path())
            .unwrap()
            .into_generic();
        match config.get_typed::<u32>("limits.max_metrics") {
            Ok(value) => panic!("expected an error, got {}", value),
            Err(ConfigurationError::MissingField { .. }) => panic!("field should not be reported as missing"),
            Err(_) => {}
        }
    }

    #[test]
    fn missing_files() {
        let result = ConfigurationLoader::default().from_yaml("/nonexistent/sparkplug.yaml");
        assert!(result.is_err());

        let config = ConfigurationLoader::default()
            .try_from_yaml("/nonexistent/sparkplug.yaml")
            .try_from_json("/nonexistent/sparkplug.json")
            .into_generic();
        assert_eq!(config.try_get_typed::<String>("group_id").unwrap(), None);
    }
}
