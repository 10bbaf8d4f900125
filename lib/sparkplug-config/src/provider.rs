use std::path::Path;

use figment::{
    providers::{Format, Json, Yaml},
    value::{Dict, Map},
    Error, Metadata, Profile, Provider,
};

/// Configuration file format.
#[derive(Clone, Copy, Debug)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }
}

/// A file provider that reads and parses its file up front.
pub struct ResolvedProvider {
    data: Map<Profile, Dict>,
    metadata: Metadata,
}

impl ResolvedProvider {
    pub fn from_file(path: &Path, format: FileFormat) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let data = match format {
            FileFormat::Yaml => Yaml::string(&contents).data()?,
            FileFormat::Json => Json::string(&contents).data()?,
        };

        let metadata = match format {
            FileFormat::Yaml => Metadata::from("YAML file", path),
            FileFormat::Json => Metadata::from("JSON file", path),
        };

        Ok(Self { data, metadata })
    }
}

impl Provider for ResolvedProvider {
    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Ok(self.data.clone())
    }
}
