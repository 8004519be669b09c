use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ## Structure
/// Generator configuration, read from a YAML file and never mutated by the
/// resolver or the patcher.
///
/// ```text
/// GeneratorConfig
///   ├── type_definition: graphql | typescript
///   ├── client_framework: angular | react | vue (optional)
///   ├── client_base_dir: String
///   ├── server_base_dir: String
///   ├── entity_folder_name: String (optional)
///   ├── entity_file_name: String (optional)
///   └── idempotence: import_gated | per_edit
/// ```
///
/// The serialized form doubles as the Handlebars context for destination
/// path templates, so field names here are the names templates refer to.

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeDefinition {
    Graphql,
    #[default]
    Typescript,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientFramework {
    Angular,
    React,
    Vue,
}

/// How dependent edits of a patch routine are gated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdempotenceMode {
    /// Dependent edits run only when at least one import of the routine was
    /// added in this run.
    #[default]
    ImportGated,
    /// Every dependent edit runs and relies on its own marker.
    PerEdit,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub type_definition: TypeDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_framework: Option<ClientFramework>,
    pub client_base_dir: String,
    pub server_base_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_folder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_file_name: Option<String>,
    pub idempotence: IdempotenceMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            type_definition: TypeDefinition::default(),
            client_framework: None,
            client_base_dir: "src/main/webapp/app/".to_string(),
            server_base_dir: "server".to_string(),
            entity_folder_name: None,
            entity_file_name: None,
            idempotence: IdempotenceMode::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn with_entity(mut self, folder_name: &str, file_name: &str) -> Self {
        self.entity_folder_name = Some(folder_name.to_string());
        self.entity_file_name = Some(file_name.to_string());
        self
    }

    pub fn is_angular(&self) -> bool {
        self.client_framework == Some(ClientFramework::Angular)
    }

    pub fn is_react(&self) -> bool {
        self.client_framework == Some(ClientFramework::React)
    }

    /// Context handed to destination path templates.
    pub fn template_context(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
