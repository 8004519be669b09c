mod copy;
mod resolver;

use crate::config::{ClientFramework, GeneratorConfig, TypeDefinition};
use serde::{Deserialize, Serialize};

pub use copy::copy_artifacts;
pub use resolver::resolve;

/// Pure predicate over the generator configuration deciding whether a
/// descriptor takes part in a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Always,
    TypeDefinition(TypeDefinition),
    ClientFramework(ClientFramework),
    All(Vec<Activation>),
    Any(Vec<Activation>),
}

impl Activation {
    pub fn is_active(&self, config: &GeneratorConfig) -> bool {
        match self {
            Activation::Always => true,
            Activation::TypeDefinition(expected) => config.type_definition == *expected,
            Activation::ClientFramework(expected) => config.client_framework == Some(*expected),
            Activation::All(conditions) => conditions.iter().all(|c| c.is_active(config)),
            Activation::Any(conditions) => conditions.iter().any(|c| c.is_active(config)),
        }
    }
}

/// Candidate generated file: which template to copy, where it lands (a
/// Handlebars template over the configuration) and when it applies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArtifactDescriptor {
    pub source_template: String,
    pub destination: String,
    #[serde(default)]
    pub activation: Activation,
}

impl ArtifactDescriptor {
    pub fn new(source_template: &str, destination: &str) -> Self {
        Self {
            source_template: source_template.to_string(),
            destination: destination.to_string(),
            activation: Activation::Always,
        }
    }

    pub fn when(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub source_template: String,
    pub destination: String,
}

/// Parses a YAML list of descriptors.
pub fn descriptors_from_yaml(yaml: &str) -> Result<Vec<ArtifactDescriptor>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}
