//! Artifact resolution and copy error types

use thiserror::Error;

/// Errors raised while resolving descriptor destinations
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A destination template could not be rendered against the configuration
    #[error("Failed to evaluate destination '{template}' for template {source_template}: {reason}")]
    TemplateEvaluation {
        /// Template the descriptor copies
        source_template: String,
        /// Destination template that failed
        template: String,
        /// Renderer message
        reason: String,
    },

    /// Two active descriptors landed on the same path
    #[error("Templates {first} and {second} both resolve to {destination}")]
    DuplicateDestination {
        /// Colliding destination path
        destination: String,
        /// Template resolved first
        first: String,
        /// Template resolved second
        second: String,
    },

    /// The configuration could not be turned into a template context
    #[error("Invalid template context: {0}")]
    Context(#[from] serde_json::Error),
}

impl ResolveError {
    /// Get error code for CLI reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            ResolveError::TemplateEvaluation { .. } => "TEMPLATE_EVALUATION",
            ResolveError::DuplicateDestination { .. } => "DUPLICATE_DESTINATION",
            ResolveError::Context(_) => "INVALID_CONTEXT",
        }
    }
}

/// Errors raised while copying resolved artifacts
#[derive(Error, Debug)]
pub enum CopyError {
    /// Template file is not present under the template root
    #[error("Template {template} not found at {path}")]
    MissingTemplate { template: String, path: String },

    /// Writing the destination failed
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
