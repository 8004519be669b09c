use super::{ArtifactDescriptor, ResolvedArtifact};
use crate::common::get_handlebars;
use crate::config::GeneratorConfig;
use crate::errors::ResolveError;
use std::collections::HashMap;
use tracing::debug;

/// Computes the destination of every active descriptor.
///
/// Inactive descriptors are skipped silently. The first template that fails to
/// render aborts the call, so callers never see a partially resolved list.
/// No filesystem access happens here.
pub fn resolve(
    descriptors: &[ArtifactDescriptor],
    config: &GeneratorConfig,
) -> Result<Vec<ResolvedArtifact>, ResolveError> {
    let handlebars = get_handlebars();
    let context = config.template_context()?;

    let mut resolved = Vec::with_capacity(descriptors.len());
    let mut seen: HashMap<String, &str> = HashMap::new();

    for descriptor in descriptors {
        if !descriptor.activation.is_active(config) {
            debug!("Skipping inactive template {}", descriptor.source_template);
            continue;
        }

        let destination = handlebars
            .render_template(&descriptor.destination, &context)
            .map_err(|err| ResolveError::TemplateEvaluation {
                source_template: descriptor.source_template.clone(),
                template: descriptor.destination.clone(),
                reason: err.to_string(),
            })?;

        if let Some(first) = seen.insert(destination.clone(), &descriptor.source_template) {
            return Err(ResolveError::DuplicateDestination {
                destination,
                first: first.to_string(),
                second: descriptor.source_template.clone(),
            });
        }

        debug!("Resolved {} -> {}", descriptor.source_template, destination);
        resolved.push(ResolvedArtifact {
            source_template: descriptor.source_template.clone(),
            destination,
        });
    }

    Ok(resolved)
}
