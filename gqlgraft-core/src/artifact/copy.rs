use super::ResolvedArtifact;
use crate::errors::CopyError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Copies every resolved template verbatim from `template_root` to its
/// destination under `output_root`. Returns the number of files written.
pub fn copy_artifacts(
    artifacts: &[ResolvedArtifact],
    template_root: &Path,
    output_root: &Path,
) -> Result<usize, CopyError> {
    for artifact in artifacts {
        let source = template_root.join(&artifact.source_template);
        if !source.is_file() {
            return Err(CopyError::MissingTemplate {
                template: artifact.source_template.clone(),
                path: source.display().to_string(),
            });
        }

        let target = output_root.join(&artifact.destination);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| CopyError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        fs::copy(&source, &target).map_err(|source| CopyError::Io {
            path: target.display().to_string(),
            source,
        })?;
        info!("Wrote {}", artifact.destination);
    }

    Ok(artifacts.len())
}
