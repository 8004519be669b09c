use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use gqlgraft::artifact::descriptors_from_yaml;
use gqlgraft::blueprint::{self, client, server};
use gqlgraft::common::write_string_to_file;
use gqlgraft::{
    copy_artifacts, resolve, ArtifactDescriptor, GeneratorConfig, IdempotenceMode, Project,
    ResolvedArtifact, TsSourceFile,
};
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Client,
    Server,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn init(config_path: &Path) -> Result<()> {
    let serialized = GeneratorConfig::default().to_yaml()?;
    write_string_to_file(config_path, &serialized)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(())
}

fn load_config(config_path: &Path) -> Result<GeneratorConfig> {
    GeneratorConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))
}

fn select_descriptors(
    config: &GeneratorConfig,
    side: Side,
    descriptors_path: Option<&Path>,
) -> Result<Vec<ArtifactDescriptor>> {
    if let Some(path) = descriptors_path {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptors {}", path.display()))?;
        return descriptors_from_yaml(&yaml)
            .with_context(|| format!("Failed to parse descriptors {}", path.display()));
    }
    Ok(match side {
        Side::Client => client::descriptors(config),
        Side::Server => server::descriptors(),
        Side::All => blueprint::all_descriptors(config),
    })
}

fn resolve_side(
    config: &GeneratorConfig,
    side: Side,
    descriptors_path: Option<&Path>,
) -> Result<Vec<ResolvedArtifact>> {
    let descriptors = select_descriptors(config, side, descriptors_path)?;
    resolve(&descriptors, config).context("Failed to resolve template destinations")
}

pub fn plan(
    config_path: &Path,
    side: Side,
    format: OutputFormat,
    descriptors_path: Option<&Path>,
) -> Result<String> {
    let config = load_config(config_path)?;
    let resolved = resolve_side(&config, side, descriptors_path)?;
    Ok(match format {
        OutputFormat::Text => resolved
            .iter()
            .map(|artifact| format!("{} -> {}", artifact.source_template, artifact.destination))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&resolved)?,
    })
}

pub fn write(
    config_path: &Path,
    templates: &Path,
    output: &Path,
    side: Side,
    descriptors_path: Option<&Path>,
) -> Result<usize> {
    let config = load_config(config_path)?;
    let resolved = resolve_side(&config, side, descriptors_path)?;
    let written = copy_artifacts(&resolved, templates, output)?;
    Ok(written)
}

/// Runs the server adjustments against `project`. Every file is attempted;
/// the command fails afterwards when any of them did.
pub fn patch(config_path: &Path, project: &Path, per_edit: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let mode = if per_edit {
        IdempotenceMode::PerEdit
    } else {
        config.idempotence
    };

    let routines = server::adjustments(&config);
    let mut project: Project<TsSourceFile> = Project::new(project);
    let report = project.apply_all(&routines, mode);

    info!(
        "{} of {} files changed",
        report.changed_files(),
        report.files.len()
    );
    let failed: Vec<&str> = report.failures().map(|(path, _)| path).collect();
    if !failed.is_empty() {
        error!("Failed to patch: {}", failed.join(", "));
        bail!("{} of {} files could not be patched", failed.len(), routines.len());
    }
    Ok(())
}
