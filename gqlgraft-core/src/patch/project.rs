use super::ast::{ParseSource, SourceAst};
use super::{PatchResult, PatchRoutine};
use crate::common::write_string_to_file;
use crate::config::IdempotenceMode;
use crate::errors::PatchError;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Set of target source files rooted at a project directory.
///
/// Files are keyed by their project-relative path and kept in load order.
pub struct Project<F> {
    root: PathBuf,
    files: IndexMap<String, F>,
}

/// Outcome for one routine of [`Project::apply_all`].
#[derive(Debug)]
pub struct FileReport {
    pub path: String,
    pub outcome: Result<PatchResult, PatchError>,
}

#[derive(Debug, Default)]
pub struct ProjectReport {
    pub files: Vec<FileReport>,
}

impl ProjectReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PatchError)> {
        self.files.iter().filter_map(|report| match &report.outcome {
            Ok(_) => None,
            Err(err) => Some((report.path.as_str(), err)),
        })
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn changed_files(&self) -> usize {
        self.files
            .iter()
            .filter(|report| matches!(&report.outcome, Ok(result) if result.changed))
            .count()
    }
}

impl<F: SourceAst> Project<F> {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            files: IndexMap::new(),
        }
    }

    /// Registers an already built file handle, replacing any previous one.
    pub fn with_file(mut self, file: F) -> Self {
        self.files.insert(file.path().to_string(), file);
        self
    }

    pub fn file(&self, path: &str) -> Option<&F> {
        self.files.get(path)
    }

    /// Writes the current text of `path` back under the project root.
    pub fn persist(&self, path: &str) -> Result<(), PatchError> {
        let file = self.files.get(path).ok_or_else(|| PatchError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not loaded"),
        })?;
        self.write(file)
    }

    fn write(&self, file: &F) -> Result<(), PatchError> {
        write_string_to_file(&self.root.join(file.path()), &file.source_text()).map_err(
            |source| PatchError::Io {
                path: file.path().to_string(),
                source,
            },
        )
    }
}

impl<F: SourceAst + ParseSource> Project<F> {
    /// Reads and parses `path`, unless it is already loaded.
    pub fn load(&mut self, path: &str) -> Result<&mut F, PatchError> {
        if !self.files.contains_key(path) {
            let text = fs::read_to_string(self.root.join(path)).map_err(|source| PatchError::Io {
                path: path.to_string(),
                source,
            })?;
            let file = F::parse(path, &text)?;
            self.files.insert(path.to_string(), file);
        }
        self.files.get_mut(path).ok_or_else(|| PatchError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not loaded"),
        })
    }

    /// Runs one routine and persists its file exactly once, changed or not.
    ///
    /// The loaded handle is replaced only after the write succeeded, so on
    /// any error it keeps its previous text.
    pub fn apply(
        &mut self,
        routine: &PatchRoutine,
        mode: IdempotenceMode,
    ) -> Result<PatchResult, PatchError> {
        let mut working = self.load(&routine.path)?.clone();
        let result = routine.apply(&mut working, mode)?;
        self.write(&working)?;
        self.files.insert(routine.path.clone(), working);
        if result.changed {
            info!(
                "Patched {} ({} edits applied)",
                routine.path,
                result.applied_count()
            );
        } else {
            info!("{} already up to date", routine.path);
        }
        Ok(result)
    }

    /// Runs every routine in order. A failing file is reported and skipped;
    /// the remaining routines still run.
    pub fn apply_all(&mut self, routines: &[PatchRoutine], mode: IdempotenceMode) -> ProjectReport {
        let files = routines
            .iter()
            .map(|routine| {
                let outcome = self.apply(routine, mode);
                if let Err(err) = &outcome {
                    error!("{} [{}]", err, err.error_code());
                }
                FileReport {
                    path: routine.path.clone(),
                    outcome,
                }
            })
            .collect();
        ProjectReport { files }
    }
}
